//! Document processing service: store the upload, extract text, summarize.

use crate::extract::extract_text;
use crate::summarize::Summarizer;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors emitted by the document processing service.
///
/// Summarization never fails, so the only failure mode left is storing the
/// uploaded bytes on disk.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The uploaded file could not be written to the upload directory.
    #[error("Failed to store uploaded file '{filename}': {source}")]
    Storage {
        /// Sanitized filename we attempted to write.
        filename: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

/// Result of processing one uploaded document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Sanitized filename the upload was stored under.
    pub filename: String,
    /// Raw extracted text (possibly a placeholder).
    pub text: String,
    /// Final summary string.
    pub summary: String,
}

/// Interface exposed to the HTTP surface, kept as a trait so router tests
/// can substitute a stub.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Store an upload, extract its text, and summarize it.
    async fn process_upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcessedDocument, ProcessingError>;
}

/// Production implementation backed by the filesystem and the summarizer.
pub struct DocumentService {
    upload_dir: PathBuf,
    summarizer: Summarizer,
}

impl DocumentService {
    /// Build a service storing uploads under `upload_dir`.
    pub fn new(upload_dir: impl Into<PathBuf>, summarizer: Summarizer) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            summarizer,
        }
    }

    async fn store(&self, filename: &str, bytes: Vec<u8>) -> Result<PathBuf, ProcessingError> {
        let stored_name = unique_filename(filename);
        let path = self.upload_dir.join(&stored_name);
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|source| ProcessingError::Storage {
                filename: stored_name.clone(),
                source,
            })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| ProcessingError::Storage {
                filename: stored_name.clone(),
                source,
            })?;
        Ok(path)
    }
}

#[async_trait]
impl DocumentApi for DocumentService {
    async fn process_upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcessedDocument, ProcessingError> {
        let path = self.store(filename, bytes).await?;
        let text = extract_text(&path).await;
        let summary = self.summarizer.summarize(&text).await;
        tracing::info!(
            filename,
            stored = %path.display(),
            text_chars = text.chars().count(),
            summary_chars = summary.chars().count(),
            "Processed upload"
        );
        Ok(ProcessedDocument {
            filename: sanitize_filename(filename),
            text,
            summary,
        })
    }
}

/// Strip path components and unsafe characters from a client-supplied name.
pub(crate) fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Prefix the sanitized name with a UUID so concurrent uploads of the same
/// file never clobber each other.
fn unique_filename(filename: &str) -> String {
    format!("{}-{}", uuid::Uuid::new_v4(), sanitize_filename(filename))
}
