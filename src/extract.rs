//! Text extraction from uploaded files.
//!
//! Extraction is deliberately thin: text-like files are read as lossy UTF-8,
//! while PDF and image formats get a degraded placeholder (wiring a real
//! parser or OCR engine in is a collaborator concern, not a summarization
//! one). The function never fails; downstream code treats any non-empty
//! string as valid document text.

use std::path::Path;

/// Extract raw text from a stored file.
///
/// Dispatches on the file extension. Unknown extensions are treated as
/// plain text. Read failures produce a placeholder string rather than an
/// error, so the caller always has something to summarize.
pub async fn extract_text(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => placeholder(path, "PDF text extraction"),
        "png" | "jpg" | "jpeg" | "gif" | "tiff" | "bmp" => placeholder(path, "Image OCR"),
        _ => read_text_file(path).await,
    }
}

async fn read_text_file(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            tracing::info!(path = %path.display(), bytes = bytes.len(), "Read text file");
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Err(error) => {
            tracing::error!(path = %path.display(), error = %error, "Failed to read file");
            format!(
                "Could not read {}: {error}\nThis is placeholder text for the unreadable file.",
                path.display()
            )
        }
    }
}

fn placeholder(path: &Path, capability: &str) -> String {
    tracing::warn!(
        path = %path.display(),
        capability,
        "No extraction backend configured; returning placeholder text"
    );
    format!(
        "{capability} is not configured for {}.\nThis is placeholder text standing in for the extracted content.",
        path.display()
    )
}
