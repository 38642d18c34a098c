//! HTTP surface for docsum.
//!
//! This module exposes a compact Axum router with two endpoints:
//!
//! - `GET /` – Health check returning a small status document.
//! - `POST /upload` – Multipart upload: store the file, extract its text, and
//!   return `{filename, text, summary, status}`. Validation failures (missing
//!   part, blank filename, disallowed extension) answer with a `400` and a
//!   JSON error envelope; storage failures answer with a `500`.
//!
//! Summarization itself never fails, so the handler's error surface is the
//! upload plumbing only.

use crate::service::{DocumentApi, ProcessingError};
use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// File extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: [&str; 8] = ["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"];

/// Build the HTTP router exposing the upload API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: DocumentApi + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/upload", post(upload_document::<S>))
        .with_state(service)
}

/// Health check answering with a fixed status document.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Document summarization API is running",
        "status": "healthy"
    }))
}

/// Success response for the `POST /upload` endpoint.
#[derive(Serialize)]
struct UploadResponse {
    /// Sanitized filename of the processed upload.
    filename: String,
    /// Raw extracted text (possibly a placeholder).
    text: String,
    /// Final summary.
    summary: String,
    /// Fixed `"success"` marker kept for client compatibility.
    status: &'static str,
}

/// Accept a multipart upload, process it, and return the extracted text and
/// summary.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError>
where
    S: DocumentApi,
{
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError::BadRequest(format!("Invalid multipart body: {error}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| AppError::BadRequest(format!("Failed to read upload: {error}")))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let Some((filename, bytes)) = upload else {
        return Err(AppError::BadRequest("No file provided".into()));
    };
    if filename.is_empty() {
        return Err(AppError::BadRequest("No file selected".into()));
    }
    if !allowed_file(&filename) {
        return Err(AppError::BadRequest(format!(
            "File type not allowed; allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let document = service.process_upload(&filename, bytes).await?;
    tracing::info!(filename = document.filename, "Upload request completed");
    Ok(Json(UploadResponse {
        filename: document.filename,
        text: document.text,
        summary: document.summary,
        status: "success",
    }))
}

/// Check whether a filename carries an allowed extension.
fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| {
            ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false)
}

enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message, "status": "error" }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Internal(inner.to_string())
    }
}
