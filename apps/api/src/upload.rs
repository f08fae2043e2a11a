//! Plain-text extraction from uploaded PDF resumes.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{3,}").unwrap_or_else(|e| panic!("invalid built-in pattern: {e}"))
});

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// Unifies line endings, strips trailing whitespace from every line, and
/// collapses runs of blank lines to a single one.
pub fn normalize_extracted_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed_lines = unified
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINE_RUN
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

/// Extracts and normalizes the text layer of a PDF.
pub fn extract_resume_text(pdf_bytes: &[u8]) -> Result<String, AppError> {
    let raw = pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| {
        tracing::warn!("PDF extraction failed: {e}");
        AppError::UnprocessableEntity("Could not read the uploaded PDF".to_string())
    })?;

    let text = normalize_extracted_text(&raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The uploaded PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Failed to read upload: {}", e.body_text()))
    }
}

/// POST /api/v1/resumes/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let max_bytes = state.config.max_upload_bytes;

    let mut pdf_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        pdf_bytes = Some(data);
        break;
    }

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if pdf_bytes.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "Upload exceeds the {max_bytes} byte limit"
        )));
    }
    if pdf_bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    tracing::info!(size = pdf_bytes.len(), "extracting text from uploaded PDF");

    // Malformed PDFs can panic inside the extractor; a failed join is reported
    // the same way as an unreadable file.
    let text = tokio::task::spawn_blocking(move || extract_resume_text(&pdf_bytes))
        .await
        .map_err(|e| {
            tracing::warn!("PDF extraction task failed: {e}");
            AppError::UnprocessableEntity("Could not read the uploaded PDF".to_string())
        })??;

    Ok(Json(ExtractResponse { text }))
}
