//! Upload workflow: validate → store file → extract text → extract fields → persist.
//!
//! Steps run strictly in order for one request. A failed field extraction
//! removes the stored file and persists nothing.

use std::path::Path;

use bytes::Bytes;
use chrono::Local;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::errors::AppError;
use crate::extraction::text::{read_document_text, DocumentKind};
use crate::models::resume::NewResume;
use crate::resumes::store::insert_resume;
use crate::state::AppState;

/// The `file` part of the upload form, as received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoFilePart,
    NoSelectedFile,
    DisallowedType,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::NoFilePart => "No file part in request",
            Rejection::NoSelectedFile => "No selected file",
            Rejection::DisallowedType => "Invalid file format. Only PDF and DOCX are allowed.",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Rejected(Rejection),
    ExtractionFailed,
    Persisted { id: i64, file_name: String },
}

/// Runs the whole workflow for one upload.
/// Only storage failures are errors; everything else is an outcome.
pub async fn process_upload(
    state: &AppState,
    upload: Option<UploadedFile>,
) -> Result<UploadOutcome, AppError> {
    let (upload, kind) = match validate(upload) {
        Ok(valid) => valid,
        Err(rejection) => {
            info!("Upload rejected: {}", rejection.message());
            return Ok(UploadOutcome::Rejected(rejection));
        }
    };

    let display_name = secure_filename(&upload.file_name);
    let stored_name = format!("{}_{}", Local::now().format("%Y%m%d%H%M%S%6f"), display_name);
    let path = state.config.upload_dir.join(&stored_name);
    tokio::fs::write(&path, &upload.data).await?;
    info!("Stored upload {} ({} bytes)", stored_name, upload.data.len());

    let text = read_document_text(path.clone(), kind).await;
    if text.is_empty() {
        warn!("No text extracted from {stored_name}");
    }

    let fields = state.extractor.extract_fields(&text).await;
    let resume = NewResume::from_extraction(stored_name, fields, &text);

    if resume.is_parse_failure() {
        warn!("Field extraction failed for {}; discarding upload", resume.filename);
        remove_upload(&path).await;
        return Ok(UploadOutcome::ExtractionFailed);
    }

    let id = insert_resume(&state.db, &resume).await?;
    Ok(UploadOutcome::Persisted {
        id,
        file_name: display_name,
    })
}

fn validate(upload: Option<UploadedFile>) -> Result<(UploadedFile, DocumentKind), Rejection> {
    let upload = upload.ok_or(Rejection::NoFilePart)?;
    if upload.file_name.is_empty() {
        return Err(Rejection::NoSelectedFile);
    }
    let kind = DocumentKind::from_filename(&upload.file_name).ok_or(Rejection::DisallowedType)?;
    Ok((upload, kind))
}

async fn remove_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove {}: {e}", path.display());
    }
}

/// Reduces a client-supplied filename to a safe, flat ASCII name.
///
/// Non-ASCII is transliterated where NFKD allows and dropped otherwise, path
/// separators become word breaks, words are joined with `_`, anything outside
/// `[A-Za-z0-9_.-]` is removed and leading/trailing `.`/`_` are stripped.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let flat = ascii.replace(['/', '\\'], " ");
    let joined = flat.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
