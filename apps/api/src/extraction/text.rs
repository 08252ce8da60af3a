//! Plain-text extraction from uploaded PDF and DOCX files.
//!
//! Best effort only: unreadable pages are skipped and unreadable documents
//! produce an empty string. Callers treat `""` as "no usable text".

use std::path::{Path, PathBuf};

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Document formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the kind from the last extension of `filename`, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
enum TextExtractionError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parse failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("DOCX parse failed: {0}")]
    Docx(String),
}

/// Extracts text from the file at `path`. Never fails; see module docs.
pub fn extract_text(path: &Path, kind: DocumentKind) -> String {
    let result = std::fs::read(path)
        .map_err(TextExtractionError::from)
        .and_then(|bytes| match kind {
            DocumentKind::Pdf => pdf_text(&bytes),
            DocumentKind::Docx => docx_text(&bytes),
        });

    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Error extracting {:?} text from {}: {e}", kind, path.display());
            String::new()
        }
    }
}

/// Runs [`extract_text`] on the blocking pool.
pub async fn read_document_text(path: PathBuf, kind: DocumentKind) -> String {
    tokio::task::spawn_blocking(move || extract_text(&path, kind))
        .await
        .unwrap_or_else(|e| {
            warn!("Text extraction task failed: {e}");
            String::new()
        })
}

fn pdf_text(bytes: &[u8]) -> Result<String, TextExtractionError> {
    let doc = lopdf::Document::load_mem(bytes)?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) if !page_text.trim().is_empty() => text.push_str(&page_text),
            Ok(_) => debug!("PDF page {page_num} has no text; skipping"),
            Err(e) => debug!("Failed to extract text from PDF page {page_num}: {e}"),
        }
    }
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String, TextExtractionError> {
    let docx =
        docx_rs::read_docx(bytes).map_err(|e| TextExtractionError::Docx(format!("{e:?}")))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(&mut text, paragraph),
            DocumentChild::Table(table) => push_table(&mut text, table),
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph(text: &mut String, paragraph: &Paragraph) {
    push_runs(text, &paragraph.children);
    text.push('\n');
}

/// Hyperlinks nest their own runs; walk them too.
fn push_runs(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_runs(text, &link.children),
            _ => {}
        }
    }
}

fn push_table(text: &mut String, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(text, paragraph),
                    TableCellContent::Table(nested) => push_table(text, nested),
                    _ => {}
                }
            }
        }
    }
}
