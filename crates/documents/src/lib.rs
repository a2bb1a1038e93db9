//! Reference document ingestion for docchat.
//!
//! Scans the documents directory once at startup, extracts plain text from
//! every `.txt`, `.pdf` and `.docx` file, and concatenates the results into a
//! single [`DocumentContext`] that is prepended to every request.
//!
//! A corrupt document never blocks the others: failures are isolated per
//! file, warned about, and recorded as skipped.

pub mod extract;
pub mod ingest;

use std::path::PathBuf;

pub use extract::{DocumentFormat, extract_text};
pub use ingest::{DocumentContext, DocumentRecord, SkippedDocument, load_document_context};

/// Errors from extracting a single document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to extract PDF text from {path}: {reason}")]
    Pdf { path: PathBuf, reason: String },

    #[error("Failed to extract DOCX text from {path}: {reason}")]
    Docx { path: PathBuf, reason: String },

    #[error("Unsupported document type: {0}")]
    Unsupported(PathBuf),
}
