//! Directory scan and context assembly.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::extract::{DocumentFormat, extract_text};

/// Text extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub filename: String,
    pub text: String,
}

/// A document that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

/// The concatenated reference text prepended to every request.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContext {
    text: String,
    loaded: Vec<String>,
    skipped: Vec<SkippedDocument>,
    warnings: Vec<String>,
}

impl DocumentContext {
    /// Concatenate records in the given order, each behind a labeled header.
    pub fn from_records(records: &[DocumentRecord]) -> Self {
        let mut text = String::new();
        for record in records {
            text.push_str(&section_header(&record.filename));
            text.push_str(&record.text);
        }
        Self {
            text,
            loaded: records.iter().map(|r| r.filename.clone()).collect(),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Files whose text made it into the context, in order.
    pub fn loaded_files(&self) -> &[String] {
        &self.loaded
    }

    /// Files that failed extraction.
    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    /// Messages for the presentation surface.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Rough token estimate (4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.text.len().div_ceil(4)
    }
}

/// The header that labels each document's section.
pub fn section_header(filename: &str) -> String {
    format!("\n\n--- Content from {filename} ---\n")
}

/// Scan `dir` for supported documents and build the context.
///
/// Never fails. A missing directory yields an empty context with a warning;
/// a failing document is skipped with a warning. Files are processed in
/// sorted filename order so the result is the same on every run.
pub fn load_document_context(dir: &Path) -> DocumentContext {
    let entries = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to read documents directory");
            return DocumentContext {
                warnings: vec![format!("Error loading documents from {}: {e}", dir.display())],
                ..DocumentContext::default()
            };
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && DocumentFormat::from_path(p).is_some())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut records = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    let mut warnings = Vec::new();

    for path in &files {
        let filename = display_name(path);
        match extract_text(path) {
            Ok(text) => {
                debug!(file = %path.display(), chars = text.len(), "Loaded document");
                records.push(DocumentRecord { filename, text });
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping document");
                warnings.push(format!("Error reading {}: {e}", path.display()));
                skipped.push(SkippedDocument {
                    filename,
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut context = DocumentContext::from_records(&records);
    context.skipped = skipped;
    context.warnings = warnings;

    info!(
        loaded = context.loaded.len(),
        skipped = context.skipped.len(),
        chars = context.text.len(),
        "Document context built"
    );

    context
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
