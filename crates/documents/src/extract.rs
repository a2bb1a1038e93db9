//! Per-format text extractors.

use std::io::Read;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Mutex;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::DocumentError;

/// Location of the body XML inside a `.docx` package.
const DOCX_BODY: &str = "word/document.xml";

/// Supported document formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from the extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Extract plain text from one document.
pub fn extract_text(path: &Path) -> Result<String, DocumentError> {
    match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Text) => read_txt(path),
        Some(DocumentFormat::Pdf) => read_pdf(path),
        Some(DocumentFormat::Docx) => read_docx(path),
        None => Err(DocumentError::Unsupported(path.to_path_buf())),
    }
}

fn read_txt(path: &Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|e| DocumentError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Page-by-page extraction, each page followed by a newline.
fn read_pdf(path: &Path) -> Result<String, DocumentError> {
    let pdf_err = |reason: String| DocumentError::Pdf {
        path: path.to_path_buf(),
        reason,
    };

    // The PDF parser panics on some malformed inputs; contain it to this file.
    let pages = catch_unwind_quietly(|| pdf_extract::extract_text_by_pages(path))
        .map_err(|_| pdf_err("parser panicked on malformed input".into()))?
        .map_err(|e| pdf_err(e.to_string()))?;

    Ok(join_pages(pages))
}

fn join_pages(pages: Vec<String>) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    text
}

/// Serializes panic hook swaps between concurrent extractions.
static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// `catch_unwind` with the panic hook silenced for the duration of `f`.
///
/// The default hook would print a panic trace to stderr in the middle of
/// startup; the panic is logged at debug level instead. The hook is process
/// wide, so a panic on another thread inside this window is also only logged.
fn catch_unwind_quietly<T>(f: impl FnOnce() -> T) -> std::thread::Result<T> {
    let _guard = PANIC_HOOK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| debug!("Suppressed panic: {info}")));
    let result = std::panic::catch_unwind(AssertUnwindSafe(f));
    std::panic::set_hook(previous);
    result
}

/// Paragraph-by-paragraph extraction, each paragraph followed by a newline.
fn read_docx(path: &Path) -> Result<String, DocumentError> {
    let docx_err = |reason: String| DocumentError::Docx {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::open(path).map_err(|e| DocumentError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| docx_err(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| docx_err(format!("{DOCX_BODY}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(format!("{DOCX_BODY}: {e}")))?;

    let paragraphs = docx_paragraphs(&xml).map_err(docx_err)?;

    let mut text = String::new();
    for paragraph in paragraphs {
        text.push_str(&paragraph);
        text.push('\n');
    }
    Ok(text)
}

/// Collect the text of every `<w:p>` in a WordprocessingML body.
///
/// Text boxes (`w:txbxContent`) and the `mc:Fallback` copy of alternate
/// content are skipped, so each paragraph holds only its own runs.
pub(crate) fn docx_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Open paragraphs, innermost last.
    let mut open: Vec<String> = Vec::new();
    let mut skip_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event();
        if skip_depth > 0 {
            match event {
                Ok(Event::Start(e)) if is_skipped(e.name().as_ref()) => skip_depth += 1,
                Ok(Event::End(e)) if is_skipped(e.name().as_ref()) => skip_depth -= 1,
                Ok(Event::Eof) => break,
                Err(e) => return Err(malformed(&reader, e)),
                _ => {}
            }
            continue;
        }

        match event {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text = true,
                name if is_skipped(name) => skip_depth = 1,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(open.pop().unwrap_or_default()),
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_text(&mut open, "\t"),
                b"w:br" | b"w:cr" => push_text(&mut open, "\n"),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let decoded = t.decode().map_err(|e| e.to_string())?;
                push_text(&mut open, &decoded);
            }
            Ok(Event::GeneralRef(r)) if in_text => {
                if let Some(ch) = r.resolve_char_ref().map_err(|e| e.to_string())? {
                    push_text(&mut open, ch.encode_utf8(&mut [0; 4]));
                } else {
                    let name = r.decode().map_err(|e| e.to_string())?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| format!("unknown entity &{name};"))?;
                    push_text(&mut open, resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(&reader, e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn is_skipped(name: &[u8]) -> bool {
    matches!(name, b"w:txbxContent" | b"mc:Fallback")
}

fn push_text(open: &mut [String], text: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(text);
    }
}

fn malformed(reader: &Reader<&[u8]>, e: quick_xml::Error) -> String {
    format!("malformed {DOCX_BODY} at byte {}: {e}", reader.error_position())
}
