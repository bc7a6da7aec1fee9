//! Document-to-text extraction for uploaded conversation transcripts.
//!
//! Supported inputs:
//! - `.txt`: decoded as UTF-8 (lossy)
//! - `.docx`: paragraphs pulled from `word/document.xml`
//! - `.doc`: best-effort UTF-8 decode of the raw bytes
//!
//! PDF is rejected outright rather than decoded into garbage.

use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

/// Extraction failures.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File appears to be empty or unreadable")]
    EmptyContent,

    #[error("Failed to parse DOCX file: {0}")]
    InvalidDocx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document kinds recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    LegacyDoc,
    Pdf,
}

impl DocumentKind {
    /// Detect the kind from a filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::LegacyDoc),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

const PDF_MAGIC: &[u8] = b"%PDF";

/// Cap on the inflated size of `word/document.xml`.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("static regex"));
static TAB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:tab\s*/>").expect("static regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));
static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("static regex"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9A-Fa-f]+)|([0-9]+));").expect("static regex"));

/// Reject inputs larger than `max_bytes` before any parsing.
pub fn check_size(size: u64, max_bytes: u64) -> Result<(), ExtractError> {
    if size > max_bytes {
        return Err(ExtractError::FileTooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(())
}

/// Convert raw document bytes into trimmed UTF-8 text.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_filename(filename).ok_or_else(|| {
        ExtractError::UnsupportedFormat(format!(
            "'{}'. Please upload a TXT or DOCX file",
            filename
        ))
    })?;

    if kind == DocumentKind::Pdf || bytes.starts_with(PDF_MAGIC) {
        return Err(ExtractError::UnsupportedFormat(
            "PDF parsing is not supported yet. Please upload a TXT or DOCX file".to_string(),
        ));
    }

    let text = match kind {
        DocumentKind::Docx => docx_to_text(bytes, MAX_DOCUMENT_XML_BYTES)?,
        _ => decode_utf8(bytes),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::EmptyContent);
    }

    info!(
        "Extracted {} characters from {} ({:?})",
        text.chars().count(),
        filename,
        kind
    );
    Ok(text.to_string())
}

/// Read a file from disk, enforcing the size cap first.
pub async fn extract_file(
    path: &Path,
    filename: &str,
    max_bytes: u64,
) -> Result<String, ExtractError> {
    let size = tokio::fs::metadata(path).await?.len();
    check_size(size, max_bytes)?;
    let bytes = tokio::fs::read(path).await?;
    extract_text(&bytes, filename)
}

fn decode_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Pull the text out of a DOCX archive, inflating at most `max_xml_bytes`
/// of `word/document.xml`.
fn docx_to_text(bytes: &[u8], max_xml_bytes: u64) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::InvalidDocx(e.to_string()))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::InvalidDocx(format!("missing word/document.xml: {}", e)))?;
    check_size(document.size(), max_xml_bytes)?;

    // Declared sizes are untrusted; bound the read as well.
    let mut raw = Vec::new();
    document
        .by_ref()
        .take(max_xml_bytes + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractError::InvalidDocx(e.to_string()))?;
    check_size(raw.len() as u64, max_xml_bytes)?;

    let xml = String::from_utf8(raw)
        .map_err(|e| ExtractError::InvalidDocx(format!("word/document.xml is not UTF-8: {}", e)))?;
    Ok(document_xml_to_text(&xml))
}

/// Flatten WordprocessingML into plain text, one line per paragraph.
fn document_xml_to_text(xml: &str) -> String {
    let text = PARAGRAPH_END.replace_all(xml, "\n");
    let text = TAB.replace_all(&text, "\t");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    BLANK_RUNS.replace_all(&text, "\n\n").into_owned()
}

// `&amp;` goes last so `&amp;lt;` decodes to `&lt;` and not `<`.
fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    let text = NUMERIC_ENTITY.replace_all(&text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    text.replace("&amp;", "&")
}
