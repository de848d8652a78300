//! Text extraction from resume documents, with OCR fallback.

pub mod docx;
pub mod ocr;
pub mod pdf;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

pub use ocr::OcrConfig;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported document type: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF extraction panicked (malformed fonts or glyphs)")]
    PdfPanicked,

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("required tool '{0}' was not found on PATH")]
    ToolMissing(&'static str),

    #[error("'{tool}' failed: {stderr}")]
    ToolFailed { tool: &'static str, stderr: String },
}

impl ExtractError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// When to run OCR instead of (or after) direct text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrMode {
    /// Direct extraction only.
    Off,
    /// OCR only.
    Force,
    /// Direct extraction, then OCR if that produced no text.
    #[default]
    Auto,
}

impl FromStr for OcrMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(OcrMode::Off),
            "force" => Ok(OcrMode::Force),
            "auto" => Ok(OcrMode::Auto),
            other => Err(format!(
                "unknown OCR mode '{other}' (expected off, force, or auto)"
            )),
        }
    }
}

impl fmt::Display for OcrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OcrMode::Off => "off",
            OcrMode::Force => "force",
            OcrMode::Auto => "auto",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Case-insensitive match on the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

/// Turns a document into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path, mode: OcrMode) -> Result<String, ExtractError>;
}

/// PDF via `pdf-extract`, DOCX via `docx-rs`, OCR via poppler + tesseract.
pub struct DocumentExtractor {
    ocr: OcrConfig,
}

impl DocumentExtractor {
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }

    fn extract_direct(&self, path: &Path, format: DocumentFormat) -> Result<String, ExtractError> {
        match format {
            DocumentFormat::Pdf => pdf::extract_pdf_text(path),
            DocumentFormat::Docx => docx::extract_docx_text(path),
        }
    }

    fn extract_ocr(&self, path: &Path, format: DocumentFormat) -> Result<String, ExtractError> {
        match format {
            DocumentFormat::Pdf => ocr::ocr_pdf(path, &self.ocr),
            DocumentFormat::Docx => ocr::ocr_docx(path, &self.ocr),
        }
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, path: &Path, mode: OcrMode) -> Result<String, ExtractError> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ExtractError::UnsupportedFormat(path.display().to_string()))?;

        match mode {
            OcrMode::Off => self.extract_direct(path, format),
            OcrMode::Force => self.extract_ocr(path, format),
            OcrMode::Auto => {
                let direct = match self.extract_direct(path, format) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Direct extraction failed for {}: {e}", path.display());
                        String::new()
                    }
                };
                if !direct.trim().is_empty() {
                    return Ok(direct);
                }
                info!(
                    "No text extracted from {}, falling back to OCR",
                    path.display()
                );
                self.extract_ocr(path, format)
            }
        }
    }
}

/// Collapses whitespace inside each line, drops empty lines, and removes
/// repeated lines keeping the first occurrence.
pub fn dedup_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for line in lines {
        let line = line.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            continue;
        }
        if seen.insert(line.clone()) {
            kept.push(line);
        }
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ocr_mode_parsing() {
        assert_eq!("off".parse::<OcrMode>(), Ok(OcrMode::Off));
        assert_eq!(" FORCE ".parse::<OcrMode>(), Ok(OcrMode::Force));
        assert_eq!("Auto".parse::<OcrMode>(), Ok(OcrMode::Auto));
        assert!("sometimes".parse::<OcrMode>().is_err());
        assert_eq!(OcrMode::default(), OcrMode::Auto);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("resumes/Jane.PDF")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("john.Docx")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(DocumentFormat::from_path(&PathBuf::from("README")), None);
    }

    #[test]
    fn test_dedup_lines() {
        let text = dedup_lines(["  Jane   Doe ", "", "Rust | Go", "Jane Doe", "   ", "Rust | Go"]);
        assert_eq!(text, "Jane Doe\nRust | Go");
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let extractor = DocumentExtractor::new(OcrConfig::default());
        let err = extractor
            .extract_text(Path::new("resume.txt"), OcrMode::Off)
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = DocumentExtractor::new(OcrConfig::default());
        let err = extractor
            .extract_text(&dir.path().join("missing.docx"), OcrMode::Off)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
