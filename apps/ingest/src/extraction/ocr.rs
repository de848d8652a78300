//! OCR through external tools: `pdftoppm` rasterises pages, `tesseract` reads
//! them, and headless LibreOffice turns DOCX into PDF first.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::ExtractError;

const PDFTOPPM: &str = "pdftoppm";
const TESSERACT: &str = "tesseract";
const SOFFICE: &str = "soffice";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub language: String,
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            dpi: 300,
        }
    }
}

pub fn ocr_pdf(path: &Path, config: &OcrConfig) -> Result<String, ExtractError> {
    let pdftoppm = locate(PDFTOPPM)?;
    let tesseract = locate(TESSERACT)?;
    let workdir = tempfile::tempdir().map_err(|e| ExtractError::io(path, e))?;

    info!("Running OCR on {} ({} dpi)", path.display(), config.dpi);
    run(
        PDFTOPPM,
        Command::new(&pdftoppm)
            .arg("-r")
            .arg(config.dpi.to_string())
            .arg("-png")
            .arg(path)
            .arg(workdir.path().join("page")),
    )?;

    let pages = page_images(workdir.path()).map_err(|e| ExtractError::io(workdir.path(), e))?;
    debug!("Rasterised {} page(s) from {}", pages.len(), path.display());

    let mut text = String::new();
    for page in &pages {
        let output = run(
            TESSERACT,
            Command::new(&tesseract)
                .arg(page)
                .arg("stdout")
                .arg("-l")
                .arg(&config.language),
        )?;
        text.push_str(&output);
        text.push('\n');
    }
    Ok(text.trim().to_string())
}

pub fn ocr_docx(path: &Path, config: &OcrConfig) -> Result<String, ExtractError> {
    let soffice = locate(SOFFICE)?;
    let workdir = tempfile::tempdir().map_err(|e| ExtractError::io(path, e))?;

    info!("Converting {} to PDF for OCR", path.display());
    run(
        SOFFICE,
        Command::new(&soffice)
            .args(["--headless", "--convert-to", "pdf", "--outdir"])
            .arg(workdir.path())
            .arg(path),
    )?;

    let mut pdf_name = path.file_stem().unwrap_or_default().to_os_string();
    pdf_name.push(".pdf");
    let pdf = workdir.path().join(pdf_name);
    if !pdf.exists() {
        return Err(ExtractError::ToolFailed {
            tool: SOFFICE,
            stderr: format!("no PDF produced for {}", path.display()),
        });
    }
    ocr_pdf(&pdf, config)
}

fn locate(tool: &'static str) -> Result<PathBuf, ExtractError> {
    which::which(tool).map_err(|_| ExtractError::ToolMissing(tool))
}

/// Runs the command and returns its stdout, mapping a non-zero exit to
/// [`ExtractError::ToolFailed`].
fn run(tool: &'static str, command: &mut Command) -> Result<String, ExtractError> {
    let output = command.output().map_err(|e| ExtractError::ToolFailed {
        tool,
        stderr: e.to_string(),
    })?;
    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            tool,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// PNG pages written by `pdftoppm`, in page order. Page numbers are
/// zero-padded to a common width, so name order is page order.
fn page_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    pages.sort();
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_images_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<String> = page_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[test]
    fn test_missing_tool_reported() {
        let err = locate("definitely-not-an-installed-ocr-tool").unwrap_err();
        assert!(matches!(err, ExtractError::ToolMissing(_)));
    }

    #[test]
    fn test_failed_command_reported() {
        let err = run("false", &mut Command::new("false")).unwrap_err();
        assert!(matches!(err, ExtractError::ToolFailed { tool: "false", .. }));
    }
}
