use std::path::Path;

use tracing::{debug, error};

use super::{dedup_lines, ExtractError};

/// Reads the embedded text layer of a PDF. Scanned PDFs yield an empty string.
pub fn extract_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    debug!("PDF {} is {} bytes", path.display(), bytes.len());

    // pdf-extract can panic on malformed fonts and glyph tables.
    let text = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(&bytes)
    })) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return Err(ExtractError::Pdf(e.to_string())),
        Err(_) => {
            error!("PDF extraction panicked for {}", path.display());
            return Err(ExtractError::PdfPanicked);
        }
    };

    Ok(dedup_lines(text.lines()))
}
