//! Template rendering: copies a DOCX template and fills each anchor heading
//! with lines from the reconciled record.

pub mod anchors;

use std::path::{Path, PathBuf};

use docx_rs::{read_docx, AlignmentType, DocumentChild, Docx, Paragraph, Run};
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::docx::paragraph_text;
use crate::models::ResumeRecord;
pub use anchors::{format_lines, Anchor};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template is not a readable DOCX: {0}")]
    Template(String),

    #[error("failed to save rendered document: {0}")]
    Save(String),
}

/// Fills a document template from a record and writes it to `output`.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, record: &ResumeRecord, output: &Path) -> Result<(), RenderError>;
}

pub struct DocxTemplateRenderer {
    template_path: PathBuf,
}

impl DocxTemplateRenderer {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }
}

impl TemplateRenderer for DocxTemplateRenderer {
    fn render(&self, record: &ResumeRecord, output: &Path) -> Result<(), RenderError> {
        let bytes = std::fs::read(&self.template_path).map_err(|source| RenderError::Io {
            path: self.template_path.display().to_string(),
            source,
        })?;
        let template = read_docx(&bytes).map_err(|e| RenderError::Template(e.to_string()))?;

        let (filled, missing) = fill_template(template, record);
        for anchor in missing {
            warn!("Anchor '{}' not found in the template", anchor.heading());
        }

        let file = std::fs::File::create(output).map_err(|source| RenderError::Io {
            path: output.display().to_string(),
            source,
        })?;
        filled
            .build()
            .pack(file)
            .map_err(|e| RenderError::Save(e.to_string()))?;

        info!("Rendered document: {}", output.display());
        Ok(())
    }
}

/// Inserts each anchor's lines directly after the first top-level paragraph
/// that contains the anchor heading. Anchors are located in the unmodified
/// template, so inserted text can never be mistaken for a heading.
///
/// Returns the filled document and the anchors that were not found.
pub fn fill_template(mut docx: Docx, record: &ResumeRecord) -> (Docx, Vec<Anchor>) {
    let mut placements = Vec::new();
    let mut missing = Vec::new();

    for (order, anchor) in Anchor::ALL.into_iter().enumerate() {
        let position = docx.document.children.iter().position(|child| match child {
            DocumentChild::Paragraph(p) => anchor.matches(&paragraph_text(p)),
            _ => false,
        });
        match position {
            Some(index) => placements.push((index, order, anchor)),
            None => missing.push(anchor),
        }
    }

    // Bottom-up keeps earlier indices valid. For a shared heading the later
    // anchor goes in first so the earlier anchor's lines end up on top.
    placements.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));

    for (index, _, anchor) in placements {
        let lines = format_lines(anchor, record);
        for (offset, line) in lines.into_iter().enumerate() {
            let mut paragraph = Paragraph::new().add_run(Run::new().add_text(line));
            if anchor.right_aligned() {
                paragraph = paragraph.align(AlignmentType::Right);
            }
            docx.document
                .children
                .insert(index + 1 + offset, DocumentChild::Paragraph(Box::new(paragraph)));
        }
    }

    (docx, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::docx::docx_text_from_bytes;
    use crate::models::NOT_SPECIFIED;

    fn heading(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn texts(docx: &Docx) -> Vec<String> {
        docx.document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .collect()
    }

    fn record() -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.job_title = "Platform Engineer".to_string();
        record.professional_summary = "Ships reliable systems; education: self-taught".to_string();
        record.skills.hard = vec!["Rust".to_string()];
        record
    }

    #[test]
    fn test_lines_inserted_after_anchor_in_order() {
        let template = Docx::new()
            .add_paragraph(heading("Job Title"))
            .add_paragraph(heading("Professional Summary"))
            .add_paragraph(heading("Skills: Hard Skill"))
            .add_paragraph(heading("Education"));

        let (filled, _) = fill_template(template, &record());
        assert_eq!(
            texts(&filled),
            vec![
                "Job Title",
                "Platform Engineer",
                "Professional Summary",
                "Ships reliable systems; education: self-taught",
                "Skills: Hard Skill",
                "- Rust",
                "Education",
                NOT_SPECIFIED,
            ]
        );
    }

    #[test]
    fn test_missing_anchors_reported_not_fatal() {
        let template = Docx::new().add_paragraph(heading("Job Title"));
        let (filled, missing) = fill_template(template, &record());
        assert_eq!(texts(&filled), vec!["Job Title", "Platform Engineer"]);
        assert_eq!(missing.len(), Anchor::ALL.len() - 1);
        assert!(!missing.contains(&Anchor::JobTitle));
    }

    #[test]
    fn test_shared_heading_keeps_anchor_order() {
        let template = Docx::new().add_paragraph(heading("Hard Skill / Soft Skill"));
        let (filled, _) = fill_template(template, &record());
        assert_eq!(
            texts(&filled),
            vec!["Hard Skill / Soft Skill", "- Rust", NOT_SPECIFIED]
        );
    }

    #[test]
    fn test_render_writes_filled_document() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.docx");
        let template = Docx::new()
            .add_paragraph(heading("Recent Employer"))
            .add_paragraph(heading("Job Title"));
        template
            .build()
            .pack(std::fs::File::create(&template_path).unwrap())
            .unwrap();

        let output = dir.path().join("jane.docx");
        DocxTemplateRenderer::new(&template_path)
            .render(&record(), &output)
            .unwrap();

        let text = docx_text_from_bytes(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(
            text,
            "Recent Employer\nNot Specified\nJob Title\nPlatform Engineer"
        );
    }

    #[test]
    fn test_missing_template_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocxTemplateRenderer::new(dir.path().join("missing.docx"))
            .render(&record(), &dir.path().join("out.docx"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
