//! Batch orchestration: drives each resume through
//! extraction → model → repair → reconciliation → outputs.
//!
//! Files are processed one at a time. A failure is confined to its file; the
//! only state shared across files is the summary sink.

pub mod discover;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::IngestError;
use crate::extraction::{OcrMode, TextExtractor};
use crate::models::ResumeRecord;
use crate::parsing::ResumeParser;
use crate::reconcile::reconcile_value;
use crate::render::TemplateRenderer;
use crate::summary::durations::estimate;
use crate::summary::{SummaryRow, SummarySink};

pub use discover::discover_resumes;

/// Per-file lifecycle. `Done`, `Skipped` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Discovered,
    TextExtracted,
    ModelQueried,
    JsonRepaired,
    Reconciled,
    Rendered,
    Done,
    Skipped,
    Failed,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub file: PathBuf,
    /// Terminal state.
    pub state: FileState,
    /// Last non-terminal state reached before `state`.
    pub stage: FileState,
    /// The abort reason for `Skipped`/`Failed`, or side-effect failures for `Done`.
    pub errors: Vec<IngestError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    fn count(&self, state: FileState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    pub fn done(&self) -> usize {
        self.count(FileState::Done)
    }

    pub fn skipped(&self) -> usize {
        self.count(FileState::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(FileState::Failed)
    }
}

/// Where artifacts go and how text is extracted.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub ocr_mode: OcrMode,
    pub output_dir: PathBuf,
    pub json_dir: PathBuf,
}

pub struct Pipeline {
    extractor: Arc<dyn TextExtractor>,
    parser: ResumeParser,
    summary: Arc<dyn SummarySink>,
    renderer: Arc<dyn TemplateRenderer>,
    settings: PipelineSettings,
}

/// Tracks one file's progress so each transition is logged once.
struct Progress<'a> {
    file: &'a Path,
    stage: FileState,
}

impl Progress<'_> {
    fn advance(&mut self, next: FileState) {
        debug!("{}: {} → {}", self.file.display(), self.stage, next);
        self.stage = next;
    }

    fn finish(self, state: FileState, errors: Vec<IngestError>) -> FileOutcome {
        FileOutcome {
            file: self.file.to_path_buf(),
            state,
            stage: self.stage,
            errors,
        }
    }
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        parser: ResumeParser,
        summary: Arc<dyn SummarySink>,
        renderer: Arc<dyn TemplateRenderer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            extractor,
            parser,
            summary,
            renderer,
            settings,
        }
    }

    /// Processes every file in order. Never fails as a whole.
    pub async fn run_batch(&self, files: &[PathBuf]) -> BatchReport {
        if files.is_empty() {
            warn!("No resumes found to process");
            return BatchReport::default();
        }

        let mut report = BatchReport::default();
        for file in files {
            let outcome = self.process_file(file).await;
            for err in &outcome.errors {
                match outcome.state {
                    FileState::Failed => error!("{}: {err}", outcome.file.display()),
                    _ => warn!("{}: {err}", outcome.file.display()),
                }
            }
            report.outcomes.push(outcome);
        }

        info!(
            "Batch complete: {} done, {} skipped, {} failed",
            report.done(),
            report.skipped(),
            report.failed()
        );
        report
    }

    pub async fn process_file(&self, file: &Path) -> FileOutcome {
        let mut progress = Progress {
            file,
            stage: FileState::Discovered,
        };
        info!(
            "Processing {} (OCR mode: {})",
            file.display(),
            self.settings.ocr_mode
        );

        let text = match self.extractor.extract_text(file, self.settings.ocr_mode) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                let err = IngestError::ExtractionEmpty(file.display().to_string());
                return progress.finish(FileState::Skipped, vec![err]);
            }
            Err(e) => return progress.finish(FileState::Skipped, vec![e.into()]),
        };
        progress.advance(FileState::TextExtracted);

        let value = match self.parser.parse(&text).await {
            Ok(value) => value,
            Err(exhausted) => {
                return progress.finish(FileState::Failed, vec![exhausted.into()]);
            }
        };
        progress.advance(FileState::ModelQueried);
        progress.advance(FileState::JsonRepaired);

        let record = reconcile_value(value);
        progress.advance(FileState::Reconciled);

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        let json_path = self.settings.json_dir.join(format!("{stem}.json"));
        if let Err(e) = write_json_artifact(&json_path, &record) {
            return progress.finish(FileState::Failed, vec![e]);
        }
        info!("Saved structured JSON: {}", json_path.display());

        let mut errors = Vec::new();

        let durations = estimate(&record, &record.skills.hard);
        let row = SummaryRow::from_record(&record, &durations);
        if let Err(e) = self.summary.append(&row) {
            errors.push(IngestError::from(e));
        }

        let docx_path = self.settings.output_dir.join(format!("{stem}.docx"));
        match self.renderer.render(&record, &docx_path) {
            Ok(()) => progress.advance(FileState::Rendered),
            Err(e) => errors.push(IngestError::from(e)),
        }

        progress.finish(FileState::Done, errors)
    }
}

/// Pretty-printed (2-space) UTF-8 JSON, exactly the reconciled record.
pub fn write_json_artifact(path: &Path, record: &ResumeRecord) -> Result<(), IngestError> {
    let io_err = |source| IngestError::Io {
        path: path.display().to_string(),
        source,
    };
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    std::fs::write(path, json).map_err(io_err)
}
