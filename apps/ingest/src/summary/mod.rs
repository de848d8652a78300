//! The shared summary spreadsheet: one CSV row per processed resume.

pub mod durations;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::models::{ResumeRecord, NOT_SPECIFIED};
use durations::DurationEstimate;

/// Written to the durations column when no estimate could be produced.
const NO_ESTIMATE: &str = "N/A";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("summary CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// One spreadsheet row. Field order is column order; the serde names are the
/// header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Recent Employer")]
    pub recent_employer: String,
    #[serde(rename = "Most Recent Job Title")]
    pub job_title: String,
    #[serde(rename = "Professional Summary")]
    pub professional_summary: String,
    #[serde(rename = "Total Years of Experience")]
    pub total_years_of_experience: String,
    #[serde(rename = "Technologies Worked On")]
    pub technologies: String,
    #[serde(rename = "Technology Durations")]
    pub technology_durations: String,
}

impl SummaryRow {
    pub fn from_record(record: &ResumeRecord, durations: &DurationEstimate) -> Self {
        let personal = &record.personal_details;
        let technologies = if record.skills.hard.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            record.skills.hard.join(", ")
        };
        let technology_durations = if durations.is_empty() {
            NO_ESTIMATE.to_string()
        } else {
            durations
                .iter()
                .map(|(skill, months)| format!("{skill}: {months}"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            full_name: personal.full_name.clone(),
            email: personal.email.clone(),
            phone: personal.phone.clone(),
            location: personal.location.clone(),
            recent_employer: record.recent_employer.clone(),
            job_title: record.job_title.clone(),
            professional_summary: record.professional_summary.clone(),
            total_years_of_experience: record
                .total_years_of_experience
                .clone()
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            technologies,
            technology_durations,
        }
    }
}

/// Append-only destination for summary rows. Implementations are not safe
/// under concurrent writers; the batch owns exactly one.
pub trait SummarySink: Send + Sync {
    fn append(&self, row: &SummaryRow) -> Result<(), SummaryError>;
}

/// Writes rows to a CSV file, emitting the header only when the file is new.
pub struct CsvSummaryWriter {
    path: PathBuf,
}

impl CsvSummaryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummarySink for CsvSummaryWriter {
    fn append(&self, row: &SummaryRow) -> Result<(), SummaryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_new = std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}
