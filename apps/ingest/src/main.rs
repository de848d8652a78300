//! resume-ingest: turns a folder of PDF/DOCX resumes into structured JSON,
//! a filled document template per resume, and a shared summary spreadsheet.
//!
//! Usage:
//!   resume-ingest [run]                        Process every resume in INPUT_DIR
//!   resume-ingest render <json> [-o <docx>]    Re-render a saved JSON artifact

mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod parsing;
mod pipeline;
mod reconcile;
mod render;
mod summary;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::DocumentExtractor;
use crate::llm_client::LlmClient;
use crate::parsing::prompts::PromptTemplate;
use crate::parsing::ResumeParser;
use crate::pipeline::{discover_resumes, Pipeline, PipelineSettings};
use crate::render::{DocxTemplateRenderer, TemplateRenderer};
use crate::summary::CsvSummaryWriter;

#[derive(Debug, Parser)]
#[command(name = "resume-ingest", version, about = "Structured resume ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process every resume in INPUT_DIR (the default).
    Run,
    /// Fill the template from a saved JSON artifact without calling the model.
    Render {
        /// JSON artifact written by a previous run.
        json: PathBuf,
        /// Output document; defaults to OUTPUT_DIR/<json stem>.docx.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-ingest v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_batch(&config).await,
        Command::Render { json, output } => render_from_json(&config, &json, output),
    }
}

async fn run_batch(config: &Config) -> Result<()> {
    for dir in [&config.output_dir, &config.json_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let files = discover_resumes(&config.input_dir)
        .with_context(|| format!("Failed to read input folder {}", config.input_dir.display()))?;
    info!(
        "Found {} resume(s) in {}",
        files.len(),
        config.input_dir.display()
    );

    let llm = LlmClient::new(
        &config.llm_base_url,
        config.llm_model.clone(),
        config.llm_timeout,
    );
    info!("LLM client initialized (model: {})", llm.model());

    let summary = CsvSummaryWriter::new(&config.summary_path);
    info!("Appending summary rows to {}", summary.path().display());

    let pipeline = Pipeline::new(
        Arc::new(DocumentExtractor::new(config.ocr.clone())),
        ResumeParser::new(Arc::new(llm), PromptTemplate::default()),
        Arc::new(summary),
        Arc::new(DocxTemplateRenderer::new(&config.template_path)),
        PipelineSettings {
            ocr_mode: config.ocr_mode,
            output_dir: config.output_dir.clone(),
            json_dir: config.json_dir.clone(),
        },
    );

    pipeline.run_batch(&files).await;
    Ok(())
}

fn render_from_json(config: &Config, json_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let contents = std::fs::read_to_string(json_path)
        .with_context(|| format!("JSON file not found: {}", json_path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", json_path.display()))?;
    let record = reconcile::reconcile_value(value);

    let output = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&config.output_dir)
                .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
            let stem = json_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "resume".to_string());
            config.output_dir.join(format!("{stem}.docx"))
        }
    };

    DocxTemplateRenderer::new(&config.template_path)
        .render(&record, &output)
        .with_context(|| format!("Failed to render {}", output.display()))?;
    Ok(())
}
