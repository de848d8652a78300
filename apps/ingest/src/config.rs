use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::extraction::{OcrConfig, OcrMode};

/// Batch configuration loaded from environment variables (and `.env`).
/// Every variable is optional; defaults match the conventional project layout.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub json_dir: PathBuf,
    pub summary_path: PathBuf,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub ocr_mode: OcrMode,
    pub ocr: OcrConfig,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            input_dir: var("INPUT_DIR", "resumes").into(),
            template_path: var("TEMPLATE_PATH", "templates/final_template.docx").into(),
            output_dir: var("OUTPUT_DIR", "outputs").into(),
            json_dir: var("JSON_DIR", "json").into(),
            summary_path: var("SUMMARY_PATH", "outputs/resume_summary.csv").into(),
            llm_base_url: var("LLM_BASE_URL", "http://localhost:11434"),
            llm_model: var("LLM_MODEL", "llama3"),
            llm_timeout: Duration::from_secs(
                var("LLM_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            ocr_mode: var("OCR_MODE", "auto")
                .parse::<OcrMode>()
                .map_err(|e| anyhow!(e))
                .context("OCR_MODE is invalid")?,
            ocr: OcrConfig {
                language: var("OCR_LANGUAGE", "eng"),
                dpi: var("OCR_DPI", "300")
                    .parse::<u32>()
                    .context("OCR_DPI must be a positive integer")?,
            },
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("resumes"));
        assert_eq!(config.summary_path, PathBuf::from("outputs/resume_summary.csv"));
        assert_eq!(config.llm_timeout, Duration::from_secs(120));
        assert_eq!(config.ocr_mode, OcrMode::Auto);
        assert_eq!(config.ocr, OcrConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("LLM_MODEL", "mistral"),
            ("OCR_MODE", "force"),
            ("OCR_DPI", "200"),
        ])
        .unwrap();
        assert_eq!(config.llm_model, "mistral");
        assert_eq!(config.ocr_mode, OcrMode::Force);
        assert_eq!(config.ocr.dpi, 200);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_with(&[("LLM_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_with(&[("OCR_MODE", "maybe")]).is_err());
    }
}
