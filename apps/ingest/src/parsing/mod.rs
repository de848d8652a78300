//! Resume parsing: prompt the model, repair its output, decode JSON.
//!
//! The whole generate → repair → decode cycle is retried as a unit: a decode
//! failure on the first attempt triggers a fresh model call.

pub mod prompts;
pub mod repair;
pub mod retry;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{LlmError, ResumeModel};
use prompts::PromptTemplate;
use repair::{repair, RepairError};
use retry::{retry_bounded, RetryExhausted};

/// Attempts per resume: one call plus one retry.
pub const MAX_PARSE_ATTEMPTS: u32 = 2;

/// Characters of raw model output echoed to the debug log.
const RAW_OUTPUT_LOG_CHARS: usize = 1000;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model invocation failed: {0}")]
    Model(#[from] LlmError),

    #[error(transparent)]
    Repair(#[from] RepairError),

    #[error("model output is not valid JSON after repair: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ParseError {
    fn is_retryable(&self) -> bool {
        match self {
            ParseError::Model(e) => e.is_retryable(),
            ParseError::Repair(_) | ParseError::Decode(_) => true,
        }
    }
}

pub struct ResumeParser {
    model: Arc<dyn ResumeModel>,
    prompt: PromptTemplate,
    max_attempts: u32,
}

impl ResumeParser {
    pub fn new(model: Arc<dyn ResumeModel>, prompt: PromptTemplate) -> Self {
        Self {
            model,
            prompt,
            max_attempts: MAX_PARSE_ATTEMPTS,
        }
    }

    /// Returns the repaired, decoded JSON document for one resume's text.
    pub async fn parse(&self, resume_text: &str) -> Result<Value, RetryExhausted<ParseError>> {
        let prompt = self.prompt.render(resume_text);

        retry_bounded(self.max_attempts, ParseError::is_retryable, |attempt| {
            let prompt = &prompt;
            async move {
                let result = self.attempt(prompt).await;
                if let Err(e) = &result {
                    warn!(
                        "Parse attempt {}/{} failed: {e}",
                        attempt, self.max_attempts
                    );
                }
                result
            }
        })
        .await
    }

    async fn attempt(&self, prompt: &str) -> Result<Value, ParseError> {
        let raw = self.model.generate(prompt).await?;
        debug!(
            "Raw model output: {}",
            raw.chars().take(RAW_OUTPUT_LOG_CHARS).collect::<String>()
        );
        let repaired = repair(&raw)?;
        Ok(serde_json::from_str(&repaired)?)
    }
}
