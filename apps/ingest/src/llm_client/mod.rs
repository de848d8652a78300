/// LLM client: the single point of entry for model calls in the ingest pipeline.
///
/// Talks to an Ollama-compatible `/api/generate` endpoint. Only the raw
/// generated text is returned; JSON repair and decoding happen in `parsing`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GENERATE_PATH: &str = "/api/generate";
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Transport failures and timeouts are worth another attempt; a rejected
    /// request (4xx other than 429) is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) | LlmError::Timeout(_) | LlmError::EmptyContent => true,
            LlmError::RateLimited { .. } => true,
            LlmError::Api { status, .. } => *status >= 500,
        }
    }
}

/// The language-model collaborator: prompt in, raw generated text out.
#[async_trait]
pub trait ResumeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

/// HTTP client for the resume parsing model.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(base_url: &str, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
            model,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One generation request. 429 responses are retried here with
    /// exponential backoff (1s, 2s); every other failure is returned to the
    /// caller, whose retry budget decides what happens next.
    async fn call(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        for attempt in 0..MAX_RATE_LIMIT_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Model rate limited (attempt {}), retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&request_body)
                .send()
                .await
                .map_err(|e| self.classify(e))?;

            let status = response.status();

            if status.as_u16() == 429 {
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let generated: GenerateResponse =
                response.json().await.map_err(|e| self.classify(e))?;

            debug!(
                "Model call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                generated.prompt_eval_count, generated.eval_count
            );

            if generated.response.trim().is_empty() {
                return Err(LlmError::EmptyContent);
            }
            return Ok(generated.response);
        }

        Err(LlmError::RateLimited {
            retries: MAX_RATE_LIMIT_RETRIES,
        })
    }

    fn classify(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(error)
        }
    }
}

#[async_trait]
impl ResumeModel for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt).await
    }
}
