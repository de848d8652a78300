use thiserror::Error;

use crate::extraction::ExtractError;
use crate::llm_client::LlmError;
use crate::parsing::repair::RepairError;
use crate::parsing::retry::RetryExhausted;
use crate::parsing::ParseError;
use crate::render::RenderError;
use crate::summary::SummaryError;

/// Why a single resume did not make it (fully) through the pipeline.
/// None of these stop the batch.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no text could be extracted from {0}")]
    ExtractionEmpty(String),

    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("model invocation failed after {attempts} attempt(s): {source}")]
    ModelInvocation {
        attempts: u32,
        #[source]
        source: LlmError,
    },

    #[error("no JSON in model output after {attempts} attempt(s): {source}")]
    JsonRepair {
        attempts: u32,
        #[source]
        source: RepairError,
    },

    #[error("model output did not decode after {attempts} attempt(s): {source}")]
    JsonDecode {
        attempts: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("template rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("spreadsheet append failed: {0}")]
    SpreadsheetAppend(#[from] SummaryError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<RetryExhausted<ParseError>> for IngestError {
    fn from(exhausted: RetryExhausted<ParseError>) -> Self {
        let attempts = exhausted.attempts;
        match exhausted.last_error {
            ParseError::Model(source) => IngestError::ModelInvocation { attempts, source },
            ParseError::Repair(source) => IngestError::JsonRepair { attempts, source },
            ParseError::Decode(source) => IngestError::JsonDecode { attempts, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_parse_maps_to_taxonomy() {
        let err: IngestError = RetryExhausted {
            attempts: 2,
            last_error: ParseError::Repair(RepairError::NoJsonFound),
        }
        .into();
        assert!(matches!(err, IngestError::JsonRepair { attempts: 2, .. }));

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: IngestError = RetryExhausted {
            attempts: 2,
            last_error: ParseError::Decode(decode),
        }
        .into();
        assert!(err.to_string().starts_with("model output did not decode after 2"));

        let err: IngestError = RetryExhausted {
            attempts: 1,
            last_error: ParseError::Model(LlmError::EmptyContent),
        }
        .into();
        assert!(matches!(err, IngestError::ModelInvocation { attempts: 1, .. }));
    }
}
