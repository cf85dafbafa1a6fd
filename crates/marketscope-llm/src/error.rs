//! Error types for the generation backend and response parsing.

use thiserror::Error;

/// A failed call to the generation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Backend unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Backend API error ({code}): {body}")]
    Status { code: u16, body: String },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Classify a transport error.
    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { secs: timeout_secs }
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Unreachable {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// Backend output that cannot be turned into the expected structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Empty response")]
    Empty,

    #[error("No JSON object found in response")]
    NoJson,

    #[error("Malformed JSON: {0}")]
    Json(String),

    #[error("Missing or empty field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{field}' is not a number: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("Expected {expected} distinct recommendations, got {got}")]
    TooFewRecommendations { expected: usize, got: usize },
}

/// Out-of-range backend configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid Ollama configuration: {field} {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
