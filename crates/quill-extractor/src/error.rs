//! Error types for the StyleExtractor

use thiserror::Error;

/// Errors that can escape style extraction
///
/// Missing samples, unparseable replies and partial replies all degrade to
/// a usable profile; only a model that cannot be reached surfaces here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleExtractionError {
    /// The model could not be invoked, even after retries
    #[error("LLM invocation failed after {attempts} attempt(s): {message}")]
    Llm {
        /// Number of calls made before giving up
        attempts: u32,
        /// Last failure reported by the provider
        message: String,
    },

    /// Invalid extractor configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a model reply could not be turned into a profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `{` or `[` in the reply
    #[error("No JSON payload found in response")]
    NoJson,

    /// Payload located but not valid JSON
    #[error("JSON parse error: {0}")]
    InvalidJson(String),

    /// The reply was an empty JSON array
    #[error("Expected a profile object, got an empty array")]
    EmptyArray,

    /// The payload (or its first array element) is not an object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::InvalidJson(e.to_string())
    }
}
