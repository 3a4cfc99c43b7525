//! Error types for quill-ollama

use thiserror::Error;

/// Errors raised while setting up an Ollama backend.
///
/// Failures of individual generation calls are not reported here; they are
/// mapped onto [`quill_core::BackendFailure`] so the review pipeline can
/// record them per dimension.
#[derive(Error, Debug)]
pub enum OllamaError {
    /// Host URL is not an http(s) URL
    #[error("Invalid Ollama host: {0}")]
    InvalidHost(String),

    /// Model name missing
    #[error("Model name must not be empty")]
    MissingModel,

    /// Environment variable holds an unusable value
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(err: reqwest::Error) -> Self {
        OllamaError::Client(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OllamaError>;
