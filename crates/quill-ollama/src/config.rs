//! Connection settings for the Ollama backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OllamaError, Result};

pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const HOST_VAR: &str = "QUILL_OLLAMA_HOST";
pub const MODEL_VAR: &str = "QUILL_MODEL";
pub const TIMEOUT_VAR: &str = "QUILL_REQUEST_TIMEOUT_SECS";

/// Ollama configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    pub host: String,
    /// Model to generate with
    pub model: String,
    /// Per-request timeout, covering connect and body
    pub request_timeout: Duration,
    /// Extra attempts after a transient failure
    pub max_retries: u32,
    /// Delay before the first retry; grows linearly per attempt
    pub retry_backoff: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl OllamaConfig {
    /// Create a config for a specific server and model
    pub fn new(host: &str, model: &str) -> Self {
        OllamaConfig {
            host: host.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    /// Read `QUILL_OLLAMA_HOST`, `QUILL_MODEL` and
    /// `QUILL_REQUEST_TIMEOUT_SECS`, falling back to defaults for unset or
    /// blank variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = env_value(HOST_VAR) {
            config.host = host;
        }
        if let Some(model) = env_value(MODEL_VAR) {
            config.model = model;
        }
        if let Some(raw) = env_value(TIMEOUT_VAR) {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| OllamaError::InvalidEnv {
                    var: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    /// `{host}/api/chat`, tolerating a trailing slash on the host.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(OllamaError::InvalidHost(self.host.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(OllamaError::MissingModel);
        }
        Ok(())
    }
}

fn env_value(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
