//! Ollama chat client implementing [`GenerativeBackend`].

use async_trait::async_trait;
use quill_core::{BackendFailure, GenerationRequest, GenerationResult, GenerativeBackend};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::OllamaConfig;
use crate::error::Result;

/// Non-streaming client for `POST {host}/api/chat`.
pub struct OllamaBackend {
    config: OllamaConfig,
    client: Client,
}

impl OllamaBackend {
    /// Validate `config` and build the HTTP client.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OllamaConfig::from_env()?)
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    async fn attempt(&self, body: &Value) -> std::result::Result<String, AttemptFailure> {
        let response = self
            .client
            .post(self.config.chat_url())
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptFailure::retryable(self.map_transport(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AttemptFailure::retryable(self.map_transport(e)))?;
        if !status.is_success() {
            let failure = BackendFailure::Unreachable {
                detail: format!("HTTP {status}: {}", error_detail(&text)),
            };
            return Err(AttemptFailure {
                failure,
                retryable: is_retryable_status(status),
            });
        }
        parse_chat_response(&text).map_err(AttemptFailure::last)
    }

    fn map_transport(&self, err: reqwest::Error) -> BackendFailure {
        if err.is_timeout() {
            BackendFailure::Timeout {
                after_ms: self.config.request_timeout.as_millis() as u64,
            }
        } else {
            BackendFailure::Unreachable {
                detail: err.to_string(),
            }
        }
    }
}

/// A failed exchange and whether sending it again could help.
struct AttemptFailure {
    failure: BackendFailure,
    retryable: bool,
}

impl AttemptFailure {
    fn retryable(failure: BackendFailure) -> Self {
        Self {
            failure,
            retryable: true,
        }
    }

    fn last(failure: BackendFailure) -> Self {
        Self {
            failure,
            retryable: false,
        }
    }
}

/// Server-side trouble and rate limiting may clear up; other client errors
/// (unknown model, bad request) will not.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl GenerativeBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let body = chat_body(&self.config.model, request);
        let mut attempt = 0u32;
        loop {
            match self.attempt(&body).await {
                Ok(text) => return Ok(text),
                Err(AttemptFailure {
                    failure,
                    retryable: true,
                }) if attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * attempt;
                    warn!(
                        model = %self.config.model,
                        error = %failure,
                        attempt,
                        max_retries = self.config.max_retries,
                        "ollama request failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(AttemptFailure { failure, .. }) => {
                    debug!(model = %self.config.model, error = %failure, "ollama request failed");
                    return Err(failure);
                }
            }
        }
    }
}

/// Request body for a single-turn, non-streaming chat.
pub fn chat_body(model: &str, request: &GenerationRequest) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": request.prompt }],
        "stream": false,
        "options": {
            "num_predict": request.params.max_length,
            "temperature": request.params.temperature,
        },
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Pull `message.content` out of a chat response body.
pub fn parse_chat_response(body: &str) -> GenerationResult {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| BackendFailure::Unreachable {
            detail: format!("undecodable response: {e}"),
        })?;

    if let Some(error) = parsed.error {
        return Err(BackendFailure::Unreachable { detail: error });
    }
    match parsed.message {
        Some(message) if !message.content.trim().is_empty() => Ok(message.content),
        _ => Err(BackendFailure::Empty),
    }
}

fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
