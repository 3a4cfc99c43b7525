//! Ollama backend for Quill
//!
//! Speaks the Ollama `/api/chat` protocol over HTTP and maps transport
//! problems onto [`quill_core::BackendFailure`]. Transient failures are
//! retried with linear backoff; the core pipeline never retries.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{chat_body, parse_chat_response, OllamaBackend};
pub use config::OllamaConfig;
pub use error::{OllamaError, Result};
