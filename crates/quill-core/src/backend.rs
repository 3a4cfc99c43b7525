//! Generative backend boundary.
//!
//! Everything Quill knows about text generation goes through
//! [`GenerativeBackend`]. Implementations decide how text is produced and
//! own any retry policy; callers only see text or a [`BackendFailure`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendFailure;

/// Sampling parameters for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_length: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 1024,
            temperature: 0.7,
        }
    }
}

impl GenerationParams {
    pub fn new(max_length: u32, temperature: f32) -> Self {
        Self {
            max_length,
            temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            params,
        }
    }
}

pub type GenerationResult = std::result::Result<String, BackendFailure>;

/// A text-generation capability.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Generate text for `request`.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}

/// Call `backend` and treat whitespace-only output as [`BackendFailure::Empty`].
///
/// Every caller in this crate goes through here so the empty-response rule
/// holds no matter which backend is plugged in.
pub async fn generate_checked(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
) -> GenerationResult {
    let text = backend.generate(request).await?;
    if text.trim().is_empty() {
        return Err(BackendFailure::Empty);
    }
    Ok(text)
}
