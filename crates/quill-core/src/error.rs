//! Error taxonomy for Quill.
//!
//! Only [`CoachError`] ever reaches the caller of a review. Backend
//! failures are normally absorbed into per-dimension critiques and surface
//! as [`CoachError::Backend`] only from the single-shot auxiliary tasks.

use serde::{Deserialize, Serialize};

/// Typed failure returned by a generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendFailure {
    #[error("backend timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("backend unreachable: {detail}")]
    Unreachable { detail: String },

    #[error("backend returned an empty response")]
    Empty,
}

impl BackendFailure {
    /// Whether a retry has any chance of a different outcome.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BackendFailure::Timeout { .. } | BackendFailure::Unreachable { .. }
        )
    }
}

/// Quill domain errors.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error("unknown genre: {genre}")]
    UnknownGenre { genre: String },

    #[error("manuscript text must not be empty")]
    EmptyManuscript,

    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    #[error("invalid guidance configuration: {0}")]
    InvalidGuidance(String),

    #[error(transparent)]
    Backend(#[from] BackendFailure),
}

/// Result type for Quill operations.
pub type Result<T> = std::result::Result<T, CoachError>;
