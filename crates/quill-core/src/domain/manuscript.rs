//! The submitted piece of writing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoachError, Result};

/// Immutable manuscript value.
///
/// The text sits behind an `Arc<str>` so concurrent dimension analyses can
/// share it without copying. The genre is kept as the caller supplied it and
/// only resolved when a review starts.
#[derive(Debug, Clone)]
pub struct Manuscript {
    text: Arc<str>,
    genre: String,
    title: Option<String>,
}

impl Manuscript {
    /// Create a manuscript. Fails with [`CoachError::EmptyManuscript`] when
    /// the text is blank.
    pub fn new(text: impl Into<String>, genre: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CoachError::EmptyManuscript);
        }
        Ok(Self {
            text: Arc::from(text),
            genre: genre.into(),
            title: None,
        })
    }

    /// Attach a title. Blank titles are ignored.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        let trimmed = title.trim();
        self.title = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// SHA-256 hex digest of the text.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Identity of the reviewed manuscript, as recorded on a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptIdentity {
    pub title: Option<String>,
    pub genre: String,
    pub word_count: usize,
    /// SHA-256 hex digest of the manuscript text.
    pub digest: String,
}
