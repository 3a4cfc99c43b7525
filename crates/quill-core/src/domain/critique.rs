//! Per-dimension critique records.

use serde::{Deserialize, Serialize};

use crate::domain::genre::CraftDimension;
use crate::error::BackendFailure;

/// Best-effort parse of untrusted model output.
///
/// `Raw` keeps the response verbatim when no expected structure was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "content", rename_all = "snake_case")]
pub enum Parsed<T> {
    Structured(T),
    Raw(String),
}

impl<T> Parsed<T> {
    pub fn is_structured(&self) -> bool {
        matches!(self, Parsed::Structured(_))
    }

    pub fn structured(&self) -> Option<&T> {
        match self {
            Parsed::Structured(value) => Some(value),
            Parsed::Raw(_) => None,
        }
    }
}

/// The three-part critique a dimension analysis asks for.
///
/// Focused element analyses may also fill the study lists: techniques the
/// writer already uses, practice exercises and published works to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueSections {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    /// 0-100, when the model offered one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub techniques: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentor_texts: Vec<String>,
}

impl CritiqueSections {
    /// No list has content. A score alone does not count as a critique.
    pub fn is_empty(&self) -> bool {
        self.lists().all(|(_, items)| items.is_empty())
    }

    fn lists(&self) -> impl Iterator<Item = (&'static str, &Vec<String>)> {
        [
            ("Strengths", &self.strengths),
            ("Weaknesses", &self.weaknesses),
            ("Suggestions", &self.suggestions),
            ("Techniques used", &self.techniques),
            ("Exercises", &self.exercises),
            ("Mentor texts", &self.mentor_texts),
        ]
        .into_iter()
    }

    /// Plain-text rendering used when feeding critiques into a summary prompt.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (heading, items) in self.lists() {
            if items.is_empty() {
                continue;
            }
            out.push_str(heading);
            out.push_str(":\n");
            for item in items {
                out.push_str("- ");
                out.push_str(item);
                out.push('\n');
            }
        }
        if let Some(score) = self.score {
            out.push_str(&format!("Score: {score}/100\n"));
        }
        out
    }
}

impl Parsed<CritiqueSections> {
    pub fn to_plain_text(&self) -> String {
        match self {
            Parsed::Structured(sections) => sections.to_plain_text(),
            Parsed::Raw(text) => text.clone(),
        }
    }
}

/// Why a dimension has no critique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum CritiqueFailure {
    #[error(transparent)]
    Backend(BackendFailure),

    /// The analysis task ended without producing a result.
    #[error("analysis interrupted: {detail}")]
    Interrupted { detail: String },
}

impl From<BackendFailure> for CritiqueFailure {
    fn from(failure: BackendFailure) -> Self {
        CritiqueFailure::Backend(failure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueStatus {
    Succeeded,
    Failed,
}

/// Outcome of analyzing one dimension. The critique exists iff it succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CritiqueOutcome {
    Succeeded { critique: Parsed<CritiqueSections> },
    Failed { reason: CritiqueFailure },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionCritique {
    pub dimension: CraftDimension,
    #[serde(flatten)]
    pub outcome: CritiqueOutcome,
}

impl DimensionCritique {
    pub fn succeeded(dimension: CraftDimension, critique: Parsed<CritiqueSections>) -> Self {
        Self {
            dimension,
            outcome: CritiqueOutcome::Succeeded { critique },
        }
    }

    pub fn failed(dimension: CraftDimension, reason: impl Into<CritiqueFailure>) -> Self {
        Self {
            dimension,
            outcome: CritiqueOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn status(&self) -> CritiqueStatus {
        match self.outcome {
            CritiqueOutcome::Succeeded { .. } => CritiqueStatus::Succeeded,
            CritiqueOutcome::Failed { .. } => CritiqueStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == CritiqueStatus::Succeeded
    }

    pub fn critique(&self) -> Option<&Parsed<CritiqueSections>> {
        match &self.outcome {
            CritiqueOutcome::Succeeded { critique } => Some(critique),
            CritiqueOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&CritiqueFailure> {
        match &self.outcome {
            CritiqueOutcome::Succeeded { .. } => None,
            CritiqueOutcome::Failed { reason } => Some(reason),
        }
    }
}
