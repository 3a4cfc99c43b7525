//! The aggregate review returned to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::critique::{CritiqueStatus, DimensionCritique};
use crate::domain::manuscript::ManuscriptIdentity;
use crate::error::BackendFailure;

/// Advisory conditions attached to a review. None of these are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewNote {
    /// Too few dimensions succeeded for a summary to be meaningful.
    PartialReview {
        succeeded: usize,
        total: usize,
        min_completeness: f64,
    },
    /// The summary call itself failed; the critiques are unaffected.
    SummaryFailed { reason: BackendFailure },
}

/// Multi-dimension review of one manuscript.
///
/// `critiques` holds exactly one entry per dimension of the genre profile,
/// in profile order. Fields are private so a constructed review cannot be
/// altered; use the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    review_id: Uuid,
    created_at: DateTime<Utc>,
    manuscript: ManuscriptIdentity,
    critiques: Vec<DimensionCritique>,
    summary: Option<String>,
    completeness_ratio: f64,
    notes: Vec<ReviewNote>,
}

impl Review {
    pub(crate) fn new(
        review_id: Uuid,
        manuscript: ManuscriptIdentity,
        critiques: Vec<DimensionCritique>,
        summary: Option<String>,
        notes: Vec<ReviewNote>,
    ) -> Self {
        let completeness_ratio = completeness_ratio(&critiques);
        Self {
            review_id,
            created_at: Utc::now(),
            manuscript,
            critiques,
            summary,
            completeness_ratio,
            notes,
        }
    }

    pub fn review_id(&self) -> Uuid {
        self.review_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn manuscript(&self) -> &ManuscriptIdentity {
        &self.manuscript
    }

    pub fn critiques(&self) -> &[DimensionCritique] {
        &self.critiques
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Succeeded critiques over total critiques, in `[0.0, 1.0]`.
    pub fn completeness_ratio(&self) -> f64 {
        self.completeness_ratio
    }

    pub fn notes(&self) -> &[ReviewNote] {
        &self.notes
    }

    pub fn succeeded_count(&self) -> usize {
        self.critiques.iter().filter(|c| c.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.critiques
            .iter()
            .filter(|c| c.status() == CritiqueStatus::Failed)
            .count()
    }

    pub fn is_partial(&self) -> bool {
        self.notes
            .iter()
            .any(|n| matches!(n, ReviewNote::PartialReview { .. }))
    }
}

/// `succeeded / total`; an empty set counts as complete.
pub fn completeness_ratio(critiques: &[DimensionCritique]) -> f64 {
    if critiques.is_empty() {
        return 1.0;
    }
    let succeeded = critiques.iter().filter(|c| c.is_success()).count();
    succeeded as f64 / critiques.len() as f64
}
