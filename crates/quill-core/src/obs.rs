//! Structured observability hooks for the review lifecycle.
//!
//! - `ReviewSpan` RAII guard tagging everything inside a review with its id
//! - emission functions for review start/finish, per-dimension completion
//!   and skipped summaries
//!
//! Events are emitted at `info!` level unless noted. Filter with `RUST_LOG`.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{CraftDimension, Genre};

/// Span covering one review.
///
/// Hold the guard only in synchronous code; across `.await` points use
/// [`ReviewSpan::span`] with `Instrument` instead.
pub struct ReviewSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReviewSpan {
    pub fn enter(review_id: Uuid) -> Self {
        Self {
            _span: Self::span(review_id).entered(),
        }
    }

    pub fn span(review_id: Uuid) -> tracing::Span {
        tracing::info_span!("quill.review", review_id = %review_id)
    }
}

pub fn emit_review_started(review_id: Uuid, genre: Genre, dimensions: usize) {
    info!(
        event = "review.started",
        review_id = %review_id,
        genre = %genre,
        dimensions = dimensions,
    );
}

pub fn emit_dimension_finished(dimension: CraftDimension, success: bool, duration_ms: u64) {
    info!(
        event = "dimension.finished",
        dimension = %dimension,
        success = success,
        duration_ms = duration_ms,
    );
}

pub fn emit_review_finished(
    review_id: Uuid,
    completeness_ratio: f64,
    has_summary: bool,
    duration_ms: u64,
) {
    info!(
        event = "review.finished",
        review_id = %review_id,
        completeness_ratio = completeness_ratio,
        has_summary = has_summary,
        duration_ms = duration_ms,
    );
}

/// Summary not produced (warning level).
pub fn emit_summary_skipped(review_id: Uuid, reason: &dyn std::fmt::Display) {
    warn!(event = "summary.skipped", review_id = %review_id, reason = %reason);
}
