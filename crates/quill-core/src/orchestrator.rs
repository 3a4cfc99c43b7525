//! Feedback orchestration.
//!
//! [`FeedbackOrchestrator::review`] resolves the genre profile, runs one
//! [`DimensionAnalyzer`] per profile dimension concurrently, reassembles
//! the critiques in profile order and optionally asks for a summary.
//!
//! Only an unknown genre fails the call. Past that point a [`Review`] is
//! always returned: backend failures are per-dimension `Failed` entries and
//! low completeness is an advisory [`ReviewNote::PartialReview`].
//!
//! Dropping the future returned by `review` drops the task set, which
//! aborts every in-flight analysis; nothing partial is returned.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{instrument, warn, Instrument};
use uuid::Uuid;

use crate::analyzer::DimensionAnalyzer;
use crate::backend::{generate_checked, GenerationParams, GenerationRequest, GenerativeBackend};
use crate::domain::review::completeness_ratio;
use crate::domain::{
    CritiqueFailure, DimensionCritique, Genre, Manuscript, ManuscriptIdentity, Review, ReviewNote,
};
use crate::error::{BackendFailure, Result};
use crate::obs::{self, ReviewSpan};
use crate::prompts;
use crate::registry::{GenreProfile, GenreRegistry};

/// Tunables for a review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Maximum dimension analyses in flight at once. Zero is treated as one.
    pub max_concurrent: usize,
    /// Minimum succeeded/total ratio before a summary is attempted.
    /// A summary also always needs at least one success.
    pub min_completeness: f64,
    pub critique_params: GenerationParams,
    pub summary_params: GenerationParams,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            min_completeness: 0.5,
            critique_params: GenerationParams::new(1024, 0.7),
            summary_params: GenerationParams::new(768, 0.7),
        }
    }
}

pub struct FeedbackOrchestrator {
    backend: Arc<dyn GenerativeBackend>,
    registry: Arc<GenreRegistry>,
    config: ReviewConfig,
}

impl FeedbackOrchestrator {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        registry: Arc<GenreRegistry>,
        config: ReviewConfig,
    ) -> Self {
        Self {
            backend,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn registry(&self) -> &GenreRegistry {
        &self.registry
    }

    /// Review `manuscript` across every dimension of its genre profile.
    ///
    /// Fails only with `UnknownGenre`, before any backend call is made.
    #[instrument(skip(self, manuscript), fields(genre = %manuscript.genre()))]
    pub async fn review(&self, manuscript: &Manuscript) -> Result<Review> {
        let profile = self.registry.profile_for(manuscript.genre())?;
        let review_id = Uuid::new_v4();
        let started = Instant::now();
        obs::emit_review_started(review_id, profile.genre, profile.dimensions.len());

        let (critiques, summary, notes) = self
            .run(review_id, manuscript, &profile)
            .instrument(ReviewSpan::span(review_id))
            .await;

        let identity = ManuscriptIdentity {
            title: manuscript.title().map(str::to_string),
            genre: profile.genre.to_string(),
            word_count: manuscript.word_count(),
            digest: manuscript.digest(),
        };
        let review = Review::new(review_id, identity, critiques, summary, notes);

        obs::emit_review_finished(
            review_id,
            review.completeness_ratio(),
            review.summary().is_some(),
            started.elapsed().as_millis() as u64,
        );
        Ok(review)
    }

    async fn run(
        &self,
        review_id: Uuid,
        manuscript: &Manuscript,
        profile: &Arc<GenreProfile>,
    ) -> (Vec<DimensionCritique>, Option<String>, Vec<ReviewNote>) {
        let critiques = self.analyze_all(manuscript, profile).await;

        let total = critiques.len();
        let succeeded = critiques.iter().filter(|c| c.is_success()).count();
        let ratio = completeness_ratio(&critiques);
        let mut notes = Vec::new();

        if succeeded == 0 || ratio < self.config.min_completeness {
            obs::emit_summary_skipped(
                review_id,
                &format!(
                    "completeness {ratio:.2} below minimum {:.2}",
                    self.config.min_completeness
                ),
            );
            notes.push(ReviewNote::PartialReview {
                succeeded,
                total,
                min_completeness: self.config.min_completeness,
            });
            return (critiques, None, notes);
        }

        let summary = match self.summarize(manuscript, profile.genre, &critiques).await {
            Ok(text) => Some(text),
            Err(failure) => {
                obs::emit_summary_skipped(review_id, &failure);
                notes.push(ReviewNote::SummaryFailed { reason: failure });
                None
            }
        };
        (critiques, summary, notes)
    }

    /// One task per dimension; results land in their profile-index slot.
    async fn analyze_all(
        &self,
        manuscript: &Manuscript,
        profile: &Arc<GenreProfile>,
    ) -> Vec<DimensionCritique> {
        let analyzer =
            DimensionAnalyzer::new(Arc::clone(&self.backend), self.config.critique_params);
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let dimensions = profile.dimension_ids();

        let mut join_set = JoinSet::new();
        for (idx, dimension) in dimensions.iter().copied().enumerate() {
            let analyzer = analyzer.clone();
            let manuscript = manuscript.clone();
            let profile = Arc::clone(profile);
            let permits = Arc::clone(&permits);
            join_set.spawn(
                async move {
                    let _permit = permits.acquire_owned().await.ok();
                    let critique = analyzer.analyze(&manuscript, dimension, &profile).await;
                    (idx, critique)
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<DimensionCritique>> = vec![None; dimensions.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, critique)) => slots[idx] = Some(critique),
                Err(e) => warn!(error = %e, "dimension analysis task ended without a result"),
            }
        }

        dimensions
            .into_iter()
            .zip(slots)
            .map(|(dimension, slot)| {
                slot.unwrap_or_else(|| {
                    DimensionCritique::failed(
                        dimension,
                        CritiqueFailure::Interrupted {
                            detail: format!("{dimension} analysis task ended without a result"),
                        },
                    )
                })
            })
            .collect()
    }

    async fn summarize(
        &self,
        manuscript: &Manuscript,
        genre: Genre,
        critiques: &[DimensionCritique],
    ) -> std::result::Result<String, BackendFailure> {
        let prompt = prompts::summary_prompt(manuscript, genre, critiques);
        let request = GenerationRequest::new(prompt, self.config.summary_params);
        let text = generate_checked(self.backend.as_ref(), &request).await?;
        Ok(text.trim().to_string())
    }
}
