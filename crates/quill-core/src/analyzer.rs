//! Single-dimension analysis.
//!
//! [`DimensionAnalyzer::analyze`] never returns an error. A backend failure
//! becomes a `Failed` critique for that dimension and a malformed response
//! becomes a `Raw` critique, so one dimension can never take down another.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::{generate_checked, GenerationParams, GenerationRequest, GenerativeBackend};
use crate::domain::{CraftDimension, DimensionCritique, Manuscript};
use crate::obs;
use crate::parse::parse_critique;
use crate::prompts;
use crate::registry::GenreProfile;

/// Builds the prompt for one dimension, calls the backend once and parses
/// the result. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct DimensionAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
    params: GenerationParams,
}

impl DimensionAnalyzer {
    pub fn new(backend: Arc<dyn GenerativeBackend>, params: GenerationParams) -> Self {
        Self { backend, params }
    }

    /// Critique `dimension` of `manuscript` under `profile`.
    ///
    /// Uses the profile's guidance for the dimension, or generic guidance
    /// when the profile does not list it.
    pub async fn analyze(
        &self,
        manuscript: &Manuscript,
        dimension: CraftDimension,
        profile: &GenreProfile,
    ) -> DimensionCritique {
        let guidance = guidance_for(profile, dimension);
        let prompt = prompts::critique_prompt(manuscript, profile.genre, dimension, &guidance);
        self.run(dimension, prompt).await
    }

    /// Like [`analyze`](Self::analyze) but with the element-lesson prompt,
    /// which also asks for techniques, exercises and mentor texts.
    pub async fn analyze_focused(
        &self,
        manuscript: &Manuscript,
        dimension: CraftDimension,
        profile: &GenreProfile,
    ) -> DimensionCritique {
        let guidance = guidance_for(profile, dimension);
        let prompt =
            prompts::element_analysis_prompt(manuscript, profile.genre, dimension, &guidance);
        self.run(dimension, prompt).await
    }

    async fn run(&self, dimension: CraftDimension, prompt: String) -> DimensionCritique {
        let request = GenerationRequest::new(prompt, self.params);

        let started = Instant::now();
        let result = generate_checked(self.backend.as_ref(), &request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                let critique = parse_critique(&text);
                if !critique.is_structured() {
                    debug!(%dimension, "response had no recognisable structure, keeping raw");
                }
                obs::emit_dimension_finished(dimension, true, elapsed_ms);
                DimensionCritique::succeeded(dimension, critique)
            }
            Err(failure) => {
                warn!(
                    %dimension,
                    backend = %self.backend.name(),
                    error = %failure,
                    "dimension analysis failed"
                );
                obs::emit_dimension_finished(dimension, false, elapsed_ms);
                DimensionCritique::failed(dimension, failure)
            }
        }
    }
}

fn guidance_for(profile: &GenreProfile, dimension: CraftDimension) -> String {
    profile
        .guidance_for(dimension)
        .map(|g| g.guidance.clone())
        .unwrap_or_else(|| prompts::generic_guidance(dimension))
}
