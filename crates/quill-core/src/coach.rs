//! Caller-facing façade over one shared backend.

use std::sync::Arc;

use crate::auxiliary::{AuxiliaryGenerators, AuxiliaryOutput, PromptConstraints};
use crate::backend::{GenerationParams, GenerativeBackend};
use crate::domain::{CraftDimension, DimensionCritique, Manuscript, Review};
use crate::error::Result;
use crate::orchestrator::{FeedbackOrchestrator, ReviewConfig};
use crate::registry::GenreRegistry;

pub struct Coach {
    orchestrator: FeedbackOrchestrator,
    auxiliary: AuxiliaryGenerators,
}

impl Coach {
    /// Built-in genre profiles and default review settings.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self::with_parts(backend, GenreRegistry::builtin(), ReviewConfig::default())
    }

    pub fn with_parts(
        backend: Arc<dyn GenerativeBackend>,
        registry: GenreRegistry,
        config: ReviewConfig,
    ) -> Self {
        let registry = Arc::new(registry);
        Self {
            orchestrator: FeedbackOrchestrator::new(
                Arc::clone(&backend),
                Arc::clone(&registry),
                config,
            ),
            auxiliary: AuxiliaryGenerators::new(
                backend,
                registry,
                GenerationParams::new(1536, 0.8),
            ),
        }
    }

    pub fn registry(&self) -> &GenreRegistry {
        self.orchestrator.registry()
    }

    pub async fn review(&self, manuscript: &Manuscript) -> Result<Review> {
        self.orchestrator.review(manuscript).await
    }

    pub async fn analyze_element(
        &self,
        manuscript: &Manuscript,
        dimension: CraftDimension,
    ) -> Result<DimensionCritique> {
        self.auxiliary.analyze_element(manuscript, dimension).await
    }

    pub async fn generate_prompt(
        &self,
        genre: &str,
        constraints: &PromptConstraints,
    ) -> Result<AuxiliaryOutput> {
        self.auxiliary.generate_prompt(genre, constraints).await
    }

    pub async fn expand_scene(
        &self,
        scene: &str,
        direction: Option<&str>,
    ) -> Result<AuxiliaryOutput> {
        self.auxiliary.expand_scene(scene, direction).await
    }

    pub async fn coach_dialogue(
        &self,
        dialogue: &str,
        context: Option<&str>,
    ) -> Result<AuxiliaryOutput> {
        self.auxiliary.coach_dialogue(dialogue, context).await
    }
}
