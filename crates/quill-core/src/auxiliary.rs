//! Single-shot generators that bypass the review pipeline.
//!
//! Each call builds one prompt, makes one backend call and returns the text
//! with a best-effort JSON parse of it. Unlike review dimensions, a backend
//! failure here is returned to the caller as [`CoachError::Backend`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::analyzer::DimensionAnalyzer;
use crate::backend::{generate_checked, GenerationParams, GenerationRequest, GenerativeBackend};
use crate::domain::{CraftDimension, DimensionCritique, Manuscript, Parsed};
use crate::error::{CoachError, Result};
use crate::parse::parse_json_body;
use crate::prompts;
use crate::registry::GenreRegistry;

/// Optional steering for writing-prompt generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConstraints {
    pub theme: Option<String>,
    pub constraints: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxiliaryTask {
    WritingPrompt,
    SceneExpansion,
    DialogueCoaching,
}

impl std::fmt::Display for AuxiliaryTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuxiliaryTask::WritingPrompt => "writing_prompt",
            AuxiliaryTask::SceneExpansion => "scene_expansion",
            AuxiliaryTask::DialogueCoaching => "dialogue_coaching",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryOutput {
    pub task: AuxiliaryTask,
    /// Generated text, verbatim.
    pub text: String,
    pub body: Parsed<Value>,
}

pub struct AuxiliaryGenerators {
    backend: Arc<dyn GenerativeBackend>,
    registry: Arc<GenreRegistry>,
    params: GenerationParams,
}

impl AuxiliaryGenerators {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        registry: Arc<GenreRegistry>,
        params: GenerationParams,
    ) -> Self {
        Self {
            backend,
            registry,
            params,
        }
    }

    /// Generate a writing prompt for `genre`. The genre is validated before
    /// any backend call.
    #[instrument(skip(self, constraints))]
    pub async fn generate_prompt(
        &self,
        genre: &str,
        constraints: &PromptConstraints,
    ) -> Result<AuxiliaryOutput> {
        let profile = self.registry.profile_for(genre)?;
        let prompt = prompts::writing_prompt_prompt(profile.genre, constraints);
        self.run(AuxiliaryTask::WritingPrompt, prompt).await
    }

    #[instrument(skip_all)]
    pub async fn expand_scene(
        &self,
        scene: &str,
        direction: Option<&str>,
    ) -> Result<AuxiliaryOutput> {
        require("scene text", scene)?;
        let prompt = prompts::scene_expansion_prompt(scene.trim(), non_blank(direction));
        self.run(AuxiliaryTask::SceneExpansion, prompt).await
    }

    #[instrument(skip_all)]
    pub async fn coach_dialogue(
        &self,
        dialogue: &str,
        context: Option<&str>,
    ) -> Result<AuxiliaryOutput> {
        require("dialogue excerpt", dialogue)?;
        let prompt = prompts::dialogue_coaching_prompt(dialogue.trim(), non_blank(context));
        self.run(AuxiliaryTask::DialogueCoaching, prompt).await
    }

    /// Focused analysis of one craft dimension, outside a full review.
    ///
    /// Asks for techniques, exercises and mentor texts on top of the usual
    /// critique. The dimension need not be part of the genre's profile.
    /// Backend failures come back as a `Failed` critique, as in a review.
    #[instrument(skip(self, manuscript), fields(genre = %manuscript.genre()))]
    pub async fn analyze_element(
        &self,
        manuscript: &Manuscript,
        dimension: CraftDimension,
    ) -> Result<DimensionCritique> {
        let profile = self.registry.profile_for(manuscript.genre())?;
        let analyzer = DimensionAnalyzer::new(Arc::clone(&self.backend), self.params);
        let critique = analyzer
            .analyze_focused(manuscript, dimension, &profile)
            .await;
        Ok(critique)
    }

    async fn run(&self, task: AuxiliaryTask, prompt: String) -> Result<AuxiliaryOutput> {
        let request = GenerationRequest::new(prompt, self.params);
        let text = generate_checked(self.backend.as_ref(), &request).await?;
        let body = parse_json_body(&text);
        debug!(%task, structured = body.is_structured(), "auxiliary generation finished");
        Ok(AuxiliaryOutput { task, text, body })
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoachError::EmptyInput { field });
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendFailure;
    use crate::fakes::{Reply, ScriptedBackend};

    fn generators(backend: Arc<ScriptedBackend>) -> AuxiliaryGenerators {
        AuxiliaryGenerators::new(
            backend,
            Arc::new(GenreRegistry::builtin()),
            GenerationParams::default(),
        )
    }

    #[tokio::test]
    async fn test_generate_prompt_parses_json_body() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(
            r#"{"prompt": {"main_prompt": "Write about a lighthouse keeper's last night."}}"#,
        )));
        let aux = generators(backend.clone());

        let out = aux
            .generate_prompt(
                "Short Story",
                &PromptConstraints {
                    theme: Some("solitude".to_string()),
                    constraints: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(out.task, AuxiliaryTask::WritingPrompt);
        let body = out.body.structured().unwrap();
        assert_eq!(
            body["prompt"]["main_prompt"],
            "Write about a lighthouse keeper's last night."
        );
        assert!(backend.prompts()[0].contains("Theme (if specified): solitude"));
    }

    #[tokio::test]
    async fn test_generate_prompt_rejects_unknown_genre_without_calling() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text("x")));
        let aux = generators(backend.clone());

        let err = aux
            .generate_prompt("Haiku", &PromptConstraints::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CoachError::UnknownGenre { .. }));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_expand_scene_returns_raw_when_unstructured() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(
            "Rain hammered the tin roof.",
        )));
        let aux = generators(backend);

        let out = aux
            .expand_scene("A storm at the farm.", Some("  "))
            .await
            .unwrap();

        assert_eq!(
            out.body,
            Parsed::Raw("Rain hammered the tin roof.".to_string())
        );
        assert_eq!(out.text, "Rain hammered the tin roof.");
    }

    #[tokio::test]
    async fn test_coach_dialogue_surfaces_backend_failure() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::fail(
            BackendFailure::Timeout { after_ms: 500 },
        )));
        let aux = generators(backend);

        let err = aux
            .coach_dialogue("\"Fine,\" she said.", Some("after the funeral"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoachError::Backend(BackendFailure::Timeout { after_ms: 500 })
        ));
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected_before_calling() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text("x")));
        let aux = generators(backend.clone());

        assert!(matches!(
            aux.expand_scene(" ", None).await,
            Err(CoachError::EmptyInput { field: "scene text" })
        ));
        assert!(matches!(
            aux.coach_dialogue("", None).await,
            Err(CoachError::EmptyInput { .. })
        ));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_element_outside_profile() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(
            "Strengths: the porch is vivid\nWeaknesses: the town is vague",
        )));
        let aux = generators(backend.clone());
        let manuscript = Manuscript::new("It was a dark night.", "Flash Fiction").unwrap();

        let critique = aux
            .analyze_element(&manuscript, CraftDimension::Setting)
            .await
            .unwrap();

        assert_eq!(critique.dimension, CraftDimension::Setting);
        assert!(critique.critique().unwrap().is_structured());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_element_asks_for_study_material() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(
            r#"{"weaknesses": ["every line sounds alike"], "improvement_exercises": ["write the scene as a voicemail"], "mentor_texts": ["Raymond Carver"]}"#,
        )));
        let aux = generators(backend.clone());
        let manuscript = Manuscript::new("\"Fine,\" she said.", "Short Story").unwrap();

        let critique = aux
            .analyze_element(&manuscript, CraftDimension::Dialogue)
            .await
            .unwrap();

        let prompt = backend.prompts().remove(0);
        assert!(prompt.contains("techniques_used"));
        assert!(prompt.contains("mentor_texts"));
        let sections = critique.critique().unwrap().structured().unwrap();
        assert_eq!(sections.exercises, vec!["write the scene as a voicemail"]);
        assert_eq!(sections.mentor_texts, vec!["Raymond Carver"]);
    }
}
