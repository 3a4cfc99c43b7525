//! End-to-end review pipeline tests against the scripted backend.

use std::sync::Arc;
use std::time::Duration;

use quill_core::fakes::{Reply, ScriptedBackend};
use quill_core::{
    BackendFailure, CoachError, CraftDimension, CritiqueFailure, CritiqueStatus,
    FeedbackOrchestrator, Genre, GenreRegistry, Manuscript, Parsed, ReviewConfig, ReviewNote,
};

const CRITIQUE: &str = r#"{"strengths": ["atmosphere"], "weaknesses": ["nothing happens"], "suggestions": ["give the night a consequence"]}"#;

fn orchestrator(backend: &Arc<ScriptedBackend>) -> FeedbackOrchestrator {
    FeedbackOrchestrator::new(
        Arc::clone(backend) as Arc<dyn quill_core::GenerativeBackend>,
        Arc::new(GenreRegistry::builtin()),
        ReviewConfig::default(),
    )
}

fn dark_night() -> Manuscript {
    Manuscript::new("It was a dark night.", "Flash Fiction").unwrap()
}

#[tokio::test]
async fn test_flash_fiction_all_dimensions_succeed() {
    let backend = Arc::new(ScriptedBackend::with_default(Reply::text(CRITIQUE)));
    let review = orchestrator(&backend).review(&dark_night()).await.unwrap();

    let profile = GenreRegistry::builtin()
        .profile(Genre::FlashFiction)
        .unwrap();
    assert_eq!(review.critiques().len(), profile.dimensions.len());
    assert!(review
        .critiques()
        .iter()
        .all(|c| c.status() == CritiqueStatus::Succeeded));
    assert_eq!(review.completeness_ratio(), 1.0);
    let summary = review.summary().expect("summary present");
    assert!(!summary.is_empty());
    assert_eq!(review.manuscript().genre, "Flash Fiction");
    assert_eq!(review.manuscript().word_count, 5);
}

#[tokio::test]
async fn test_dialogue_timeout_is_isolated() {
    let backend = Arc::new(
        ScriptedBackend::with_default(Reply::text(CRITIQUE)).when_dimension(
            "Dialogue",
            Reply::fail(BackendFailure::Timeout { after_ms: 30_000 }),
        ),
    );
    let review = orchestrator(&backend).review(&dark_night()).await.unwrap();

    let n = review.critiques().len();
    for critique in review.critiques() {
        if critique.dimension == CraftDimension::Dialogue {
            assert_eq!(
                critique.failure(),
                Some(&CritiqueFailure::Backend(BackendFailure::Timeout {
                    after_ms: 30_000
                }))
            );
        } else {
            assert!(critique.is_success(), "{} should succeed", critique.dimension);
        }
    }
    assert_eq!(review.completeness_ratio(), (n - 1) as f64 / n as f64);
}

#[tokio::test]
async fn test_every_dimension_failing_still_returns_review() {
    let backend = Arc::new(ScriptedBackend::with_default(Reply::fail(
        BackendFailure::Unreachable {
            detail: "connection refused".to_string(),
        },
    )));
    let review = orchestrator(&backend).review(&dark_night()).await.unwrap();

    assert!(review.critiques().iter().all(|c| !c.is_success()));
    assert_eq!(review.completeness_ratio(), 0.0);
    assert!(review.summary().is_none());
    assert!(matches!(
        review.notes(),
        [ReviewNote::PartialReview { succeeded: 0, .. }]
    ));
    // No summary call when nothing succeeded.
    assert_eq!(backend.call_count(), review.critiques().len());
}

#[tokio::test]
async fn test_critique_count_matches_profile_for_every_genre() {
    let registry = GenreRegistry::builtin();
    let backend = Arc::new(
        ScriptedBackend::with_default(Reply::text(CRITIQUE))
            .when_dimension("Voice", Reply::fail(BackendFailure::Empty))
            .when_dimension("Structure", Reply::text("   ")),
    );

    for genre in Genre::ALL {
        let manuscript = Manuscript::new("Some words on a page.", genre.display_name()).unwrap();
        let review = orchestrator(&backend).review(&manuscript).await.unwrap();
        let profile = registry.profile(genre).unwrap();
        assert_eq!(
            review.critiques().len(),
            profile.dimensions.len(),
            "{genre} dropped a dimension"
        );
        let order: Vec<_> = review.critiques().iter().map(|c| c.dimension).collect();
        assert_eq!(order, profile.dimension_ids());
    }
}

#[tokio::test(start_paused = true)]
async fn test_order_follows_profile_not_completion() {
    let profile = GenreRegistry::builtin()
        .profile(Genre::FlashFiction)
        .unwrap();
    let dims = profile.dimension_ids();

    // Earlier dimensions answer later, so completion order is reversed.
    let mut backend = ScriptedBackend::with_default(Reply::text("summary text"));
    for (i, dim) in dims.iter().enumerate() {
        let delay = Duration::from_millis(100 * (dims.len() - i) as u64);
        backend = backend.when_dimension(
            dim.display_name(),
            Reply::text(format!("critique for {dim}")).after(delay),
        );
    }
    let backend = Arc::new(backend);
    let config = ReviewConfig {
        max_concurrent: dims.len(),
        ..ReviewConfig::default()
    };
    let orch = FeedbackOrchestrator::new(
        backend.clone(),
        Arc::new(GenreRegistry::builtin()),
        config,
    );

    let review = orch.review(&dark_night()).await.unwrap();

    let got: Vec<_> = review.critiques().iter().map(|c| c.dimension).collect();
    assert_eq!(got, dims);
    for critique in review.critiques() {
        assert_eq!(
            critique.critique(),
            Some(&Parsed::Raw(format!("critique for {}", critique.dimension)))
        );
    }
}

#[tokio::test]
async fn test_unknown_genre_fails_before_any_call() {
    let backend = Arc::new(ScriptedBackend::with_default(Reply::text(CRITIQUE)));
    let manuscript = Manuscript::new("An old silent pond.", "Haiku").unwrap();

    let err = orchestrator(&backend)
        .review(&manuscript)
        .await
        .unwrap_err();

    assert!(matches!(err, CoachError::UnknownGenre { .. }));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_review_abandons_in_flight_calls() {
    // Flash Fiction has five dimensions; with four permits the fifth can only
    // call the backend once an earlier analysis finishes at the 60s mark.
    let backend = Arc::new(ScriptedBackend::with_default(
        Reply::text(CRITIQUE).after(Duration::from_secs(60)),
    ));
    let orch = orchestrator(&backend);
    assert_eq!(orch.config().max_concurrent, 4);
    let manuscript = dark_night();

    let outcome = tokio::time::timeout(Duration::from_secs(1), orch.review(&manuscript)).await;

    assert!(outcome.is_err(), "review should still be pending");
    assert_eq!(backend.call_count(), 4);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(backend.call_count(), 4, "an abandoned analysis reached the backend");
}
