//! Quill Core Library
//!
//! Structured feedback on creative writing. A manuscript is split into the
//! craft dimensions of its genre, each dimension is critiqued by a
//! generative backend, and the results are merged into one [`Review`].
//!
//! ```ignore
//! let coach = Coach::new(Arc::new(my_backend));
//! let manuscript = Manuscript::new(text, "Flash Fiction")?;
//! let review = coach.review(&manuscript).await?;
//! ```

pub mod analyzer;
pub mod auxiliary;
pub mod backend;
pub mod coach;
pub mod domain;
pub mod error;
pub mod fakes;
pub mod obs;
pub mod orchestrator;
pub mod parse;
pub mod prompts;
pub mod registry;
pub mod telemetry;

pub use analyzer::DimensionAnalyzer;
pub use auxiliary::{AuxiliaryGenerators, AuxiliaryOutput, AuxiliaryTask, PromptConstraints};
pub use backend::{
    generate_checked, GenerationParams, GenerationRequest, GenerationResult, GenerativeBackend,
};
pub use coach::Coach;
pub use domain::{
    CraftDimension, CritiqueFailure, CritiqueOutcome, CritiqueSections, CritiqueStatus,
    DimensionCritique, Genre, Manuscript, ManuscriptIdentity, Parsed, Review, ReviewNote,
};
pub use error::{BackendFailure, CoachError, Result};
pub use obs::{
    emit_dimension_finished, emit_review_finished, emit_review_started, emit_summary_skipped,
    ReviewSpan,
};
pub use orchestrator::{FeedbackOrchestrator, ReviewConfig};
pub use registry::{DimensionGuidance, GenreProfile, GenreRegistry};
pub use telemetry::init_tracing;

/// Quill version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
