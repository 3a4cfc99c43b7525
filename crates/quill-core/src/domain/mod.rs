//! Domain models for Quill.
//!
//! - `Genre`, `CraftDimension`: the closed vocabularies
//! - `Manuscript`: the immutable submission
//! - `DimensionCritique`: one dimension's outcome
//! - `Review`: the aggregate result of a review

pub mod critique;
pub mod genre;
pub mod manuscript;
pub mod review;

pub use critique::{
    CritiqueFailure, CritiqueOutcome, CritiqueSections, CritiqueStatus, DimensionCritique, Parsed,
};
pub use genre::{CraftDimension, Genre, UnknownDimension};
pub use manuscript::{Manuscript, ManuscriptIdentity};
pub use review::{Review, ReviewNote};
