//! Genre and craft-dimension vocabularies.
//!
//! Both sets are closed. Parsing is forgiving about case and separators so
//! `"flash-fiction"`, `"FLASH_FICTION"` and `"Flash Fiction"` all resolve to
//! [`Genre::FlashFiction`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoachError;

/// Literary genres Quill knows how to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Fiction,
    Poetry,
    CreativeNonFiction,
    FlashFiction,
    ShortStory,
    PersonalEssay,
    Memoir,
    Screenplay,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::Fiction,
        Genre::Poetry,
        Genre::CreativeNonFiction,
        Genre::FlashFiction,
        Genre::ShortStory,
        Genre::PersonalEssay,
        Genre::Memoir,
        Genre::Screenplay,
    ];

    /// Human-facing name, as used in prompts and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::Poetry => "Poetry",
            Genre::CreativeNonFiction => "Creative Non-Fiction",
            Genre::FlashFiction => "Flash Fiction",
            Genre::ShortStory => "Short Story",
            Genre::PersonalEssay => "Personal Essay",
            Genre::Memoir => "Memoir",
            Genre::Screenplay => "Screenplay",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Genre {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Genre::ALL
            .into_iter()
            .find(|g| normalize(g.display_name()) == wanted)
            .ok_or_else(|| CoachError::UnknownGenre {
                genre: s.trim().to_string(),
            })
    }
}

/// One axis of literary evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraftDimension {
    Character,
    Plot,
    Setting,
    Dialogue,
    Theme,
    Voice,
    Imagery,
    Pacing,
    Conflict,
    Structure,
}

impl CraftDimension {
    pub const ALL: [CraftDimension; 10] = [
        CraftDimension::Character,
        CraftDimension::Plot,
        CraftDimension::Setting,
        CraftDimension::Dialogue,
        CraftDimension::Theme,
        CraftDimension::Voice,
        CraftDimension::Imagery,
        CraftDimension::Pacing,
        CraftDimension::Conflict,
        CraftDimension::Structure,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CraftDimension::Character => "Character",
            CraftDimension::Plot => "Plot",
            CraftDimension::Setting => "Setting",
            CraftDimension::Dialogue => "Dialogue",
            CraftDimension::Theme => "Theme",
            CraftDimension::Voice => "Voice",
            CraftDimension::Imagery => "Imagery",
            CraftDimension::Pacing => "Pacing",
            CraftDimension::Conflict => "Conflict",
            CraftDimension::Structure => "Structure",
        }
    }
}

impl std::fmt::Display for CraftDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a craft dimension name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown craft dimension: {0}")]
pub struct UnknownDimension(pub String);

impl FromStr for CraftDimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        CraftDimension::ALL
            .into_iter()
            .find(|d| normalize(d.display_name()) == wanted)
            .ok_or_else(|| UnknownDimension(s.trim().to_string()))
    }
}

/// Lowercase, treat `-` and `_` as spaces, collapse runs of whitespace.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
