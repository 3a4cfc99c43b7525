//! Genre profile registry.
//!
//! Maps each [`Genre`] to the ordered craft dimensions it is reviewed on and
//! the guidance text given to the model for each. The dimension sets and
//! their order are fixed; guidance text is configuration and can be
//! overlaid from TOML:
//!
//! ```toml
//! [guidance."Flash Fiction"]
//! pacing = "Every sentence must earn its place."
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{CraftDimension, Genre};
use crate::error::{CoachError, Result};

/// Guidance for one dimension within a genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionGuidance {
    pub dimension: CraftDimension,
    pub guidance: String,
}

/// The dimensions a genre is reviewed on, in review order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreProfile {
    pub genre: Genre,
    pub dimensions: Vec<DimensionGuidance>,
}

impl GenreProfile {
    pub fn dimension_ids(&self) -> Vec<CraftDimension> {
        self.dimensions.iter().map(|d| d.dimension).collect()
    }

    pub fn guidance_for(&self, dimension: CraftDimension) -> Option<&DimensionGuidance> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }
}

/// Read-only registry of genre profiles.
#[derive(Debug, Clone)]
pub struct GenreRegistry {
    profiles: HashMap<Genre, Arc<GenreProfile>>,
}

impl Default for GenreRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl GenreRegistry {
    /// The built-in profiles.
    pub fn builtin() -> Self {
        let profiles = Genre::ALL
            .into_iter()
            .map(|genre| {
                let dimensions = builtin_table(genre)
                    .iter()
                    .map(|(dimension, guidance)| DimensionGuidance {
                        dimension: *dimension,
                        guidance: (*guidance).to_string(),
                    })
                    .collect();
                (genre, Arc::new(GenreProfile { genre, dimensions }))
            })
            .collect();
        Self { profiles }
    }

    /// Resolve a genre name to its profile.
    pub fn profile_for(&self, genre: &str) -> Result<Arc<GenreProfile>> {
        let parsed: Genre = genre.parse()?;
        self.profile(parsed)
    }

    /// Profile for an already-parsed genre.
    pub fn profile(&self, genre: Genre) -> Result<Arc<GenreProfile>> {
        self.profiles
            .get(&genre)
            .cloned()
            .ok_or_else(|| CoachError::UnknownGenre {
                genre: genre.to_string(),
            })
    }

    /// Every profile, in [`Genre::ALL`] order.
    pub fn profiles(&self) -> impl Iterator<Item = &GenreProfile> + '_ {
        Genre::ALL
            .into_iter()
            .filter_map(|genre| self.profiles.get(&genre).map(Arc::as_ref))
    }

    /// Overlay guidance text from a TOML document.
    ///
    /// Only guidance for dimensions already in a genre's profile may be
    /// replaced; the dimension set and order never change.
    pub fn with_overrides_toml(mut self, source: &str) -> Result<Self> {
        let file: GuidanceFile =
            toml::from_str(source).map_err(|e| CoachError::InvalidGuidance(e.to_string()))?;

        for (genre_name, entries) in file.guidance {
            let genre: Genre = genre_name.parse().map_err(|_| {
                CoachError::InvalidGuidance(format!("unknown genre '{genre_name}'"))
            })?;
            let mut profile = (*self.profile(genre)?).clone();

            for (dimension_name, text) in entries {
                let dimension: CraftDimension = dimension_name
                    .parse()
                    .map_err(|e: crate::domain::UnknownDimension| {
                        CoachError::InvalidGuidance(e.to_string())
                    })?;
                let slot = profile
                    .dimensions
                    .iter_mut()
                    .find(|d| d.dimension == dimension)
                    .ok_or_else(|| {
                        CoachError::InvalidGuidance(format!(
                            "{dimension} is not reviewed for {genre}"
                        ))
                    })?;
                if text.trim().is_empty() {
                    return Err(CoachError::InvalidGuidance(format!(
                        "empty guidance for {genre}/{dimension}"
                    )));
                }
                slot.guidance = text.trim().to_string();
            }

            self.profiles.insert(genre, Arc::new(profile));
        }

        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct GuidanceFile {
    #[serde(default)]
    guidance: BTreeMap<String, BTreeMap<String, String>>,
}

fn builtin_table(genre: Genre) -> &'static [(CraftDimension, &'static str)] {
    use CraftDimension::*;
    match genre {
        Genre::Fiction => &[
            (
                Character,
                "Are the characters distinct, motivated and changed by events? Look for interiority and contradiction.",
            ),
            (
                Plot,
                "Does each scene turn? Check causality between events, escalation and a satisfying resolution.",
            ),
            (
                Setting,
                "Is the world specific and does it press on the characters, or is it wallpaper?",
            ),
            (
                Dialogue,
                "Does speech reveal character and carry subtext? Flag exposition dumps and identical voices.",
            ),
            (
                Voice,
                "Is the narrative voice consistent, distinctive and suited to the point of view?",
            ),
            (
                Pacing,
                "Where does the story drag or rush? Compare scene versus summary and the length of beats.",
            ),
            (
                Theme,
                "What is the story about beneath the plot, and is it earned rather than stated?",
            ),
        ],
        Genre::Poetry => &[
            (
                Imagery,
                "Are images concrete and surprising? Check the senses engaged and whether metaphors cohere.",
            ),
            (
                Voice,
                "Is the speaker's voice distinct? Consider diction, tone and the music of sound devices.",
            ),
            (
                Structure,
                "Do line breaks, stanza shape and form serve the meaning? Note enjambment and white space.",
            ),
            (
                Theme,
                "Does the poem arrive somewhere? Look for a turn or volta and avoid stated abstractions.",
            ),
        ],
        Genre::CreativeNonFiction => &[
            (
                Structure,
                "Is the shape of the piece (braided, chronological, segmented) doing work for the material?",
            ),
            (
                Voice,
                "Is the narrator trustworthy and present? Balance the reflecting self with the experiencing self.",
            ),
            (
                Character,
                "Are real people rendered with fairness and dimension rather than as props?",
            ),
            (Imagery, "Does concrete, verifiable detail ground the reflection?"),
            (Theme, "What larger truth does the personal material reach toward?"),
        ],
        Genre::FlashFiction => &[
            (
                Structure,
                "In under a thousand words, does the piece open in motion and land on a resonant final image?",
            ),
            (
                Voice,
                "Is the voice compressed and confident enough to establish world and character in a few lines?",
            ),
            (
                Pacing,
                "Every sentence must earn its place. Identify slack and any summary that should be cut.",
            ),
            (Imagery, "Do a few precise details imply a larger world?"),
            (
                Dialogue,
                "If there is speech, is it doing double duty by revealing character and advancing tension?",
            ),
        ],
        Genre::ShortStory => &[
            (Character, "Is there a protagonist with a clear want and a change, however small?"),
            (Plot, "Is there a single dramatic arc with rising tension and a decisive moment?"),
            (Conflict, "What opposes the protagonist, and is the pressure sustained to the end?"),
            (Dialogue, "Is dialogue efficient, characterful and layered with subtext?"),
            (Pacing, "Is the opening quick enough and is the climax given room?"),
            (Structure, "Do the scene order and the ending serve the story's single effect?"),
        ],
        Genre::PersonalEssay => &[
            (Voice, "Is the essayist's voice candid, specific and thinking on the page?"),
            (
                Structure,
                "Does the essay move from occasion to insight, and does the ending open outward?",
            ),
            (Theme, "Is there a real question being explored rather than a lesson announced?"),
            (Imagery, "Are abstractions anchored in scenes and concrete particulars?"),
        ],
        Genre::Memoir => &[
            (
                Voice,
                "Balance the narrating adult's perspective with the remembered self's immediacy.",
            ),
            (Character, "Are family and others drawn with complexity, including the narrator?"),
            (Setting, "Is the time and place evoked with sensory, period-accurate detail?"),
            (Structure, "Is the chosen slice of life shaped into an arc rather than a chronology?"),
            (Theme, "What does the memoir ultimately understand that the younger self did not?"),
        ],
        Genre::Screenplay => &[
            (
                Dialogue,
                "Is dialogue lean and speakable, with subtext? Flag on-the-nose lines and parentheticals.",
            ),
            (Structure, "Check act breaks, scene headings and industry formatting conventions."),
            (Character, "Are characters revealed through visible action rather than description?"),
            (Pacing, "Do scenes enter late and leave early? Watch page count per scene."),
            (Conflict, "Does every scene contain opposition that forces a choice?"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_genre_has_non_empty_unique_dimensions() {
        let registry = GenreRegistry::builtin();
        for genre in Genre::ALL {
            let profile = registry.profile(genre).unwrap();
            assert!(!profile.dimensions.is_empty(), "{genre} has no dimensions");
            let unique: HashSet<_> = profile.dimension_ids().into_iter().collect();
            assert_eq!(unique.len(), profile.dimensions.len(), "{genre} repeats a dimension");
            assert!(profile.dimensions.iter().all(|d| !d.guidance.is_empty()));
        }
    }

    #[test]
    fn test_profile_lookup_is_deterministic() {
        let registry = GenreRegistry::builtin();
        for genre in Genre::ALL {
            let a = registry.profile_for(genre.display_name()).unwrap();
            let b = registry.profile_for(genre.display_name()).unwrap();
            assert_eq!(a.dimension_ids(), b.dimension_ids());
        }
        assert_eq!(
            GenreRegistry::builtin()
                .profile_for("Flash Fiction")
                .unwrap()
                .dimension_ids(),
            registry.profile_for("flash fiction").unwrap().dimension_ids()
        );
    }

    #[test]
    fn test_unknown_genre() {
        let err = GenreRegistry::builtin().profile_for("Haiku").unwrap_err();
        assert!(matches!(err, CoachError::UnknownGenre { .. }));
    }

    #[test]
    fn test_flash_fiction_includes_dialogue() {
        let profile = GenreRegistry::builtin()
            .profile(Genre::FlashFiction)
            .unwrap();
        assert!(profile.guidance_for(CraftDimension::Dialogue).is_some());
    }

    #[test]
    fn test_overrides_replace_guidance_only() {
        let registry = GenreRegistry::builtin()
            .with_overrides_toml(
                r#"
                [guidance."Flash Fiction"]
                pacing = "Cut everything that is not the story."
                "#,
            )
            .unwrap();
        let profile = registry.profile(Genre::FlashFiction).unwrap();
        assert_eq!(
            profile
                .guidance_for(CraftDimension::Pacing)
                .unwrap()
                .guidance,
            "Cut everything that is not the story."
        );
        assert_eq!(
            profile.dimension_ids(),
            GenreRegistry::builtin()
                .profile(Genre::FlashFiction)
                .unwrap()
                .dimension_ids()
        );
    }

    #[test]
    fn test_overrides_reject_dimension_outside_profile() {
        let err = GenreRegistry::builtin()
            .with_overrides_toml("[guidance.Poetry]\ndialogue = \"x\"\n")
            .unwrap_err();
        assert!(matches!(err, CoachError::InvalidGuidance(ref m) if m.contains("Dialogue")));
    }

    #[test]
    fn test_overrides_reject_unknown_genre_and_bad_toml() {
        assert!(GenreRegistry::builtin()
            .with_overrides_toml("[guidance.Haiku]\nimagery = \"x\"\n")
            .is_err());
        assert!(GenreRegistry::builtin()
            .with_overrides_toml("not = [valid")
            .is_err());
    }

    #[test]
    fn test_profiles_iterate_in_genre_order() {
        let registry = GenreRegistry::builtin();
        let genres: Vec<Genre> = registry.profiles().map(|p| p.genre).collect();
        assert_eq!(genres, Genre::ALL.to_vec());
    }
}
