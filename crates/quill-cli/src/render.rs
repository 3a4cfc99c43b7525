//! Plain-text rendering for terminal output.

use quill_core::{
    AuxiliaryOutput, CritiqueOutcome, DimensionCritique, GenreRegistry, Parsed, Review, ReviewNote,
};
use serde_json::Value;

pub fn render_review_text(review: &Review) -> String {
    let identity = review.manuscript();
    let mut out = String::new();

    out.push_str(&format!(
        "Review: {}\n",
        identity.title.as_deref().unwrap_or("Untitled")
    ));
    out.push_str(&format!(
        "Genre: {} ({} words)\n",
        identity.genre, identity.word_count
    ));
    out.push_str(&format!(
        "Completeness: {:.0}% ({}/{} dimensions)\n",
        review.completeness_ratio() * 100.0,
        review.succeeded_count(),
        review.critiques().len()
    ));

    for critique in review.critiques() {
        out.push('\n');
        out.push_str(&render_critique_text(critique));
    }

    if let Some(summary) = review.summary() {
        out.push_str("\nSummary\n=======\n");
        out.push_str(summary.trim());
        out.push('\n');
    }

    for note in review.notes() {
        match note {
            ReviewNote::PartialReview {
                succeeded, total, ..
            } => out.push_str(&format!(
                "\nNote: partial review, only {succeeded} of {total} dimensions succeeded; no summary\n"
            )),
            ReviewNote::SummaryFailed { reason } => {
                out.push_str(&format!("\nNote: summary unavailable ({reason})\n"))
            }
        }
    }

    out.trim_end().to_string()
}

pub fn render_critique_text(critique: &DimensionCritique) -> String {
    let mut out = format!("## {}\n", critique.dimension);
    match &critique.outcome {
        CritiqueOutcome::Succeeded { critique } => {
            out.push_str(critique.to_plain_text().trim());
            out.push('\n');
            if let Parsed::Structured(sections) = critique {
                if let Some(revision) = &sections.example_revision {
                    out.push_str("Example revision:\n");
                    out.push_str(revision.trim());
                    out.push('\n');
                }
            }
        }
        CritiqueOutcome::Failed { reason } => {
            out.push_str(&format!("[failed] {reason}\n"));
        }
    }
    out
}

/// Structured bodies are pretty-printed; anything else is shown verbatim.
pub fn render_auxiliary_text(output: &AuxiliaryOutput) -> String {
    match &output.body {
        Parsed::Structured(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| output.text.clone())
        }
        Parsed::Raw(text) => text.trim().to_string(),
    }
}

pub fn render_elements_text(registry: &GenreRegistry) -> String {
    let mut out = String::from("Genres\n======\n");
    for profile in registry.profiles() {
        let dims: Vec<&str> = profile
            .dimensions
            .iter()
            .map(|d| d.dimension.display_name())
            .collect();
        out.push_str(&format!(
            "{:<22}{}\n",
            profile.genre.display_name(),
            dims.join(", ")
        ));
    }

    out.push_str("\nCraft dimensions\n================\n");
    for dimension in quill_core::CraftDimension::ALL {
        out.push_str(&format!("  {}\n", dimension.display_name()));
    }
    out.trim_end().to_string()
}

/// JSON view of the registry for `--format json`.
pub fn elements_json(registry: &GenreRegistry) -> Value {
    let genres: Vec<Value> = registry
        .profiles()
        .map(|profile| {
            serde_json::json!({
                "genre": profile.genre.display_name(),
                "dimensions": profile
                    .dimensions
                    .iter()
                    .map(|d| serde_json::json!({
                        "dimension": d.dimension.display_name(),
                        "guidance": d.guidance,
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    let dimensions: Vec<&str> = quill_core::CraftDimension::ALL
        .iter()
        .map(|d| d.display_name())
        .collect();
    serde_json::json!({ "genres": genres, "craft_dimensions": dimensions })
}
