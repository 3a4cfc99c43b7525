//! Prompt templates.
//!
//! Each template ends with an instruction to answer in JSON so the parsers
//! in [`crate::parse`] have a shape to look for. The parsers still cope
//! when the model ignores the instruction.

use crate::auxiliary::PromptConstraints;
use crate::domain::{CraftDimension, DimensionCritique, Genre, Manuscript};

/// Guidance used when a dimension is analyzed outside its genre's profile.
pub fn generic_guidance(dimension: CraftDimension) -> String {
    format!(
        "Assess how the writer handles {}: what the piece does well, where it falls short, \
         and which concrete revisions would strengthen it.",
        dimension.display_name().to_lowercase()
    )
}

pub fn critique_prompt(
    manuscript: &Manuscript,
    genre: Genre,
    dimension: CraftDimension,
    guidance: &str,
) -> String {
    let title = manuscript
        .title()
        .map(|t| format!("Title: {t}\n"))
        .unwrap_or_default();
    format!(
        "You are a creative writing coach reviewing one craft dimension of a submission.\n\
         \n\
         Genre: {genre}\n\
         {title}\
         Craft dimension: {dimension}\n\
         Evaluation guidance: {guidance}\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         Critique only the {dimension} of this piece. Quote the text where it helps.\n\
         Return JSON:\n\
         {{\n  \
           \"strengths\": [\"what works and why\"],\n  \
           \"weaknesses\": [\"what needs work\"],\n  \
           \"suggestions\": [\"specific revision to make\"],\n  \
           \"score\": 70,\n  \
           \"example_revision\": \"one rewritten line showing the fix\"\n\
         }}",
        text = manuscript.text(),
    )
}

/// Deep dive into a single dimension, asking for study material as well
/// as the usual critique.
pub fn element_analysis_prompt(
    manuscript: &Manuscript,
    genre: Genre,
    dimension: CraftDimension,
    guidance: &str,
) -> String {
    format!(
        "You are a creative writing coach giving a focused lesson on one element of craft.\n\
         \n\
         Genre: {genre}\n\
         Craft dimension: {dimension}\n\
         Evaluation guidance: {guidance}\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         Analyze how this piece uses {dimension}: how it is handled now, how well it works \
         and which techniques the writer relies on. Then give the writer ways to practise it.\n\
         Return JSON:\n\
         {{\n  \
           \"strengths\": [\"what works and why, with an example from the text\"],\n  \
           \"weaknesses\": [\"where {dimension} could be stronger\"],\n  \
           \"suggestions\": [\"specific change to make\"],\n  \
           \"score\": 70,\n  \
           \"techniques_used\": [\"writing technique identified\"],\n  \
           \"improvement_exercises\": [{{\"exercise\": \"practice activity\", \"purpose\": \"what it develops\", \"instructions\": \"how to do it\"}}],\n  \
           \"mentor_texts\": [\"published work to study for {dimension}\"]\n\
         }}",
        text = manuscript.text(),
    )
}

/// Summary over the successful critiques only.
pub fn summary_prompt(
    manuscript: &Manuscript,
    genre: Genre,
    critiques: &[DimensionCritique],
) -> String {
    let mut findings = String::new();
    for critique in critiques {
        if let Some(body) = critique.critique() {
            findings.push_str(&format!(
                "## {}\n{}\n",
                critique.dimension,
                body.to_plain_text().trim()
            ));
        }
    }
    let title = manuscript.title().unwrap_or("Untitled");
    format!(
        "You are a creative writing coach. Below are per-dimension critiques of a {genre} piece \
         titled \"{title}\" ({words} words).\n\
         \n\
         {findings}\n\
         Write an overall assessment in one or two short paragraphs: the overall impression, \
         the two or three highest-priority revisions, and a sincere word of encouragement. \
         Reply in plain prose.",
        words = manuscript.word_count(),
    )
}

pub fn writing_prompt_prompt(genre: Genre, constraints: &PromptConstraints) -> String {
    format!(
        "Generate a creative writing prompt.\n\
         \n\
         Genre: {genre}\n\
         Theme (if specified): {theme}\n\
         Constraints (if any): {constraints}\n\
         \n\
         Return JSON:\n\
         {{\n  \
           \"prompt\": {{\"main_prompt\": \"the writing prompt\", \"suggested_length\": \"word count range\", \"time_limit\": \"suggested writing time\"}},\n  \
           \"inspiration\": {{\"character_seeds\": [], \"setting_options\": [], \"conflict_possibilities\": [], \"opening_lines\": []}},\n  \
           \"optional_challenges\": [{{\"challenge\": \"extra constraint\", \"purpose\": \"skill it develops\"}}],\n  \
           \"tips\": [\"advice specific to this prompt\"],\n  \
           \"common_pitfalls\": [\"mistakes to avoid\"]\n\
         }}",
        theme = constraints.theme.as_deref().unwrap_or(""),
        constraints = constraints.constraints.as_deref().unwrap_or(""),
    )
}

pub fn scene_expansion_prompt(scene: &str, direction: Option<&str>) -> String {
    format!(
        "Help expand this scene with more detail and craft.\n\
         \n\
         Scene:\n\
         {scene}\n\
         \n\
         Direction (if any): {direction}\n\
         \n\
         Return JSON:\n\
         {{\n  \
           \"sensory_details\": {{\"sight\": [], \"sound\": [], \"smell\": [], \"touch\": [], \"taste\": []}},\n  \
           \"character_interiority\": [\"thoughts or feelings to explore\"],\n  \
           \"setting_enrichment\": [\"environmental details\"],\n  \
           \"expanded_draft\": \"a more detailed version of the scene\",\n  \
           \"show_dont_tell\": [{{\"telling\": \"abstract statement\", \"showing\": \"concrete replacement\"}}],\n  \
           \"pacing\": {{\"slow_down\": [], \"speed_up\": []}}\n\
         }}",
        direction = direction.unwrap_or(""),
    )
}

pub fn dialogue_coaching_prompt(dialogue: &str, context: Option<&str>) -> String {
    format!(
        "Coach the writer on improving this dialogue.\n\
         \n\
         Context: {context}\n\
         \n\
         Dialogue:\n\
         {dialogue}\n\
         \n\
         Return JSON:\n\
         {{\n  \
           \"analysis\": {{\"naturalness\": {{\"score\": 70, \"assessment\": \"\"}}, \"subtext\": {{\"score\": 70, \"assessment\": \"\"}}, \"character_distinction\": {{\"score\": 70, \"assessment\": \"\"}}}},\n  \
           \"line_feedback\": [{{\"original_line\": \"\", \"speaker\": \"\", \"feedback\": \"\", \"revision\": \"\"}}],\n  \
           \"subtext_opportunities\": [],\n  \
           \"dialogue_tags\": {{\"overused\": [], \"suggestions\": []}},\n  \
           \"revised_dialogue\": \"improved version of the dialogue\"\n\
         }}",
        context = context.unwrap_or(""),
    )
}
