//! Best-effort parsing of model responses.
//!
//! Model output is untrusted free text. Parsers here never fail: when the
//! expected structure is missing they hand back [`Parsed::Raw`] with the
//! response verbatim.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::{CritiqueSections, Parsed};

/// Parse a dimension critique.
///
/// Tried in order: a JSON object embedded anywhere in the text, then
/// `Strengths:` / `Weaknesses:` / `Suggestions:` headed sections, then raw.
pub fn parse_critique(text: &str) -> Parsed<CritiqueSections> {
    if let Some(value) = extract_json_object(text) {
        let sections = sections_from_json(&value);
        if !sections.is_empty() {
            return Parsed::Structured(sections);
        }
    }
    if let Some(sections) = sections_from_headings(text) {
        return Parsed::Structured(sections);
    }
    Parsed::Raw(text.to_string())
}

/// Parse any JSON object out of the response, keeping it untyped.
pub fn parse_json_body(text: &str) -> Parsed<Value> {
    match extract_json_object(text) {
        Some(value) => Parsed::Structured(value),
        None => Parsed::Raw(text.to_string()),
    }
}

/// The span from the first `{` to the last `}`, if it parses as an object.
///
/// Handles responses wrapped in prose or in markdown code fences.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

const STRENGTH_KEYS: &[&str] = &["strengths", "strength", "what_works"];
const WEAKNESS_KEYS: &[&str] = &[
    "weaknesses",
    "weakness",
    "areas_for_improvement",
    "issues",
    "missing_opportunities",
];
const SUGGESTION_KEYS: &[&str] = &[
    "suggestions",
    "suggestion",
    "revision_suggestions",
    "next_steps",
];
const TECHNIQUE_KEYS: &[&str] = &["techniques_used", "techniques"];
const EXERCISE_KEYS: &[&str] = &["improvement_exercises", "exercises"];
const MENTOR_KEYS: &[&str] = &["mentor_texts", "mentor_examples"];

fn sections_from_json(value: &Value) -> CritiqueSections {
    CritiqueSections {
        strengths: collect_items(value, STRENGTH_KEYS),
        weaknesses: collect_items(value, WEAKNESS_KEYS),
        suggestions: collect_items(value, SUGGESTION_KEYS),
        score: value
            .get("score")
            .or_else(|| value.pointer("/analysis/score"))
            .and_then(Value::as_f64)
            .map(|s| s.round().clamp(0.0, 100.0) as u8),
        example_revision: value
            .get("example_revision")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        techniques: collect_items(value, TECHNIQUE_KEYS),
        exercises: collect_items(value, EXERCISE_KEYS),
        mentor_texts: collect_items(value, MENTOR_KEYS),
    }
}

fn collect_items(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .flat_map(|field| match field {
            Value::Array(items) => items.iter().filter_map(item_text).collect(),
            other => item_text(other).into_iter().collect::<Vec<_>>(),
        })
        .collect()
}

/// Flatten one list entry. Objects become `key: value` pairs joined by `; `.
fn item_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| format!("{k}: {}", s.trim())))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

#[derive(Clone, Copy)]
enum Section {
    Strengths,
    Weaknesses,
    Suggestions,
}

fn heading_regex() -> Option<&'static Regex> {
    static HEADING: OnceLock<Option<Regex>> = OnceLock::new();
    HEADING
        .get_or_init(|| {
            Regex::new(
                r"(?i)^\s*(?:#{1,6}\s*)?\**\s*(strengths?|weaknesses?|areas? for improvement|suggestions?)\s*\**\s*(?::\s*\**\s*(.*)|\**\s*$)",
            )
            .ok()
        })
        .as_ref()
}

fn bullet_regex() -> Option<&'static Regex> {
    static BULLET: OnceLock<Option<Regex>> = OnceLock::new();
    BULLET
        .get_or_init(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").ok())
        .as_ref()
}

fn sections_from_headings(text: &str) -> Option<CritiqueSections> {
    let (heading, bullet) = (heading_regex()?, bullet_regex()?);
    let mut sections = CritiqueSections::default();
    let mut current: Option<Section> = None;
    let mut saw_heading = false;
    let mut orphaned = false;

    for line in text.lines() {
        if let Some(caps) = heading.captures(line) {
            let name = caps[1].to_lowercase();
            current = Some(if name.starts_with("strength") {
                Section::Strengths
            } else if name.starts_with("suggestion") {
                Section::Suggestions
            } else {
                Section::Weaknesses
            });
            saw_heading = true;
            let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            if !rest.is_empty() {
                push_item(&mut sections, current, rest);
            }
            continue;
        }
        let item = bullet.replace(line, "");
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if current.is_none() {
            orphaned = true;
        }
        push_item(&mut sections, current, item);
    }

    // Text outside any section would be lost; keep the response raw instead.
    (saw_heading && !orphaned && !sections.is_empty()).then_some(sections)
}

fn push_item(sections: &mut CritiqueSections, section: Option<Section>, item: &str) {
    let target = match section {
        Some(Section::Strengths) => &mut sections.strengths,
        Some(Section::Weaknesses) => &mut sections.weaknesses,
        Some(Section::Suggestions) => &mut sections.suggestions,
        None => return,
    };
    target.push(item.to_string());
}
