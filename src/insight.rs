//! External insight module
//!
//! Carries the semantic description of an image produced by a vision-capable
//! collaborator outside this crate, and the plumbing to bring it in:
//!
//! - [`ExternalInsight`]: a closed record of named, always-present fields
//!   defaulting to empty. Absent insight degrades gracefully everywhere.
//! - [`InsightSource`]: the client handle the profile assembler receives;
//!   its lifecycle is owned by the caller. Fetch failures are non-fatal to
//!   analysis.
//! - [`extract_insight`]: the best-effort text-to-field extractor that maps
//!   loosely structured model output (JSON or free text) onto the record.
//!   It is deliberately isolated here; the numeric analyzers never depend
//!   on its low-precision parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Insight errors
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Insight record not found: {0}")]
    NotFound(PathBuf),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;

/// Semantic insight record from an external vision collaborator
///
/// Every field is always present and defaults to empty; consumers treat an
/// empty field as "no insight".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExternalInsight {
    /// Description of the main subject
    pub subject_description: String,
    /// Object labels the collaborator detected
    pub detected_objects: Vec<String>,
    /// Style/technique description
    pub style_description: String,
    /// Color palette commentary
    pub color_notes: String,
    /// Composition commentary
    pub composition_notes: String,
    /// Mood/atmosphere description
    pub mood: String,
    /// Lighting description
    pub lighting: String,
    /// Descriptive keywords
    pub keywords: Vec<String>,
}

impl ExternalInsight {
    /// True when every field is at its empty default
    pub fn is_empty(&self) -> bool {
        self == &ExternalInsight::default()
    }
}

/// Client handle for fetching insight about an image
///
/// Implementations may block; the core applies no retry or timeout, so
/// callers set their own circuit-breaker at the boundary.
pub trait InsightSource {
    /// Fetch the insight record for the image at `image_path`
    fn fetch(&self, image_path: &Path) -> Result<ExternalInsight>;
}

/// Insight source reading a previously fetched record from a JSON file
///
/// The file may contain either a serialized [`ExternalInsight`] or raw
/// collaborator output; raw output goes through [`extract_insight`].
#[derive(Debug, Clone)]
pub struct JsonInsightSource {
    path: PathBuf,
}

impl JsonInsightSource {
    /// Create a source backed by the given JSON file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InsightSource for JsonInsightSource {
    fn fetch(&self, _image_path: &Path) -> Result<ExternalInsight> {
        if !self.path.exists() {
            return Err(InsightError::NotFound(self.path.clone()));
        }
        let raw = std::fs::read_to_string(&self.path)?;

        // A directly serialized record wins; anything else is treated as raw
        // collaborator output
        if let Ok(insight) = serde_json::from_str::<ExternalInsight>(&raw) {
            if !insight.is_empty() {
                return Ok(insight);
            }
        }
        Ok(extract_insight(&raw))
    }
}

// ============================================================
// Best-effort text-to-field extraction
// ============================================================

/// Source-field names accepted for each insight field when the collaborator
/// returns structured JSON
const FIELD_MAPPINGS: &[(&[&str], InsightField)] = &[
    (
        &["main_subject", "subject", "subject_description"],
        InsightField::Subject,
    ),
    (
        &["visual_elements", "detected_objects", "objects"],
        InsightField::Objects,
    ),
    (
        &["style_and_techniques", "style", "style_description", "technique"],
        InsightField::Style,
    ),
    (
        &["color_analysis", "color_palette", "colors"],
        InsightField::Color,
    ),
    (&["composition"], InsightField::Composition),
    (&["mood", "atmosphere", "emotional_impact"], InsightField::Mood),
    (&["lighting", "light"], InsightField::Lighting),
    (&["keywords", "tags"], InsightField::Keywords),
];

#[derive(Debug, Clone, Copy)]
enum InsightField {
    Subject,
    Objects,
    Style,
    Color,
    Composition,
    Mood,
    Lighting,
    Keywords,
}

/// Extract an insight record from loosely structured collaborator output
///
/// Attempts, in order: a JSON object (possibly wrapped in a fenced code
/// block or surrounding prose) mapped through known field names, then
/// keyword-based section scanning over the raw text. Extraction is
/// best-effort by design; anything unrecognized is simply left empty.
pub fn extract_insight(raw: &str) -> ExternalInsight {
    if let Some(value) = find_json_object(raw) {
        if let Some(insight) = insight_from_json(&value) {
            return insight;
        }
    }
    insight_from_text(raw)
}

/// Locate a JSON object in the text: fenced ```json blocks first, then the
/// outermost brace pair
fn find_json_object(raw: &str) -> Option<Value> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").ok()?;
    if let Some(captures) = fence.captures(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(&captures[1]) {
            return Some(value);
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&raw[start..=end]).ok()
}

fn insight_from_json(value: &Value) -> Option<ExternalInsight> {
    let object = value.as_object()?;
    let mut insight = ExternalInsight::default();
    let mut matched = false;

    for (key, entry) in object {
        let key = key.to_lowercase().replace([' ', '-'], "_");
        for (names, field) in FIELD_MAPPINGS {
            if !names.contains(&key.as_str()) {
                continue;
            }
            matched = true;
            match field {
                InsightField::Subject => insight.subject_description = value_to_text(entry),
                InsightField::Objects => insight.detected_objects = value_to_list(entry),
                InsightField::Style => insight.style_description = value_to_text(entry),
                InsightField::Color => insight.color_notes = value_to_text(entry),
                InsightField::Composition => insight.composition_notes = value_to_text(entry),
                InsightField::Mood => insight.mood = value_to_text(entry),
                InsightField::Lighting => insight.lighting = value_to_text(entry),
                InsightField::Keywords => insight.keywords = value_to_list(entry),
            }
        }
    }

    matched.then_some(insight)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .values()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Keyword-driven section scanning over free text
fn insight_from_text(raw: &str) -> ExternalInsight {
    let mut insight = ExternalInsight::default();
    let lower = raw.to_lowercase();

    let section = |keyword: &str| extract_section(raw, keyword);

    if lower.contains("subject") {
        insight.subject_description = section("subject");
    }
    if lower.contains("object") || lower.contains("element") {
        let objects = first_nonempty(&[section("object"), section("element")]);
        insight.detected_objects = split_list(&objects);
    }
    if lower.contains("style") || lower.contains("technique") {
        insight.style_description = first_nonempty(&[section("style"), section("technique")]);
    }
    if lower.contains("color") {
        insight.color_notes = section("color");
    }
    if lower.contains("composition") {
        insight.composition_notes = section("composition");
    }
    if lower.contains("mood") || lower.contains("emotion") {
        insight.mood = first_nonempty(&[section("mood"), section("emotion")]);
    }
    if lower.contains("lighting") || lower.contains("light") {
        insight.lighting = first_nonempty(&[section("lighting"), section("light")]);
    }
    if lower.contains("keyword") {
        insight.keywords = split_list(&section("keyword"));
    }

    insight
}

/// Extract the text following a `keyword...:` (or `-`) marker up to a blank
/// line or the next capitalized heading
fn extract_section(text: &str, keyword: &str) -> String {
    let pattern = format!(
        r"(?is).*?{}.*?[:\-]\s*(.*?)(?:\n\n|\n[A-Z]|$)",
        regex::escape(keyword)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn first_nonempty(candidates: &[String]) -> String {
    candidates
        .iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let insight = ExternalInsight::default();
        assert!(insight.is_empty());
        assert!(insight.subject_description.is_empty());
        assert!(insight.detected_objects.is_empty());
    }

    #[test]
    fn test_structured_json_extraction() {
        let raw = r#"{
            "main_subject": "A lighthouse on a cliff",
            "visual_elements": ["lighthouse", "cliff", "waves"],
            "style": "dramatic seascape photography",
            "color_analysis": "Deep blues against warm sunset tones",
            "composition": "Rule of thirds with the lighthouse off-center",
            "mood": "Lonely and contemplative",
            "lighting": "Golden hour backlight",
            "keywords": ["ocean", "sunset", "lighthouse"]
        }"#;

        let insight = extract_insight(raw);
        assert_eq!(insight.subject_description, "A lighthouse on a cliff");
        assert_eq!(
            insight.detected_objects,
            vec!["lighthouse", "cliff", "waves"]
        );
        assert_eq!(insight.style_description, "dramatic seascape photography");
        assert!(insight.color_notes.contains("Deep blues"));
        assert!(insight.composition_notes.contains("Rule of thirds"));
        assert_eq!(insight.mood, "Lonely and contemplative");
        assert_eq!(insight.lighting, "Golden hour backlight");
        assert_eq!(insight.keywords.len(), 3);
    }

    #[test]
    fn test_json_in_code_fence() {
        let raw = "Here is the analysis:\n```json\n{\"subject\": \"a red car\", \"keywords\": \"fast, red, car\"}\n```\nDone.";

        let insight = extract_insight(raw);
        assert_eq!(insight.subject_description, "a red car");
        assert_eq!(insight.keywords, vec!["fast", "red", "car"]);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = "The model said {\"mood\": \"somber\"} at the end.";
        let insight = extract_insight(raw);
        assert_eq!(insight.mood, "somber");
    }

    #[test]
    fn test_free_text_section_extraction() {
        let raw = "Main subject: a mountain range at dawn\n\nStyle: alpine landscape photography\n\nKeywords: mountains, dawn, mist";

        let insight = extract_insight(raw);
        assert_eq!(insight.subject_description, "a mountain range at dawn");
        assert_eq!(insight.style_description, "alpine landscape photography");
        assert_eq!(insight.keywords, vec!["mountains", "dawn", "mist"]);
    }

    #[test]
    fn test_unrecognized_text_yields_empty_record() {
        let insight = extract_insight("nothing to see here");
        assert!(insight.is_empty());
    }

    #[test]
    fn test_json_with_unknown_keys_only_falls_back() {
        let insight = extract_insight(r#"{"foo": 1, "bar": 2}"#);
        assert!(insight.is_empty());
    }

    #[test]
    fn test_object_list_from_string() {
        let raw = r#"{"objects": "tree, house, river"}"#;
        let insight = extract_insight(raw);
        assert_eq!(insight.detected_objects, vec!["tree", "house", "river"]);
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let insight: ExternalInsight =
            serde_json::from_str(r#"{"subject_description": "a dog"}"#).unwrap();
        assert_eq!(insight.subject_description, "a dog");
        assert!(insight.keywords.is_empty());
        assert!(!insight.is_empty());
    }

    #[test]
    fn test_json_source_missing_file() {
        let source = JsonInsightSource::new("/nonexistent/insight.json");
        let result = source.fetch(Path::new("image.png"));
        assert!(matches!(result, Err(InsightError::NotFound(_))));
    }

    #[test]
    fn test_json_source_reads_serialized_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insight.json");
        let record = ExternalInsight {
            subject_description: "a castle".to_string(),
            keywords: vec!["medieval".to_string()],
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();

        let source = JsonInsightSource::new(&path);
        let fetched = source.fetch(Path::new("image.png")).unwrap();
        assert_eq!(fetched, record);
    }

    #[test]
    fn test_json_source_reads_raw_collaborator_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(&path, r#"{"main_subject": "a ship", "keywords": ["sea"]}"#).unwrap();

        let source = JsonInsightSource::new(&path);
        let fetched = source.fetch(Path::new("image.png")).unwrap();
        assert_eq!(fetched.subject_description, "a ship");
        assert_eq!(fetched.keywords, vec!["sea"]);
    }

    #[test]
    fn test_extract_section_stops_at_blank_line() {
        let text = "Colors: red and gold\n\nOther: stuff";
        assert_eq!(extract_section(text, "color"), "red and gold");
    }
}
