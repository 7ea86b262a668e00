//! Turns extraction service payloads into ordered text fragments.
//!
//! Accepted shapes, checked in order:
//! - `{"pages": [...]}`: each page becomes one fragment
//! - `{"sentences": [...]}`: strings, `{"sentence": "..."}` objects, or
//!   objects whose first string field holds the text
//! - `{"text": "..."}`: a single fragment
//! - a bare array of strings
//!
//! Anything else yields no fragments and a warning.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
struct ExtractionPayload {
    #[serde(default)]
    pages: Vec<Value>,
    #[serde(default)]
    sentences: Vec<Value>,
    #[serde(default)]
    text: Option<String>,
}

/// Parse a JSON payload into fragments. Malformed input gives an empty list.
pub fn fragments_from_json(json: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => fragments_from_value(value),
        Err(err) => {
            warn!("Malformed extraction payload: {err}");
            Vec::new()
        }
    }
}

pub fn fragments_from_value(value: Value) -> Vec<String> {
    if let Value::Array(items) = value {
        let fragments: Vec<String> = items.iter().map(value_text).collect();
        debug!(fragments = fragments.len(), "Read fragment array");
        return fragments;
    }

    let payload = match serde_json::from_value::<ExtractionPayload>(value) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Unrecognized extraction payload: {err}");
            return Vec::new();
        }
    };

    if !payload.pages.is_empty() {
        debug!(pages = payload.pages.len(), "Read paged payload");
        return payload.pages.iter().map(value_text).collect();
    }
    if !payload.sentences.is_empty() {
        debug!(sentences = payload.sentences.len(), "Read sentence payload");
        return payload.sentences.iter().map(sentence_text).collect();
    }
    match payload.text {
        Some(text) if !text.is_empty() => vec![text],
        _ => {
            warn!("Extraction payload carried no text");
            Vec::new()
        }
    }
}

/// Read fragments from a file: `.json` payloads are parsed, anything else is
/// taken as one plain text fragment.
pub fn read_fragments(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(fragments_from_json(&contents))
    } else {
        Ok(vec![contents])
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn sentence_text(value: &Value) -> String {
    match value {
        Value::Object(fields) => fields
            .get("sentence")
            .and_then(Value::as_str)
            .or_else(|| fields.values().find_map(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        other => value_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_take_priority() {
        let fragments =
            fragments_from_json(r#"{"pages": ["one", "two"], "sentences": ["ignored"], "text": "x"}"#);
        assert_eq!(fragments, vec!["one", "two"]);
    }

    #[test]
    fn sentence_objects_are_unwrapped() {
        let fragments = fragments_from_json(
            r#"{"sentences": [{"sentence": "First."}, {"id": 2, "body": "Second."}, {"id": 3}, "Third."]}"#,
        );
        assert_eq!(fragments, vec!["First.", "Second.", "", "Third."]);
    }

    #[test]
    fn text_field_becomes_one_fragment() {
        assert_eq!(fragments_from_json(r#"{"text": "Whole book"}"#), vec!["Whole book"]);
    }

    #[test]
    fn bare_arrays_are_fragments() {
        assert_eq!(fragments_from_json(r#"["a", "b"]"#), vec!["a", "b"]);
    }

    #[test]
    fn malformed_payloads_yield_nothing() {
        assert!(fragments_from_json("not json").is_empty());
        assert!(fragments_from_json(r#"{"text": ""}"#).is_empty());
        assert!(fragments_from_json(r#"{"pages": 3}"#).is_empty());
        assert!(fragments_from_json("42").is_empty());
    }

    #[test]
    fn reads_plain_text_files_whole() {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("quickread-ingest-{nonce}"));
        fs::create_dir_all(&dir).expect("create temp dir");

        let text_path = dir.join("book.txt");
        fs::write(&text_path, "Chapter 1\nText.").expect("write text");
        assert_eq!(read_fragments(&text_path).expect("read text"), vec!["Chapter 1\nText."]);

        let json_path = dir.join("book.JSON");
        fs::write(&json_path, r#"{"pages": ["p1"]}"#).expect("write json");
        assert_eq!(read_fragments(&json_path).expect("read json"), vec!["p1"]);

        assert!(read_fragments(&dir.join("missing.txt")).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
