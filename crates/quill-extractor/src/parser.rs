//! Parse LLM output into a style profile

use crate::error::ParseError;
use quill_domain::{StyleProfile, StyleProfileDraft};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse an LLM reply into a style profile
///
/// Tolerates prose or code fences around the JSON, and a single-element
/// array wrapping the object. Fields that are missing or of the wrong shape
/// take their default values individually.
pub fn parse_style_response(response: &str) -> Result<StyleProfile, ParseError> {
    let object = extract_object(response)?;
    Ok(profile_from_object(&object))
}

/// Locate and decode the profile object inside `response`
///
/// Tries the slice starting at whichever bracket comes first, then the other
/// kind. A slice only counts if it yields an object.
fn extract_object(response: &str) -> Result<Map<String, Value>, ParseError> {
    let mut spans: Vec<(usize, usize)> = [('{', '}'), ('[', ']')]
        .iter()
        .filter_map(|&(open, close)| {
            let start = response.find(open)?;
            let end = response.rfind(close)?;
            (end > start).then_some((start, end))
        })
        .collect();
    spans.sort();

    let mut last_error = ParseError::NoJson;
    for (start, end) in spans {
        let payload = &response[start..=end];
        match serde_json::from_str::<Value>(payload)
            .map_err(ParseError::from)
            .and_then(into_object)
        {
            Ok(object) => return Ok(object),
            Err(e) => {
                debug!("Rejected JSON candidate at {}..={}: {}", start, end, e);
                last_error = e;
            }
        }
    }
    Err(last_error)
}

/// Unwrap a single object, or the first element of an array
fn into_object(value: Value) -> Result<Map<String, Value>, ParseError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(ParseError::NotAnObject(kind(&other))),
            None => Err(ParseError::EmptyArray),
        },
        other => Err(ParseError::NotAnObject(kind(&other))),
    }
}

/// Build a profile from a decoded object, defaulting field by field
fn profile_from_object(object: &Map<String, Value>) -> StyleProfile {
    StyleProfileDraft {
        tone: string_field(object, "tone"),
        vocabulary_level: string_field(object, "vocabulary_level"),
        sentence_structure: string_field(object, "sentence_structure"),
        paragraph_length: string_field(object, "paragraph_length"),
        voice: string_field(object, "voice"),
        common_phrases: list_field(object, "common_phrases"),
        writing_patterns: list_field(object, "writing_patterns"),
        examples: list_field(object, "examples"),
    }
    .into()
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    let value = object.get(key)?.as_str();
    if value.is_none() {
        debug!("Field '{}' is not a string, using default", key);
    }
    value.map(str::to_string)
}

/// A list field counts only if every element is a string
fn list_field(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = object.get(key)?.as_array();
    let strings = items.and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
    });
    if strings.is_none() {
        debug!("Field '{}' is not a list of strings, using default", key);
    }
    strings
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
