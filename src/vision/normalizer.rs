// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Normalization of the vision model's JSON payload
//!
//! The model is asked for `{"ocr_text", "description", "tags": [{"label", "confidence"}]}`
//! but nothing guarantees it complies. `parse_analysis` always yields a fully
//! populated `AnalysisResult`: missing or mistyped fields fall back to defaults,
//! tags without a label are dropped and confidences are clamped into [0, 1].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Confidence assumed when a tag omits it or it is not numeric
pub const DEFAULT_TAG_CONFIDENCE: f64 = 0.5;

/// A short label describing image content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Never empty
    pub label: String,
    /// Always within [0.0, 1.0]
    pub confidence: f64,
}

/// Normalized result of analysing one screenshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ocr_text: String,
    pub description: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("empty response")]
    Empty,

    #[error("malformed json: {0}")]
    MalformedJson(String),

    #[error("malformed json: expected an object, got {0}")]
    NotAnObject(&'static str),
}

/// Parse the raw message content returned by the vision model.
///
/// # Errors
/// - `NormalizeError::Empty` if `raw` is `None` or an empty string
/// - `NormalizeError::MalformedJson` if it is not valid JSON
/// - `NormalizeError::NotAnObject` if the top-level JSON value is not an object
pub fn parse_analysis(raw: Option<&str>) -> Result<AnalysisResult, NormalizeError> {
    let raw = match raw {
        Some(text) if !text.is_empty() => text,
        _ => return Err(NormalizeError::Empty),
    };

    let value: Value =
        serde_json::from_str(raw).map_err(|e| NormalizeError::MalformedJson(e.to_string()))?;

    let object = match value {
        Value::Object(map) => map,
        other => return Err(NormalizeError::NotAnObject(json_type_name(&other))),
    };

    Ok(normalize_object(&object))
}

fn normalize_object(object: &Map<String, Value>) -> AnalysisResult {
    let tags = match object.get("tags") {
        Some(Value::Array(entries)) => entries.iter().filter_map(normalize_tag).collect(),
        _ => Vec::new(),
    };

    AnalysisResult {
        ocr_text: string_field(object, "ocr_text"),
        description: string_field(object, "description"),
        tags,
    }
}

fn normalize_tag(entry: &Value) -> Option<Tag> {
    let entry = entry.as_object()?;

    let label = string_field(entry, "label");
    if label.is_empty() {
        return None;
    }

    let confidence = entry
        .get("confidence")
        .and_then(coerce_confidence)
        .unwrap_or(DEFAULT_TAG_CONFIDENCE);

    Some(Tag {
        label,
        confidence: clamp_confidence(confidence),
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Numbers pass through, numeric strings are parsed, booleans map to 1.0 / 0.0.
/// Literals beyond the f64 range become +/-inf and are clamped later.
/// Anything else yields `None` so the caller applies the default.
fn coerce_confidence(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64().or_else(|| n.to_string().parse::<f64>().ok()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;

    (!number.is_nan()).then_some(number)
}

/// Clamp into [0.0, 1.0]. NaN falls back to the default.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_TAG_CONFIDENCE
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
