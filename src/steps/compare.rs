//! How node values are compared with the text written in a scenario.

use serde_json::Value;

use crate::document::JsonDocument;
use crate::expression::value::{format_number, number_equals_text};

/// Loose comparison of a node with expected text.
///
/// Strings compare as text, numbers numerically (`5` matches `"5.0"`),
/// `true` matches `true`/`1`, `false` matches `false`/`0`/empty, `null`
/// matches `null`/empty. Arrays and objects match when the text is JSON
/// with the same canonical encoding.
pub fn matches_text(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::String(s) => s == expected,
        Value::Number(n) => number_equals_text(n, expected),
        Value::Bool(true) => matches!(expected, "true" | "1"),
        Value::Bool(false) => matches!(expected, "false" | "0" | ""),
        Value::Null => matches!(expected, "null" | ""),
        Value::Array(_) | Value::Object(_) => match JsonDocument::parse(expected) {
            Ok(doc) => doc.encode() == encode(actual),
            Err(_) => false,
        },
    }
}

/// Text a node is searched in by the containment steps: strings as they
/// are, everything else as compact JSON.
pub fn text_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        other => encode(other),
    }
}

/// Compact JSON used in failure messages.
pub fn encode(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Members of an object, elements of an array, 0 for `null`, 1 otherwise.
pub fn element_count(value: &Value) -> usize {
    match value {
        Value::Object(members) => members.len(),
        Value::Array(items) => items.len(),
        Value::Null => 0,
        _ => 1,
    }
}
