//! The immutable JSON document a step inspects.
//!
//! # Example
//!
//! ```
//! use jsonsteps::document::JsonDocument;
//!
//! let doc = JsonDocument::parse("{ \"name\" : \"Alice\",\n  \"age\": 30 }").unwrap();
//! assert_eq!(doc.encode(), r#"{"name":"Alice","age":30}"#);
//! assert!(JsonDocument::parse("{\"name\":").is_err());
//! ```

use std::fmt;

use serde_json::Value;

use crate::error::{Error, Result};

/// A syntactically valid JSON document.
///
/// Object members keep the order they had in the source text, so two
/// documents that differ only in member order are *not* equal.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    root: Value,
}

impl JsonDocument {
    /// Parses raw text into a document.
    ///
    /// Fails with [`Error::InvalidJson`] for empty input, malformed tokens or
    /// trailing garbage after the top-level value.
    pub fn parse(raw: &str) -> Result<Self> {
        let root = serde_json::from_str(raw)
            .map_err(|e| Error::invalid_json("The response is not valid JSON", e))?;
        Ok(Self { root })
    }

    /// Wraps an already-parsed value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Returns the root value of the document.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Compact canonical encoding. Member order is preserved, whitespace is not.
    pub fn encode(&self) -> String {
        // Serializing a `Value` cannot fail: keys are always strings.
        serde_json::to_string(&self.root).unwrap_or_default()
    }

    /// Indented encoding with the same member order as [`encode`](Self::encode).
    pub fn encode_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.root).unwrap_or_default()
    }
}

impl PartialEq for JsonDocument {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for JsonDocument {}

impl fmt::Display for JsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_empty_input() {
        let err = JsonDocument::parse("").unwrap_err();
        assert!(err.is_invalid_json());
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert!(JsonDocument::parse(r#"{"a":1} x"#).is_err());
        assert!(JsonDocument::parse("[1,2,]").is_err());
    }

    #[test]
    fn test_parse_accepts_scalar_roots() {
        assert_eq!(JsonDocument::parse(" 42 ").unwrap().encode(), "42");
        assert_eq!(JsonDocument::parse("\"x\"").unwrap().encode(), "\"x\"");
    }

    #[test]
    fn test_encode_preserves_member_order() {
        let doc = JsonDocument::parse(r#"{"z": 1, "a": {"y": true, "b": null}}"#).unwrap();
        assert_eq!(doc.encode(), r#"{"z":1,"a":{"y":true,"b":null}}"#);
    }

    #[test]
    fn test_equality_ignores_whitespace() {
        let a = JsonDocument::parse("{\n  \"a\": [1, 2]\n}").unwrap();
        let b = JsonDocument::parse(r#"{"a":[1,2]}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = JsonDocument::parse(r#"{"a":1,"b":2}"#).unwrap();
        let b = JsonDocument::parse(r#"{"b":2,"a":1}"#).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pretty_encoding_keeps_order() {
        let doc = JsonDocument::parse(r#"{"b":1,"a":2}"#).unwrap();
        assert_eq!(doc.encode_pretty(), "{\n  \"b\": 1,\n  \"a\": 2\n}");
    }
}
