use std::fmt;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use url::Url;

use super::document::SchemaDocument;
use crate::document::JsonDocument;
use crate::error::{Error, Result};
use crate::file::loader;

/// One way the document breaks the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value; empty for the document root.
    pub instance_path: String,
    /// Schema keyword that failed, e.g. `required` or `type`.
    pub keyword: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{} ({}): {}", path, self.keyword, self.message)
    }
}

impl Violation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        let keyword = schema_path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("schema")
            .to_string();
        Violation {
            instance_path: error.instance_path.to_string(),
            keyword,
            message: error.to_string(),
        }
    }
}

/// Resolves external `$ref`s from the local filesystem only.
///
/// `file://` URIs are read from disk; every other scheme is refused, which
/// also covers the placeholder base an inline schema gets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRetriever;

impl Retrieve for FileRetriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let url = Url::parse(uri.as_str())?;
        if url.scheme() != "file" {
            return Err(format!(
                "cannot resolve '{}': only file references relative to a schema file are supported",
                uri.as_str()
            )
            .into());
        }
        let path = url
            .to_file_path()
            .map_err(|()| format!("'{}' is not a local file path", uri.as_str()))?;
        log::debug!("retrieving referenced schema {}", path.display());
        let text = loader::read_text_file(&path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Checks documents against JSON Schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    validate_formats: bool,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also enforce the `format` keyword (`email`, `date-time`, ...).
    pub fn with_format_validation(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }

    /// Succeeds when `document` conforms to `schema`; otherwise fails with
    /// [`Error::SchemaViolation`] listing every violation.
    pub fn validate(&self, document: &JsonDocument, schema: &SchemaDocument) -> Result<()> {
        let violations = self.violations(document, schema)?;
        if violations.is_empty() {
            Ok(())
        } else {
            log::debug!("document breaks the schema in {} place(s)", violations.len());
            Err(Error::SchemaViolation { violations })
        }
    }

    /// Returns all violations in the order the validator reports them; empty
    /// when valid.
    pub fn violations(
        &self,
        document: &JsonDocument,
        schema: &SchemaDocument,
    ) -> Result<Vec<Violation>> {
        let compiled = self.compile(schema)?;
        Ok(compiled
            .iter_errors(document.root())
            .map(|error| Violation::from_error(&error))
            .collect())
    }

    fn compile(&self, schema: &SchemaDocument) -> Result<jsonschema::Validator> {
        jsonschema::options()
            .should_validate_formats(self.validate_formats)
            .with_retriever(FileRetriever)
            .build(&schema.with_base_id())
            .map_err(|e| Error::InvalidSchema {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> JsonDocument {
        JsonDocument::from_value(value)
    }

    fn schema(value: Value) -> SchemaDocument {
        SchemaDocument::from_value(value, None)
    }

    #[test]
    fn test_required_property() {
        let validator = SchemaValidator::new();
        let required = schema(json!({"type": "object", "required": ["id"]}));

        assert!(validator.validate(&doc(json!({"id": 1})), &required).is_ok());

        let violations = validator.violations(&doc(json!({})), &required).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].keyword, "required");
        assert_eq!(violations[0].instance_path, "");
        assert!(violations[0].message.contains("id"));
    }

    #[test]
    fn test_all_violations_are_reported() {
        let validator = SchemaValidator::new();
        let person = schema(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "minLength": 2},
                "age": {"type": "integer", "minimum": 0},
                "role": {"enum": ["admin", "user"]}
            }
        }));
        let violations = validator
            .violations(&doc(json!({"name": "A", "age": -1, "role": "root"})), &person)
            .unwrap();
        let keywords: Vec<&str> = violations.iter().map(|v| v.keyword.as_str()).collect();
        assert_eq!(violations.len(), 3);
        assert!(keywords.contains(&"minLength"));
        assert!(keywords.contains(&"minimum"));
        assert!(keywords.contains(&"enum"));
    }

    #[test]
    fn test_format_validation_is_opt_in() {
        let email = schema(json!({"type": "string", "format": "email"}));
        let value = doc(json!("not an email"));
        assert!(SchemaValidator::new().validate(&value, &email).is_ok());
        assert!(SchemaValidator::new()
            .with_format_validation(true)
            .validate(&value, &email)
            .is_err());
    }

    #[test]
    fn test_invalid_schema() {
        let broken = schema(json!({"type": "no-such-type"}));
        let err = SchemaValidator::new()
            .validate(&doc(json!(1)), &broken)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema { .. }));
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation {
            instance_path: "/items/0".to_string(),
            keyword: "type".to_string(),
            message: "\"x\" is not of type \"integer\"".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "/items/0 (type): \"x\" is not of type \"integer\""
        );
    }
}
