//! Assertion steps over the latest response body.
//!
//! Every step receives the body explicitly, so the steps hold no response
//! state of their own; whoever executes the HTTP calls owns it. A step
//! returns `Ok` when the assertion holds and an [`Error`] describing the
//! failure otherwise.
//!
//! # Example
//!
//! ```
//! use jsonsteps::config::EvaluationMode;
//! use jsonsteps::steps::JsonSteps;
//!
//! let steps = JsonSteps::new(EvaluationMode::Path);
//! let body = r#"{"data": {"items": [{"name": "a"}, {"name": "b"}]}}"#;
//!
//! steps.the_response_should_be_in_json(body).unwrap();
//! steps.the_json_node_should_be_equal_to(body, "data.items[1].name", "b").unwrap();
//! steps.the_json_node_should_have_elements(body, "data.items", "2").unwrap();
//! steps.the_json_node_should_not_exist(body, "data.total").unwrap();
//! ```

pub mod compare;
pub mod invert;

pub use invert::invert;

use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{Config, EvaluationMode};
use crate::document::JsonDocument;
use crate::error::{Error, Result};
use crate::evaluator::NodeEvaluator;
use crate::schema::{SchemaDocument, SchemaValidator};

/// Rows of a `| node | value |` table, in table order. A node listed twice
/// keeps its last value.
pub type NodeTable = IndexMap<String, String>;

/// The JSON assertion steps.
///
/// Table steps stop at the first row that fails and report that row.
#[derive(Debug, Clone)]
pub struct JsonSteps {
    evaluator: NodeEvaluator,
    validator: SchemaValidator,
    working_dir: Option<PathBuf>,
}

impl JsonSteps {
    /// Steps using `mode` with default limits.
    pub fn new(mode: EvaluationMode) -> Self {
        Self {
            evaluator: NodeEvaluator::new(mode),
            validator: SchemaValidator::new(),
            working_dir: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            evaluator: NodeEvaluator::from_config(config),
            validator: SchemaValidator::new().with_format_validation(config.validate_formats),
            working_dir: None,
        }
    }

    /// Resolve schema file paths against `dir` instead of the process
    /// working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn evaluator(&self) -> &NodeEvaluator {
        &self.evaluator
    }

    /// Checks that the response is correct JSON.
    pub fn the_response_should_be_in_json(&self, body: &str) -> Result<()> {
        JsonDocument::parse(body).map(|_| ())
    }

    /// Checks that the response is not correct JSON.
    pub fn the_response_should_not_be_in_json(&self, body: &str) -> Result<()> {
        invert(
            || self.the_response_should_be_in_json(body),
            Error::is_invalid_json,
            "The response is in JSON",
        )
    }

    /// Checks that the node is equal to the given text (see
    /// [`compare::matches_text`]).
    pub fn the_json_node_should_be_equal_to(
        &self,
        body: &str,
        node: &str,
        text: &str,
    ) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        self.node_equal_to(&doc, node, text)
    }

    /// Checks every `node => value` row with
    /// [`the_json_node_should_be_equal_to`](Self::the_json_node_should_be_equal_to).
    pub fn the_json_nodes_should_be_equal_to(&self, body: &str, nodes: &NodeTable) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        for (node, text) in nodes {
            self.node_equal_to(&doc, node, text)?;
        }
        Ok(())
    }

    /// Checks that the node has `count` elements.
    pub fn the_json_node_should_have_elements(
        &self,
        body: &str,
        node: &str,
        count: &str,
    ) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        let expected: usize = count.trim().parse().map_err(|_| {
            Error::AssertionMismatch(format!("'{}' is not a valid element count", count))
        })?;
        let actual = compare::element_count(&self.evaluator.evaluate(&doc, node)?);
        if actual == expected {
            Ok(())
        } else {
            Err(Error::AssertionMismatch(format!(
                "The node '{}' has {} element(s), expected {}",
                node, actual, expected
            )))
        }
    }

    /// Checks that the node's text contains `text`.
    pub fn the_json_node_should_contain(&self, body: &str, node: &str, text: &str) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        self.node_contains(&doc, node, text)
    }

    pub fn the_json_nodes_should_contain(&self, body: &str, nodes: &NodeTable) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        for (node, text) in nodes {
            self.node_contains(&doc, node, text)?;
        }
        Ok(())
    }

    /// Checks that the node exists and its text does not contain `text`.
    pub fn the_json_node_should_not_contain(
        &self,
        body: &str,
        node: &str,
        text: &str,
    ) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        self.node_does_not_contain(&doc, node, text)
    }

    pub fn the_json_nodes_should_not_contain(&self, body: &str, nodes: &NodeTable) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        for (node, text) in nodes {
            self.node_does_not_contain(&doc, node, text)?;
        }
        Ok(())
    }

    /// Checks that the node exists and returns its value.
    pub fn the_json_node_should_exist(&self, body: &str, node: &str) -> Result<Value> {
        let doc = JsonDocument::parse(body)?;
        self.evaluator.evaluate(&doc, node)
    }

    /// Checks that the node does not exist. Fails on an invalid body or a
    /// malformed expression, as the positive step does.
    pub fn the_json_node_should_not_exist(&self, body: &str, node: &str) -> Result<()> {
        invert(
            || self.the_json_node_should_exist(body, node),
            Error::is_node_not_found,
            format!("The node '{}' exists.", node),
        )
    }

    /// Validates the response against an inline schema.
    pub fn the_json_should_be_valid_according_to_this_schema(
        &self,
        body: &str,
        schema: &str,
    ) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        let schema = SchemaDocument::from_text(schema)?;
        self.validator.validate(&doc, &schema)
    }

    /// Validates the response against a schema file, relative to the working
    /// directory.
    pub fn the_json_should_be_valid_according_to_the_schema(
        &self,
        body: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        let schema = self.load_schema(path.as_ref())?;
        self.validator.validate(&doc, &schema)
    }

    pub fn the_json_should_be_invalid_according_to_this_schema(
        &self,
        body: &str,
        schema: &str,
    ) -> Result<()> {
        invert(
            || self.the_json_should_be_valid_according_to_this_schema(body, schema),
            Error::is_schema_violation,
            "The JSON is valid according to the schema",
        )
    }

    pub fn the_json_should_be_invalid_according_to_the_schema(
        &self,
        body: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        invert(
            || self.the_json_should_be_valid_according_to_the_schema(body, path),
            Error::is_schema_violation,
            format!(
                "The JSON is valid according to the schema {}",
                path.display()
            ),
        )
    }

    /// Checks that the response equals `content` once both are in canonical
    /// form. Member order matters.
    pub fn the_json_should_be_equal_to(&self, body: &str, content: &str) -> Result<()> {
        let actual = JsonDocument::parse(body)?;
        let expected = JsonDocument::parse(content).map_err(|e| match e {
            Error::InvalidJson { source, .. } => {
                Error::invalid_json("The expected JSON is not a valid", source)
            }
            other => other,
        })?;

        if expected == actual {
            Ok(())
        } else {
            Err(Error::AssertionMismatch(format!(
                "The JSON is not equal to the expected JSON.\nExpected: {}\nActual:   {}",
                expected.encode(),
                actual.encode()
            )))
        }
    }

    /// Writes the response, pretty-printed, to `out`.
    pub fn print_last_json_response<W: Write>(&self, body: &str, out: &mut W) -> Result<()> {
        let doc = JsonDocument::parse(body)?;
        writeln!(out, "{}", doc.encode_pretty()).map_err(Error::Output)
    }

    fn load_schema(&self, path: &Path) -> Result<SchemaDocument> {
        match &self.working_dir {
            Some(dir) => SchemaDocument::from_file_in(dir, path),
            None => SchemaDocument::from_file(path),
        }
    }

    fn node_equal_to(&self, doc: &JsonDocument, node: &str, text: &str) -> Result<()> {
        let actual = self.evaluator.evaluate(doc, node)?;
        if compare::matches_text(&actual, text) {
            Ok(())
        } else {
            Err(Error::AssertionMismatch(format!(
                "The node value is '{}', expected '{}'",
                compare::encode(&actual),
                text
            )))
        }
    }

    fn node_contains(&self, doc: &JsonDocument, node: &str, text: &str) -> Result<()> {
        let actual = compare::text_form(&self.evaluator.evaluate(doc, node)?);
        if actual.contains(text) {
            Ok(())
        } else {
            Err(Error::AssertionMismatch(format!(
                "The node '{}' value '{}' does not contain '{}'",
                node, actual, text
            )))
        }
    }

    fn node_does_not_contain(&self, doc: &JsonDocument, node: &str, text: &str) -> Result<()> {
        let actual = compare::text_form(&self.evaluator.evaluate(doc, node)?);
        if actual.contains(text) {
            Err(Error::AssertionMismatch(format!(
                "The node '{}' value '{}' contains '{}'",
                node, actual, text
            )))
        } else {
            Ok(())
        }
    }
}
