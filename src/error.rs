//! Error type shared by every step.
//!
//! Each variant is one way a single assertion can fail. Nothing is retried
//! or recovered; the test runner turns the error into a failed step.

use std::path::PathBuf;

use crate::schema::Violation;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The body (or an expected/schema text) is not valid JSON.
    #[error("{context}: {source}")]
    InvalidJson {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The node expression does not resolve against the document.
    #[error("The node '{node}' does not exist.")]
    NodeNotFound { node: String },

    /// The node expression could not be parsed or exceeded its limits.
    #[error("Invalid node expression '{node}': {message}")]
    Expression { node: String, message: String },

    /// The schema file referenced by a step is missing.
    #[error("The JSON schema doesn't exist: {}", path.display())]
    SchemaNotFound { path: PathBuf },

    /// The schema could not be compiled, including unresolvable `$ref`s.
    #[error("invalid JSON schema: {message}")]
    InvalidSchema { message: String },

    /// The document does not conform to the schema.
    #[error("{}", format_violations(violations))]
    SchemaViolation { violations: Vec<Violation> },

    /// The evaluated value does not satisfy the step's predicate.
    #[error("{0}")]
    AssertionMismatch(String),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::InvalidJson {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn node_not_found(node: &str) -> Self {
        Error::NodeNotFound {
            node: node.to_string(),
        }
    }

    pub fn is_invalid_json(&self) -> bool {
        matches!(self, Error::InvalidJson { .. })
    }

    pub fn is_node_not_found(&self) -> bool {
        matches!(self, Error::NodeNotFound { .. })
    }

    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Error::SchemaViolation { .. })
    }

    pub fn is_assertion_mismatch(&self) -> bool {
        matches!(self, Error::AssertionMismatch(_))
    }
}

fn format_violations(violations: &[Violation]) -> String {
    let mut out = format!(
        "The JSON does not match the schema ({} violation{}):",
        violations.len(),
        if violations.len() == 1 { "" } else { "s" }
    );
    for violation in violations {
        out.push_str("\n  - ");
        out.push_str(&violation.to_string());
    }
    out
}
