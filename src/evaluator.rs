//! Resolves node expressions against documents.
//!
//! The strategy is picked once, when the evaluator is built, and every call
//! after that uses it. Both strategies report a node that does not resolve
//! as [`Error::NodeNotFound`]; an expression that cannot be parsed is an
//! [`Error::Expression`] instead, so a negated step never mistakes a typo
//! for a missing node.

use serde_json::Value;

use crate::config::{Config, EvaluationMode};
use crate::document::JsonDocument;
use crate::error::{Error, Result};
use crate::expression::{self, ExpressionError, Limits};
use crate::nodepath::{self, PathEvaluator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvaluator {
    /// Deterministic dotted-path traversal.
    Path,
    /// Sandboxed expression language with the given work limits.
    Expression(Limits),
}

impl NodeEvaluator {
    /// Builds an evaluator for `mode` with default limits.
    pub fn new(mode: EvaluationMode) -> Self {
        match mode {
            EvaluationMode::Path => NodeEvaluator::Path,
            EvaluationMode::Expression => NodeEvaluator::Expression(Limits::default()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.evaluation_mode {
            EvaluationMode::Path => NodeEvaluator::Path,
            EvaluationMode::Expression => NodeEvaluator::Expression(Limits {
                max_steps: config.max_steps,
                max_depth: config.max_depth,
            }),
        }
    }

    pub fn mode(&self) -> EvaluationMode {
        match self {
            NodeEvaluator::Path => EvaluationMode::Path,
            NodeEvaluator::Expression(_) => EvaluationMode::Expression,
        }
    }

    /// Returns the value `node` addresses in `document`.
    pub fn evaluate(&self, document: &JsonDocument, node: &str) -> Result<Value> {
        log::debug!("evaluating node '{}' in {} mode", node, self.mode());
        let result = match self {
            NodeEvaluator::Path => evaluate_path(document.root(), node),
            NodeEvaluator::Expression(limits) => {
                expression::evaluate(document.root(), node, limits)
                    .map_err(|e| expression_error(node, e))
            }
        };
        if let Err(e) = &result {
            log::trace!("node '{}' did not resolve: {}", node, e);
        }
        result
    }
}

fn evaluate_path(root: &Value, node: &str) -> Result<Value> {
    let path = nodepath::Parser::parse(node).map_err(|e| Error::Expression {
        node: node.to_string(),
        message: e.to_string(),
    })?;
    PathEvaluator::new(root)
        .resolve(&path)
        .cloned()
        .ok_or_else(|| Error::node_not_found(node))
}

fn expression_error(node: &str, error: ExpressionError) -> Error {
    if error.is_runtime() {
        Error::node_not_found(node)
    } else {
        Error::Expression {
            node: node.to_string(),
            message: error.to_string(),
        }
    }
}
