//! Error types for expression parsing and evaluation.

use std::fmt;

/// Errors that can occur while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Unexpected token at a specific position.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    InvalidSyntax { message: String },
    /// Nesting went deeper than allowed.
    TooDeep { limit: usize },
    /// Evaluation took more steps than allowed.
    StepLimit { limit: usize },
    /// The expression is well formed but cannot be evaluated against this
    /// document: missing member, wrong type, division by zero.
    Runtime { message: String },
}

impl ExpressionError {
    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        ExpressionError::Runtime {
            message: message.into(),
        }
    }

    /// Returns true for failures caused by the document rather than by the
    /// expression itself.
    pub fn is_runtime(&self) -> bool {
        matches!(self, ExpressionError::Runtime { .. })
    }
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "Unexpected token '{}' at position {}, expected {}",
                found, position, expected
            ),
            ExpressionError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            ExpressionError::InvalidSyntax { message } => {
                write!(f, "Invalid expression syntax: {}", message)
            }
            ExpressionError::TooDeep { limit } => {
                write!(f, "Expression nests deeper than {} levels", limit)
            }
            ExpressionError::StepLimit { limit } => {
                write!(f, "Expression exceeded {} evaluation steps", limit)
            }
            ExpressionError::Runtime { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ExpressionError {}
