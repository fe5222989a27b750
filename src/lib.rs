//! JSON assertion steps for acceptance-test runners.
//!
//! The crate checks an HTTP response body that some other component captured:
//! is it JSON, does a node hold the expected value, does the document conform
//! to a JSON Schema. Steps live in [`steps::JsonSteps`]; the pieces they are
//! built from are usable on their own.
//!
//! ```
//! use jsonsteps::config::EvaluationMode;
//! use jsonsteps::document::JsonDocument;
//! use jsonsteps::evaluator::NodeEvaluator;
//!
//! let doc = JsonDocument::parse(r#"{"a":{"b":[1,2,3]}}"#).unwrap();
//! let evaluator = NodeEvaluator::new(EvaluationMode::Path);
//! assert_eq!(evaluator.evaluate(&doc, "a.b[1]").unwrap(), 2);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod file;
pub mod nodepath;
pub mod schema;
pub mod steps;

pub use error::{Error, Result};
