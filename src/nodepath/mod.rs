//! Dotted node paths: `data.items[0].name`.
//!
//! This is the deterministic evaluation strategy. A path is a dot-separated
//! list of member names, each optionally followed by zero-based array
//! indices. There are no wildcards, slices or filters.
//!
//! # Supported Syntax
//!
//! - `name` - Object member
//! - `name[0]` - Member, then array element
//! - `name[0][1]` - Nested arrays
//! - `root[0]` - `root` names the document itself (unless it is a member)
//!
//! # Examples
//!
//! ```
//! // users[0].email - email of the first user
//! // matrix[1][2] - third cell of the second row
//! // root[0].id - id of the first element of a top-level array
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{NodePath, PathSegment};
pub use error::NodePathError;
pub use evaluator::PathEvaluator;
pub use parser::Parser;
