//! Sandboxed node expressions.
//!
//! The expression strategy treats a node expression as a small program
//! evaluated against the document. Identifiers are members of the root
//! object; `root` names the document itself. The language has literals,
//! member and index access, `length`, arithmetic, comparison, logical
//! operators and `?:`. It has no calls, no assignment and no access to the
//! host, so evaluating an expression can only read the document.
//!
//! ```
//! use jsonsteps::expression::{evaluate, Limits};
//! use serde_json::json;
//!
//! let doc = json!({"items": [1, 2, 3], "total": 3});
//! let limits = Limits::default();
//! assert_eq!(evaluate(&doc, "items.length", &limits).unwrap(), json!(3));
//! assert_eq!(evaluate(&doc, "items.length == total", &limits).unwrap(), json!(true));
//! ```

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::ExpressionError;
pub use interpreter::{Interpreter, Limits};
pub use parser::Parser;

use serde_json::Value;

/// Parses and evaluates `source` against `root` in one go.
pub fn evaluate(root: &Value, source: &str, limits: &Limits) -> Result<Value, ExpressionError> {
    let expr = Parser::parse(source, limits.max_depth)?;
    Interpreter::new(root, limits).eval(&expr)
}
