//! Tree-walking evaluator for node expressions.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::ExpressionError;
use super::value::{
    compare, is_truthy, lookup, loose_equals, number, strict_equals, to_number, to_text, Lookup,
};
use crate::nodepath::evaluator::ROOT_ALIAS;

/// Work limits for a single expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of expression nodes evaluated.
    pub max_steps: usize,
    /// Maximum nesting depth, when parsing and when evaluating.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            max_depth: 256,
        }
    }
}

/// Evaluates expressions against one document.
///
/// The interpreter only holds a shared reference to the document, so it
/// cannot change it; counters are reset on every call to [`eval`](Self::eval).
pub struct Interpreter<'a> {
    root: &'a Value,
    limits: Limits,
    steps: usize,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(root: &'a Value, limits: &Limits) -> Self {
        Interpreter {
            root,
            limits: *limits,
            steps: 0,
            depth: 0,
        }
    }

    /// Evaluates `expr` and returns an owned result.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, ExpressionError> {
        self.steps = 0;
        self.depth = 0;
        self.eval_expr(expr).map(Cow::into_owned)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Cow<'a, Value>, ExpressionError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(ExpressionError::StepLimit {
                limit: self.limits.max_steps,
            });
        }
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(ExpressionError::TooDeep {
                limit: self.limits.max_depth,
            });
        }
        let result = self.eval_node(expr);
        self.depth -= 1;
        result
    }

    fn eval_node(&mut self, expr: &Expr) -> Result<Cow<'a, Value>, ExpressionError> {
        match expr {
            Expr::Literal(value) => Ok(Cow::Owned(value.clone())),
            Expr::Identifier(name) => self.resolve_identifier(name),
            Expr::Member(object, name) => {
                let container = self.eval_expr(object)?;
                select(container, &Value::String(name.clone()))
            }
            Expr::Index(object, index) => {
                let container = self.eval_expr(object)?;
                let key = self.eval_expr(index)?;
                select(container, &key)
            }
            Expr::Unary(op, operand) => {
                let value = self.eval_expr(operand)?;
                let result = match op {
                    UnaryOp::Not => Value::Bool(!is_truthy(&value)),
                    UnaryOp::Neg => number(-to_number(&value)?)?,
                    UnaryOp::Plus => number(to_number(&value)?)?,
                };
                Ok(Cow::Owned(result))
            }
            Expr::Binary(BinaryOp::And, left, right) => {
                let left = self.eval_expr(left)?;
                if is_truthy(&left) {
                    self.eval_expr(right)
                } else {
                    Ok(left)
                }
            }
            Expr::Binary(BinaryOp::Or, left, right) => {
                let left = self.eval_expr(left)?;
                if is_truthy(&left) {
                    Ok(left)
                } else {
                    self.eval_expr(right)
                }
            }
            Expr::Binary(op, left, right) => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                binary(*op, &left, &right).map(Cow::Owned)
            }
            Expr::Conditional(test, then, otherwise) => {
                let test = self.eval_expr(test)?;
                if is_truthy(&test) {
                    self.eval_expr(then)
                } else {
                    self.eval_expr(otherwise)
                }
            }
        }
    }

    fn resolve_identifier(&self, name: &str) -> Result<Cow<'a, Value>, ExpressionError> {
        if let Some(member) = self.root.as_object().and_then(|members| members.get(name)) {
            return Ok(Cow::Borrowed(member));
        }
        if name == ROOT_ALIAS {
            return Ok(Cow::Borrowed(self.root));
        }
        Err(ExpressionError::runtime(format!("{} is not defined", name)))
    }
}

/// Reads `key` from a container, keeping borrowed values borrowed.
fn select<'a>(container: Cow<'a, Value>, key: &Value) -> Result<Cow<'a, Value>, ExpressionError> {
    match container {
        Cow::Borrowed(value) => Ok(match lookup(value, key)? {
            Lookup::Child(child) => Cow::Borrowed(child),
            Lookup::Computed(computed) => Cow::Owned(computed),
        }),
        Cow::Owned(value) => Ok(Cow::Owned(match lookup(&value, key)? {
            Lookup::Child(child) => child.clone(),
            Lookup::Computed(computed) => computed,
        })),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, ExpressionError> {
    let result = match op {
        BinaryOp::Add => {
            if left.is_string() || right.is_string() {
                Value::String(to_text(left)? + &to_text(right)?)
            } else {
                number(to_number(left)? + to_number(right)?)?
            }
        }
        BinaryOp::Sub => number(to_number(left)? - to_number(right)?)?,
        BinaryOp::Mul => number(to_number(left)? * to_number(right)?)?,
        BinaryOp::Div => {
            let divisor = to_number(right)?;
            if divisor == 0.0 {
                return Err(ExpressionError::runtime("division by zero"));
            }
            number(to_number(left)? / divisor)?
        }
        BinaryOp::Rem => {
            let divisor = to_number(right)?;
            if divisor == 0.0 {
                return Err(ExpressionError::runtime("division by zero"));
            }
            number(to_number(left)? % divisor)?
        }
        BinaryOp::Lt => Value::Bool(compare(left, right)? == Ordering::Less),
        BinaryOp::Le => Value::Bool(compare(left, right)? != Ordering::Greater),
        BinaryOp::Gt => Value::Bool(compare(left, right)? == Ordering::Greater),
        BinaryOp::Ge => Value::Bool(compare(left, right)? != Ordering::Less),
        BinaryOp::LooseEq => Value::Bool(loose_equals(left, right)),
        BinaryOp::LooseNe => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNe => Value::Bool(!strict_equals(left, right)),
        // Short-circuit operators never reach here.
        BinaryOp::And | BinaryOp::Or => {
            return Err(ExpressionError::runtime("unexpected logical operator"))
        }
    };
    Ok(result)
}
