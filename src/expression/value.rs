//! Value helpers: coercion, comparison and property lookup.
//!
//! These follow the loose rules of dynamic scripting languages where that is
//! useful for test fixtures (`"3" == 3`), and refuse where those rules would
//! produce `NaN`, `Infinity` or `undefined`: such cases are runtime errors.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::error::ExpressionError;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Returns the type name used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts an arithmetic result back into a JSON number.
///
/// Integral results become integers so that `items.length + 1` prints as `4`.
pub fn number(n: f64) -> Result<Value, ExpressionError> {
    if !n.is_finite() {
        return Err(ExpressionError::runtime("result is not a finite number"));
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::Number(Number::from(n as i64)));
    }
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| ExpressionError::runtime("result is not a finite number"))
}

/// Coerces a value to a number: `null` is 0, booleans are 0/1, strings are
/// parsed after trimming (empty is 0).
pub fn to_number(value: &Value) -> Result<f64, ExpressionError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExpressionError::runtime(format!("number {} is out of range", n))),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(ExpressionError::runtime(format!(
                    "cannot convert '{}' to a number",
                    s
                ))),
            }
        }
        Value::Array(_) | Value::Object(_) => Err(ExpressionError::runtime(format!(
            "cannot convert {} to a number",
            type_name(value)
        ))),
    }
}

/// Formats a number without a trailing `.0` when it is integral.
pub fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Coerces a scalar to text for string concatenation.
pub fn to_text(value: &Value) -> Result<String, ExpressionError> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(format_number(n)),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(ExpressionError::runtime(format!(
            "cannot convert {} to a string",
            type_name(value)
        ))),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Exact value of an integer number; `None` for floats.
pub fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Integers compare exactly, so values past 2^53 stay distinct; anything
/// involving a float compares as `f64`.
pub fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (integer(x), integer(y)) {
        (Some(a), Some(b)) => a == b,
        _ => x.as_f64() == y.as_f64(),
    }
}

/// Numeric comparison of a number with text. Integer text against an
/// integer compares exactly; text that is not a number never matches.
pub fn number_equals_text(n: &Number, text: &str) -> bool {
    let text = text.trim();
    if let (Some(a), Ok(b)) = (integer(n), text.parse::<i128>()) {
        return a == b;
    }
    match (n.as_f64(), text.parse::<f64>()) {
        (Some(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `===`: same type and same value. Numbers compare by value, so `1` and
/// `1.0` are equal.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => a == b,
    }
}

/// `==`: numbers, numeric strings and booleans are compared after
/// conversion to numbers; `null` only equals `null`; arrays and objects
/// compare structurally.
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), _) => loose_equals(&bool_number(*x), b),
        (_, Value::Bool(y)) => loose_equals(a, &bool_number(*y)),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            if let (Some(x), Ok(y)) = (integer(n), s.trim().parse::<i128>()) {
                return x == y;
            }
            match (to_number(a), to_number(b)) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            }
        }
        _ => strict_equals(a, b),
    }
}

fn bool_number(b: bool) -> Value {
    Value::Number(Number::from(u8::from(b)))
}

/// Orders two values for `<`, `<=`, `>`, `>=`. Two strings compare
/// lexicographically; anything else compares numerically.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, ExpressionError> {
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Ok(x.cmp(y));
    }
    let x = to_number(a)?;
    let y = to_number(b)?;
    x.partial_cmp(&y)
        .ok_or_else(|| ExpressionError::runtime("values cannot be compared"))
}

/// Result of looking a key up on a value.
#[derive(Debug, PartialEq)]
pub enum Lookup<'v> {
    /// A value that lives inside the container.
    Child(&'v Value),
    /// A value computed from the container, such as `length`.
    Computed(Value),
}

enum Key {
    Position(usize),
    Name(String),
}

impl Key {
    fn from_value(key: &Value) -> Result<Key, ExpressionError> {
        match key {
            Value::String(s) => Ok(match s.parse::<usize>() {
                Ok(idx) if idx.to_string() == *s => Key::Position(idx),
                _ => Key::Name(s.clone()),
            }),
            Value::Number(n) => match n.as_u64() {
                Some(idx) => Ok(Key::Position(idx as usize)),
                None => match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= MAX_SAFE_INTEGER => {
                        Ok(Key::Position(f as usize))
                    }
                    _ => Ok(Key::Name(format_number(n))),
                },
            },
            other => Err(ExpressionError::runtime(format!(
                "cannot use {} as a property key",
                type_name(other)
            ))),
        }
    }

    fn text(&self) -> String {
        match self {
            Key::Position(idx) => idx.to_string(),
            Key::Name(name) => name.clone(),
        }
    }
}

/// Looks `key` up on `container`: object members, array elements, string
/// characters and the `length` of arrays and strings.
pub fn lookup<'v>(container: &'v Value, key: &Value) -> Result<Lookup<'v>, ExpressionError> {
    let key = Key::from_value(key)?;
    match (container, &key) {
        (Value::Object(members), _) => {
            let name = key.text();
            match members.get(&name) {
                Some(child) => Ok(Lookup::Child(child)),
                None if name == "length" => Ok(Lookup::Computed(count(members.len()))),
                None => Err(ExpressionError::runtime(format!(
                    "property '{}' is not defined",
                    name
                ))),
            }
        }
        (Value::Array(items), Key::Position(idx)) => {
            items.get(*idx).map(Lookup::Child).ok_or_else(|| {
                ExpressionError::runtime(format!(
                    "index {} is out of bounds for an array of length {}",
                    idx,
                    items.len()
                ))
            })
        }
        (Value::Array(items), Key::Name(name)) if name == "length" => {
            Ok(Lookup::Computed(count(items.len())))
        }
        (Value::String(s), Key::Position(idx)) => s
            .chars()
            .nth(*idx)
            .map(|ch| Lookup::Computed(Value::String(ch.to_string())))
            .ok_or_else(|| {
                ExpressionError::runtime(format!("index {} is out of bounds for a string", idx))
            }),
        (Value::String(s), Key::Name(name)) if name == "length" => {
            Ok(Lookup::Computed(count(s.encode_utf16().count())))
        }
        _ => Err(ExpressionError::runtime(format!(
            "cannot read property '{}' of {}",
            key.text(),
            type_name(container)
        ))),
    }
}

fn count(n: usize) -> Value {
    Value::Number(Number::from(n as u64))
}
