//! Array methods and the `Array` global.
//!
//! Arrays are immutable from expressions: every method returns a new value.

use super::{Method, arg, check_string_len, number_arg_or};
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::evaluator::operators::strict_equals;
use crate::values::Value;
use crate::values::convert::relative_index;

fn items(this: &Value) -> &[Value] {
    this.unguarded().as_array().unwrap_or_default()
}

/// `===`, except that `NaN` matches itself.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a.unguarded(), b.unguarded()) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => strict_equals(a, b),
    }
}

fn join_items(items: &[Value], separator: &str, function: &str) -> Result<String, RuntimeError> {
    let parts: Vec<String> = items
        .iter()
        .map(|item| {
            if item.is_nullish() {
                String::new()
            } else {
                item.to_string()
            }
        })
        .collect();
    let separators = parts.len().saturating_sub(1) * separator.chars().count();
    let len = parts.iter().map(|part| part.chars().count()).sum::<usize>() + separators;
    check_string_len(len, function)?;
    Ok(parts.join(separator))
}

// ============================================================================
// Methods
// ============================================================================

fn array_includes(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let items = items(this);
    let search = arg(args, 0);
    let from = relative_index(number_arg_or(args, 1, 0.0), items.len());
    Ok(Value::Bool(
        items[from..].iter().any(|item| same_value_zero(item, &search)),
    ))
}

fn array_index_of(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let items = items(this);
    let search = arg(args, 0);
    let from = relative_index(number_arg_or(args, 1, 0.0), items.len());
    Ok(items[from..]
        .iter()
        .position(|item| strict_equals(item, &search))
        .map_or(Value::from(-1), |i| Value::from(from + i)))
}

/// Nullish elements join as empty strings.
fn array_join(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let separator = match arg(args, 0) {
        Value::Undefined => ",".to_string(),
        other => other.to_string(),
    };
    Ok(Value::from(join_items(items(this), &separator, "join")?))
}

fn array_slice(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let items = items(this);
    let len = items.len();
    let start = relative_index(number_arg_or(args, 0, 0.0), len);
    let end = relative_index(number_arg_or(args, 1, len as f64), len);
    if start >= end {
        return Ok(Value::from(Vec::new()));
    }
    Ok(Value::from(items[start..end].to_vec()))
}

/// Array arguments are spread one level; anything else is appended.
fn array_concat(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let mut out = items(this).to_vec();
    for value in args {
        match value.unguarded() {
            Value::Array(more) => out.extend(more.iter().cloned()),
            _ => out.push(value.clone()),
        }
    }
    Ok(Value::from(out))
}

/// Element at a position; negative positions count from the end.
fn array_at(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let items = items(this);
    let index = number_arg_or(args, 0, 0.0);
    let index = if index.is_nan() { 0.0 } else { index.trunc() };
    let index = if index < 0.0 {
        items.len() as f64 + index
    } else {
        index
    };
    if index < 0.0 || index >= items.len() as f64 {
        return Ok(Value::Undefined);
    }
    Ok(items[index as usize].clone())
}

fn array_to_string(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::from(join_items(items(this), ",", "toString")?))
}

pub(crate) const METHODS: &[(&str, Method)] = &[
    ("includes", array_includes),
    ("indexOf", array_index_of),
    ("join", array_join),
    ("slice", array_slice),
    ("concat", array_concat),
    ("at", array_at),
    ("toString", array_to_string),
];

// ============================================================================
// Package Builder
// ============================================================================

fn array_is_array(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Bool(matches!(arg(args, 0).unguarded(), Value::Array(_))))
}

fn array_of(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::from(args.to_vec()))
}

/// Build the `Array` object (`isArray`, `of`).
pub fn build_array_package() -> Value {
    Value::object([
        ("isArray", Value::function("isArray", array_is_array)),
        ("of", Value::function("of", array_of)),
    ])
}
