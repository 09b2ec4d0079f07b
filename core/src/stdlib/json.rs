//! The `JSON` global, backed by `serde_json`.
//!
//! `stringify` follows the usual rules: `undefined` and functions are
//! omitted from objects and become `null` in arrays, non-finite numbers
//! become `null`. Denied keys are never written. Values nested deeper than
//! [`MAX_DEPTH`] (which includes every cycle) are rejected.
//!
//! `parse` drops structurally dangerous keys such as `__proto__`.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::arg;
use super::number::MAX_SAFE_INTEGER;
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::security::{check_property, is_structurally_dangerous};
use crate::values::convert::to_integer;
use crate::values::{Object, Value};

/// Deepest nesting `stringify` will follow.
pub const MAX_DEPTH: usize = 128;

fn json_error(err: serde_json::Error) -> ExecutionError {
    RuntimeError::Json {
        message: err.to_string(),
    }
    .into()
}

// ============================================================================
// Value -> JSON
// ============================================================================

/// `None` for values JSON cannot represent (`undefined`, functions).
pub fn to_json(value: &Value) -> Result<Option<serde_json::Value>, RuntimeError> {
    to_json_at(value, 0)
}

fn to_json_at(value: &Value, depth: usize) -> Result<Option<serde_json::Value>, RuntimeError> {
    use serde_json::Value as Json;

    Ok(Some(match value {
        Value::Guarded(view) => return to_json_at(view.target(), depth),
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Json::String(s.to_string()),
        Value::Array(items) => {
            if depth >= MAX_DEPTH {
                return Err(RuntimeError::CyclicValue);
            }
            let items = items
                .iter()
                .map(|item| Ok(to_json_at(item, depth + 1)?.unwrap_or(Json::Null)))
                .collect::<Result<Vec<_>, RuntimeError>>()?;
            Json::Array(items)
        }
        Value::Object(object) => {
            if depth >= MAX_DEPTH {
                return Err(RuntimeError::CyclicValue);
            }
            let mut map = serde_json::Map::new();
            for (key, item) in object.entries() {
                if !check_property(&key).is_allowed() {
                    continue;
                }
                if let Some(json) = to_json_at(&item, depth + 1)? {
                    map.insert(key, json);
                }
            }
            Json::Object(map)
        }
    }))
}

/// Integral numbers in the safe range are written without a fraction.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.trunc() == n && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Indentation from the third `stringify` argument: a count of spaces (at
/// most 10) or a string (first 10 characters).
fn indent_arg(value: Option<&Value>) -> Option<String> {
    let indent = match value.map(Value::unguarded) {
        Some(Value::Number(n)) => " ".repeat(to_integer(*n).clamp(0.0, 10.0) as usize),
        Some(Value::String(s)) => s.chars().take(10).collect(),
        _ => return None,
    };
    (!indent.is_empty()).then_some(indent)
}

fn to_pretty_string(json: &serde_json::Value, indent: &str) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    json.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// `JSON.stringify(value, replacer?, indent?)`. The replacer argument is
/// accepted but ignored.
fn json_stringify(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let Some(json) = to_json(&arg(args, 0))? else {
        return Ok(Value::Undefined);
    };
    let text = match indent_arg(args.get(2)) {
        Some(indent) => to_pretty_string(&json, &indent),
        None => serde_json::to_string(&json),
    }
    .map_err(json_error)?;
    Ok(Value::from(text))
}

// ============================================================================
// JSON -> Value
// ============================================================================

pub fn from_json(json: serde_json::Value) -> Value {
    use serde_json::Value as Json;

    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::from(s),
        Json::Array(items) => Value::from(items.into_iter().map(from_json).collect::<Vec<_>>()),
        Json::Object(map) => {
            let object = Object::new();
            for (key, item) in map {
                if is_structurally_dangerous(&key) {
                    tracing::warn!(key = key.as_str(), "dropping dangerous key from JSON input");
                    continue;
                }
                object.insert(key, from_json(item));
            }
            Value::from(object)
        }
    }
}

fn json_parse(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let text = arg(args, 0).to_string();
    let json: serde_json::Value = serde_json::from_str(&text).map_err(json_error)?;
    Ok(from_json(json))
}

pub fn build_json_package() -> Value {
    Value::object([
        ("stringify", Value::function("stringify", json_stringify)),
        ("parse", Value::function("parse", json_parse)),
    ])
}
