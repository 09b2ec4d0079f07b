//! The restricted `Object` global: `keys`, `values`, `entries`,
//! `fromEntries` and `hasOwn`. Nothing that touches prototypes or property
//! descriptors is exposed.
//!
//! Denied names never appear in results, and `fromEntries` never builds an
//! object carrying one.

use super::arg;
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::security::{SecurityError, check_property, is_structurally_dangerous};
use crate::values::{Object, Value};

fn target(args: &[Value], function: &str) -> Result<Value, ExecutionError> {
    let value = arg(args, 0);
    if value.is_nullish() {
        return Err(RuntimeError::native(
            function,
            format!("cannot convert {value} to object"),
        )
        .into());
    }
    Ok(value)
}

fn visible_keys(value: &Value) -> Vec<String> {
    value
        .keys()
        .into_iter()
        .filter(|key| check_property(key).is_allowed())
        .collect()
}

fn object_keys(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let value = target(args, "Object.keys")?;
    Ok(Value::from(
        visible_keys(&value)
            .into_iter()
            .map(Value::from)
            .collect::<Vec<_>>(),
    ))
}

fn object_values(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let value = target(args, "Object.values")?;
    Ok(Value::from(
        visible_keys(&value)
            .iter()
            .map(|key| value.get_property(key))
            .collect::<Vec<_>>(),
    ))
}

fn object_entries(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let value = target(args, "Object.entries")?;
    Ok(Value::from(
        visible_keys(&value)
            .into_iter()
            .map(|key| {
                let item = value.get_property(&key);
                Value::from(vec![Value::from(key), item])
            })
            .collect::<Vec<_>>(),
    ))
}

/// Build an object from `[key, value]` pairs, dropping denied keys.
fn object_from_entries(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let entries = target(args, "Object.fromEntries")?;
    let Some(entries) = entries.unguarded().as_array() else {
        return Err(RuntimeError::native("Object.fromEntries", "expected an array of entries").into());
    };

    let object = Object::new();
    for entry in entries {
        let Some(pair) = entry.unguarded().as_array() else {
            return Err(RuntimeError::native(
                "Object.fromEntries",
                format!("entry {entry} is not a [key, value] pair"),
            )
            .into());
        };
        let key = pair.first().cloned().unwrap_or_default().to_string();
        if is_structurally_dangerous(&key) || !check_property(&key).is_allowed() {
            tracing::warn!(key = key.as_str(), "dropping denied key from Object.fromEntries");
            continue;
        }
        object.insert(key, pair.get(1).cloned().unwrap_or_default());
    }
    Ok(Value::from(object))
}

/// Like `in`, probing a denied name is a security fault.
fn object_has_own(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let value = target(args, "Object.hasOwn")?;
    let key = arg(args, 1).to_string();
    if !check_property(&key).is_allowed() {
        tracing::warn!(name = key.as_str(), "Object.hasOwn probe of a denied name");
        return Err(SecurityError::ForbiddenProbe { name: key }.into());
    }
    Ok(Value::Bool(value.has_property(&key)?))
}

/// Build the restricted `Object` global.
pub fn build_object_package() -> Value {
    Value::object([
        ("keys", Value::function("keys", object_keys)),
        ("values", Value::function("values", object_values)),
        ("entries", Value::function("entries", object_entries)),
        ("fromEntries", Value::function("fromEntries", object_from_entries)),
        ("hasOwn", Value::function("hasOwn", object_has_own)),
    ])
}
