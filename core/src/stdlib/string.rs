//! String methods.
//!
//! Indices and lengths count characters (Unicode scalar values), so
//! `"héllo".length` is 5 and `slice` never splits a character.

use super::{MAX_STRING_LEN, Method, arg, check_string_len, number_arg_or, string_arg};
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::values::Value;
use crate::values::convert::{relative_index, to_integer};

fn receiver(this: &Value) -> String {
    this.unguarded().to_string()
}

fn chars(this: &Value) -> Vec<char> {
    receiver(this).chars().collect()
}

/// Clamp a (possibly fractional or negative) position into `0..=len`.
fn clamp_position(n: f64, len: usize) -> usize {
    to_integer(n).clamp(0.0, len as f64) as usize
}

/// First occurrence of `needle` at or after `from`, as a character index.
fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..].starts_with(needle))
}

fn string_value(s: impl Into<String>) -> Result<Value, ExecutionError> {
    Ok(Value::from(s.into()))
}

// ============================================================================
// Inspection
// ============================================================================

fn string_includes(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let haystack = chars(this);
    let needle: Vec<char> = string_arg(args, 0).chars().collect();
    let from = clamp_position(number_arg_or(args, 1, 0.0), haystack.len());
    Ok(Value::Bool(find_chars(&haystack, &needle, from).is_some()))
}

fn string_starts_with(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let haystack = chars(this);
    let needle: Vec<char> = string_arg(args, 0).chars().collect();
    let from = clamp_position(number_arg_or(args, 1, 0.0), haystack.len());
    Ok(Value::Bool(haystack[from..].starts_with(&needle)))
}

fn string_ends_with(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let haystack = chars(this);
    let needle: Vec<char> = string_arg(args, 0).chars().collect();
    let end = clamp_position(number_arg_or(args, 1, haystack.len() as f64), haystack.len());
    Ok(Value::Bool(haystack[..end].ends_with(&needle)))
}

/// Character index of the first match, or `-1`.
fn string_index_of(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let haystack = chars(this);
    let needle: Vec<char> = string_arg(args, 0).chars().collect();
    let from = clamp_position(number_arg_or(args, 1, 0.0), haystack.len());
    Ok(match find_chars(&haystack, &needle, from) {
        Some(index) => Value::from(index),
        None => Value::from(-1),
    })
}

fn string_char_at(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let index = to_integer(number_arg_or(args, 0, 0.0));
    if index < 0.0 {
        return string_value("");
    }
    let c = receiver(this).chars().nth(index as usize);
    string_value(c.map(String::from).unwrap_or_default())
}

// ============================================================================
// Transformation
// ============================================================================

fn string_to_upper_case(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    string_value(receiver(this).to_uppercase())
}

fn string_to_lower_case(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    string_value(receiver(this).to_lowercase())
}

fn string_trim(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    string_value(receiver(this).trim())
}

fn string_trim_start(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    string_value(receiver(this).trim_start())
}

fn string_trim_end(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    string_value(receiver(this).trim_end())
}

/// Replace the first occurrence. The pattern is a literal string.
/// Length in characters of `s` with `count` occurrences of `pattern`
/// replaced by `replacement`.
fn replaced_len(s: &str, pattern: &str, replacement: &str, count: usize) -> usize {
    let removed = count.saturating_mul(pattern.chars().count());
    let added = count.saturating_mul(replacement.chars().count());
    s.chars().count().saturating_sub(removed).saturating_add(added)
}

fn string_replace(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = receiver(this);
    let pattern = string_arg(args, 0);
    let replacement = string_arg(args, 1);
    let count = usize::from(s.contains(pattern.as_str()));
    check_string_len(replaced_len(&s, &pattern, &replacement, count), "replace")?;
    string_value(s.replacen(&pattern, &replacement, 1))
}

fn string_replace_all(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = receiver(this);
    let pattern = string_arg(args, 0);
    let replacement = string_arg(args, 1);
    let count = s.matches(pattern.as_str()).count();
    check_string_len(replaced_len(&s, &pattern, &replacement, count), "replaceAll")?;
    string_value(s.replace(&pattern, &replacement))
}

fn string_repeat(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = receiver(this);
    let count = to_integer(number_arg_or(args, 0, 0.0));
    if count < 0.0 || count.is_infinite() {
        return Err(RuntimeError::native("repeat", format!("invalid count {count}")).into());
    }
    // Checked in floating point: the product can overflow `usize`.
    if s.chars().count() as f64 * count > MAX_STRING_LEN as f64 {
        return Err(RuntimeError::native("repeat", "result string is too long").into());
    }
    string_value(s.repeat(count as usize))
}

fn padding(s: &str, args: &[Value], function: &str) -> Result<Option<String>, ExecutionError> {
    let target = to_integer(number_arg_or(args, 0, 0.0));
    let fill = match args.get(1) {
        None | Some(Value::Undefined) => " ".to_string(),
        Some(value) => value.to_string(),
    };
    let len = s.chars().count();
    if target <= len as f64 || fill.is_empty() {
        return Ok(None);
    }
    if target > MAX_STRING_LEN as f64 {
        return Err(RuntimeError::native(function, "result string is too long").into());
    }
    Ok(Some(fill.chars().cycle().take(target as usize - len).collect()))
}

fn string_pad_start(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = receiver(this);
    match padding(&s, args, "padStart")? {
        Some(pad) => string_value(pad + &s),
        None => string_value(s),
    }
}

fn string_pad_end(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = receiver(this);
    match padding(&s, args, "padEnd")? {
        Some(pad) => string_value(s + &pad),
        None => string_value(s),
    }
}

fn string_concat(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let mut s = receiver(this);
    let mut len = s.chars().count();
    for value in args {
        let part = value.to_string();
        len += part.chars().count();
        check_string_len(len, "concat")?;
        s.push_str(&part);
    }
    string_value(s)
}

fn string_to_string(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    string_value(receiver(this))
}

// ============================================================================
// Extraction
// ============================================================================

/// Negative positions count from the end.
fn string_slice(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let chars = chars(this);
    let len = chars.len();
    let start = relative_index(number_arg_or(args, 0, 0.0), len);
    let end = relative_index(number_arg_or(args, 1, len as f64), len);
    if start >= end {
        return string_value("");
    }
    string_value(chars[start..end].iter().collect::<String>())
}

/// Negative positions clamp to zero; reversed bounds are swapped.
fn string_substring(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let chars = chars(this);
    let len = chars.len();
    let a = clamp_position(number_arg_or(args, 0, 0.0), len);
    let b = clamp_position(number_arg_or(args, 1, len as f64), len);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    string_value(chars[start..end].iter().collect::<String>())
}

/// Split on a literal separator. An empty separator splits into
/// characters; a missing one yields the whole string.
fn string_split(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let s = receiver(this);
    let limit = match args.get(1) {
        None | Some(Value::Undefined) => usize::MAX,
        Some(value) => to_integer(value.to_number()).max(0.0) as usize,
    };
    let parts: Vec<Value> = match arg(args, 0) {
        Value::Undefined => vec![Value::from(s)],
        separator => {
            let separator = separator.to_string();
            if separator.is_empty() {
                s.chars().map(|c| Value::from(c.to_string())).collect()
            } else {
                s.split(separator.as_str()).map(Value::from).collect()
            }
        }
    };
    Ok(Value::from(parts.into_iter().take(limit).collect::<Vec<_>>()))
}

pub(crate) const METHODS: &[(&str, Method)] = &[
    ("toUpperCase", string_to_upper_case),
    ("toLowerCase", string_to_lower_case),
    ("trim", string_trim),
    ("trimStart", string_trim_start),
    ("trimEnd", string_trim_end),
    ("includes", string_includes),
    ("startsWith", string_starts_with),
    ("endsWith", string_ends_with),
    ("indexOf", string_index_of),
    ("slice", string_slice),
    ("substring", string_substring),
    ("split", string_split),
    ("replace", string_replace),
    ("replaceAll", string_replace_all),
    ("repeat", string_repeat),
    ("padStart", string_pad_start),
    ("padEnd", string_pad_end),
    ("charAt", string_char_at),
    ("concat", string_concat),
    ("toString", string_to_string),
];
