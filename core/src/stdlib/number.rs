//! Number and boolean methods, the `Number`/`String`/`Boolean` coercion
//! functions and the global numeric parsers.

use super::{Method, arg, number_arg, number_arg_or, string_arg};
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::values::convert::{number_to_string, to_integer};
use crate::values::{NativeFunction, Value};

/// Largest integer `n` such that `n` and `n + 1` are both exactly
/// representable.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn receiver_number(this: &Value) -> f64 {
    this.unguarded().to_number()
}

// ============================================================================
// Number methods
// ============================================================================

/// Fixed-point notation with `digits` fraction digits (0 to 100). Exact
/// ties round away from zero.
fn number_to_fixed(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let n = receiver_number(this);
    let digits = to_integer(number_arg_or(args, 0, 0.0));
    if !(0.0..=100.0).contains(&digits) {
        return Err(RuntimeError::native("toFixed", "digits must be between 0 and 100").into());
    }
    if !n.is_finite() || n.abs() >= 1e21 {
        return Ok(Value::from(number_to_string(n)));
    }
    // -0 prints as 0
    let n = if n == 0.0 { 0.0 } else { n };
    Ok(Value::from(to_fixed(n, digits as usize)))
}

fn to_fixed(n: f64, digits: usize) -> String {
    const PROBE: usize = 25;
    let probe = format!("{:.*}", digits + PROBE, n.abs());
    let tail = &probe[probe.len() - PROBE..];
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if is_tie {
        // Nudge a quarter unit away from zero so formatting rounds up.
        let nudge = n.signum() * 10f64.powi(-(digits as i32)) / 4.0;
        format!("{:.*}", digits, n + nudge)
    } else {
        format!("{:.*}", digits, n)
    }
}

/// Render in `radix` (2 to 36, default 10).
fn number_to_string_method(this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let n = receiver_number(this);
    let radix = to_integer(number_arg_or(args, 0, 10.0));
    if !(2.0..=36.0).contains(&radix) {
        return Err(RuntimeError::native("toString", "radix must be between 2 and 36").into());
    }
    if radix == 10.0 || !n.is_finite() {
        return Ok(Value::from(number_to_string(n)));
    }
    Ok(Value::from(to_radix_string(n, radix as u32)))
}

fn to_radix_string(n: f64, radix: u32) -> String {
    let base = f64::from(radix);
    let digit = |d: f64| std::char::from_digit(d as u32, radix).unwrap_or('0');

    let mut int_part = n.abs().trunc();
    let mut frac_part = n.abs().fract();

    let mut int_digits = Vec::new();
    loop {
        int_digits.push(digit(int_part % base));
        int_part = (int_part / base).trunc();
        if int_part == 0.0 {
            break;
        }
    }

    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    out.extend(int_digits.iter().rev());

    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..52 {
            frac_part *= base;
            let d = frac_part.trunc();
            out.push(digit(d));
            frac_part -= d;
            if frac_part == 0.0 {
                break;
            }
        }
    }
    out
}

pub(crate) const METHODS: &[(&str, Method)] = &[
    ("toFixed", number_to_fixed),
    ("toString", number_to_string_method),
];

fn boolean_to_string(this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::from(this.unguarded().is_truthy().to_string()))
}

pub(crate) const BOOLEAN_METHODS: &[(&str, Method)] = &[("toString", boolean_to_string)];

// ============================================================================
// Parsing
// ============================================================================

/// Leading integer in `radix`. Radix 0 or missing means 10, or 16 when the
/// text starts with `0x`.
pub(crate) fn parse_int(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let text = string_arg(args, 0);
    let mut s = text.trim_start();
    let mut sign = 1.0;
    if let Some(rest) = s.strip_prefix('-') {
        sign = -1.0;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    let mut radix = to_integer(number_arg_or(args, 1, 0.0)) as i64;
    let mut allow_hex_prefix = true;
    if radix == 0 {
        radix = 10;
    } else if !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    } else if radix != 16 {
        allow_hex_prefix = false;
    }
    if allow_hex_prefix {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }

    let radix = radix as u32;
    let digits: Vec<u32> = s.chars().map_while(|c| c.to_digit(radix)).collect();
    if digits.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    let value = digits
        .iter()
        .fold(0.0_f64, |acc, &d| acc * f64::from(radix) + f64::from(d));
    Ok(Value::Number(sign * value))
}

/// Longest decimal prefix of the text, or `NaN`.
pub(crate) fn parse_float(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let text = string_arg(args, 0);
    Ok(Value::Number(parse_float_prefix(text.trim_start())))
}

fn parse_float_prefix(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }
    if s[pos..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(pos);
    let mut end = int_end;
    let mut has_digits = int_end > pos;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

/// Coercing `isNaN`.
pub(crate) fn global_is_nan(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Bool(number_arg(args, 0).is_nan()))
}

/// Coercing `isFinite`.
pub(crate) fn global_is_finite(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Bool(number_arg(args, 0).is_finite()))
}

// ============================================================================
// Coercion functions
// ============================================================================

fn number_call(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Number(number_arg_or(args, 0, 0.0)))
}

fn number_is_integer(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Bool(matches!(
        arg(args, 0),
        Value::Number(n) if n.is_finite() && n.trunc() == n
    )))
}

fn number_is_finite(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_finite())))
}

fn number_is_nan(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_nan())))
}

/// `Number(x)` plus its static members.
pub fn build_number_function() -> Value {
    Value::from(
        NativeFunction::new("Number", number_call)
            .with_static("isInteger", Value::function("isInteger", number_is_integer))
            .with_static("isFinite", Value::function("isFinite", number_is_finite))
            .with_static("isNaN", Value::function("isNaN", number_is_nan))
            .with_static("parseFloat", Value::function("parseFloat", parse_float))
            .with_static("parseInt", Value::function("parseInt", parse_int))
            .with_static("MAX_SAFE_INTEGER", Value::Number(MAX_SAFE_INTEGER))
            .with_static("MIN_SAFE_INTEGER", Value::Number(-MAX_SAFE_INTEGER))
            .with_static("EPSILON", Value::Number(f64::EPSILON)),
    )
}

/// `String(x)`; no argument gives the empty string.
pub fn build_string_function() -> Value {
    Value::function("String", |_this, args| {
        Ok(match args.first() {
            None => Value::from(""),
            Some(value) => Value::from(value.to_string()),
        })
    })
}

pub fn build_boolean_function() -> Value {
    Value::function("Boolean", |_this, args| {
        Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
    })
}
