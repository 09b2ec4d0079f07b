//! Math Package
//!
//! Constants: PI, E, LN2, LN10, LOG2E, LOG10E, SQRT2, SQRT1_2
//! Functions: abs, ceil, floor, round, trunc, sign, sqrt, cbrt, pow, min,
//!            max, exp, log, log2, log10, sin, cos, tan, atan2, hypot
//!
//! Arguments are coerced to numbers; missing arguments read as `NaN`.

use std::f64::consts;

use super::{Method, number_arg};
use crate::evaluator::ExecutionError;
use crate::values::Value;

/// Apply a one-argument float function.
fn unary(args: &[Value], f: fn(f64) -> f64) -> Result<Value, ExecutionError> {
    Ok(Value::Number(f(number_arg(args, 0))))
}

// ============================================================================
// Basic Operations
// ============================================================================

fn math_abs(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::abs)
}

/// `-1`, `0` or `1`; zero and `NaN` are returned unchanged.
fn math_sign(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, |n| if n == 0.0 || n.is_nan() { n } else { n.signum() })
}

/// Smallest argument; `Infinity` with no arguments, `NaN` if any is `NaN`.
fn math_min(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Number(args.iter().map(Value::to_number).fold(
        f64::INFINITY,
        |acc, n| {
            if acc.is_nan() || n.is_nan() {
                f64::NAN
            } else {
                acc.min(n)
            }
        },
    )))
}

/// Largest argument; `-Infinity` with no arguments, `NaN` if any is `NaN`.
fn math_max(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    Ok(Value::Number(args.iter().map(Value::to_number).fold(
        f64::NEG_INFINITY,
        |acc, n| {
            if acc.is_nan() || n.is_nan() {
                f64::NAN
            } else {
                acc.max(n)
            }
        },
    )))
}

fn math_hypot(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let numbers: Vec<f64> = args.iter().map(Value::to_number).collect();
    if numbers.iter().any(|n| n.is_infinite()) {
        return Ok(Value::Number(f64::INFINITY));
    }
    Ok(Value::Number(numbers.iter().map(|n| n * n).sum::<f64>().sqrt()))
}

// ============================================================================
// Rounding Functions
// ============================================================================

fn math_floor(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::floor)
}

fn math_ceil(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::ceil)
}

/// Round half up: `round(-2.5)` is `-2`, not `-3`.
fn math_round(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, |n| {
        if n.fract() == 0.0 || !n.is_finite() {
            n
        } else {
            (n + 0.5).floor()
        }
    })
}

fn math_trunc(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::trunc)
}

// ============================================================================
// Exponentiation
// ============================================================================

fn math_sqrt(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    // sqrt of a negative is NaN (IEEE 754)
    unary(args, f64::sqrt)
}

fn math_cbrt(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::cbrt)
}

fn math_pow(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let base = number_arg(args, 0);
    let exp = number_arg(args, 1);
    // 1 ** NaN is NaN here, unlike `f64::powf`.
    if exp.is_nan() {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(base.powf(exp)))
}

fn math_exp(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::exp)
}

// ============================================================================
// Logarithms
// ============================================================================

fn math_log(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::ln)
}

fn math_log2(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::log2)
}

fn math_log10(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::log10)
}

// ============================================================================
// Trigonometry
// ============================================================================

fn math_sin(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::sin)
}

fn math_cos(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::cos)
}

fn math_tan(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    unary(args, f64::tan)
}

fn math_atan2(_this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
    let y = number_arg(args, 0);
    let x = number_arg(args, 1);
    Ok(Value::Number(y.atan2(x)))
}

// ============================================================================
// Package Builder
// ============================================================================

const FUNCTIONS: &[(&str, Method)] = &[
    ("abs", math_abs),
    ("ceil", math_ceil),
    ("floor", math_floor),
    ("round", math_round),
    ("trunc", math_trunc),
    ("sign", math_sign),
    ("sqrt", math_sqrt),
    ("cbrt", math_cbrt),
    ("pow", math_pow),
    ("min", math_min),
    ("max", math_max),
    ("exp", math_exp),
    ("log", math_log),
    ("log2", math_log2),
    ("log10", math_log10),
    ("sin", math_sin),
    ("cos", math_cos),
    ("tan", math_tan),
    ("atan2", math_atan2),
    ("hypot", math_hypot),
];

/// Build the `Math` object.
///
/// # Example
///
/// ```
/// use warded_core::stdlib::build_math_package;
/// use warded_core::values::Value;
///
/// let math = build_math_package();
/// assert_eq!(math.get_property("PI"), Value::from(std::f64::consts::PI));
/// ```
pub fn build_math_package() -> Value {
    let constants = [
        ("PI", consts::PI),
        ("E", consts::E),
        ("LN2", consts::LN_2),
        ("LN10", consts::LN_10),
        ("LOG2E", consts::LOG2_E),
        ("LOG10E", consts::LOG10_E),
        ("SQRT2", consts::SQRT_2),
        ("SQRT1_2", consts::FRAC_1_SQRT_2),
    ]
    .into_iter()
    .map(|(name, value)| (name, Value::Number(value)));

    let functions = FUNCTIONS
        .iter()
        .map(|(name, func)| (*name, Value::function(*name, *func)));

    Value::object(constants.chain(functions))
}
