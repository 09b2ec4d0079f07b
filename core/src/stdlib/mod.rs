//! Safe globals and intrinsic members.
//!
//! Expressions see a small, fixed set of globals (`Math`, `JSON`, `Number`,
//! a restricted `Object`, ...) and the usual methods on strings, arrays,
//! numbers and booleans. Nothing here can reach host code, evaluate text or
//! mutate a value in place.
//!
//! The global registry is built once per thread on first use and never
//! changes afterwards. Every registered value is a [`GuardedView`], so even
//! host code holding a global cannot write into it.

use indexmap::IndexMap;

use crate::evaluator::{ExecutionError, RuntimeError};
use crate::security::GuardedView;
use crate::values::Value;

pub mod array;
pub mod date;
pub mod json;
pub mod math;
pub mod number;
pub mod object;
pub mod string;

pub use array::build_array_package;
pub use date::build_date_package;
pub use json::build_json_package;
pub use math::build_math_package;
pub use number::{build_boolean_function, build_number_function, build_string_function};
pub use object::build_object_package;


/// Signature shared by every native global and intrinsic method.
pub(crate) type Method = fn(&Value, &[Value]) -> Result<Value, ExecutionError>;

/// Longest string any operator or method will build, in characters.
pub const MAX_STRING_LEN: usize = 1 << 20;

/// Fails when a string result of `len` characters would exceed
/// [`MAX_STRING_LEN`].
pub(crate) fn check_string_len(len: usize, function: &str) -> Result<(), RuntimeError> {
    if len > MAX_STRING_LEN {
        return Err(RuntimeError::native(function, "result string is too long"));
    }
    Ok(())
}

thread_local! {
    static GLOBALS: IndexMap<&'static str, Value> = build_globals();
}

/// Look up a safe global by name.
pub fn lookup_global(name: &str) -> Option<Value> {
    GLOBALS.with(|globals| globals.get(name).cloned())
}

/// Names of every safe global, in registration order.
pub fn global_names() -> Vec<&'static str> {
    GLOBALS.with(|globals| globals.keys().copied().collect())
}

fn build_globals() -> IndexMap<&'static str, Value> {
    tracing::debug!("building safe globals");
    let globals = [
        ("Math", build_math_package()),
        ("JSON", build_json_package()),
        ("Date", build_date_package()),
        ("Array", build_array_package()),
        ("Object", build_object_package()),
        ("Number", build_number_function()),
        ("String", build_string_function()),
        ("Boolean", build_boolean_function()),
        ("parseInt", Value::function("parseInt", number::parse_int)),
        ("parseFloat", Value::function("parseFloat", number::parse_float)),
        ("isNaN", Value::function("isNaN", number::global_is_nan)),
        ("isFinite", Value::function("isFinite", number::global_is_finite)),
    ];
    globals
        .into_iter()
        .map(|(name, value)| (name, GuardedView::wrap(value)))
        .collect()
}

/// Members every value of a kind has without storing them: `length`, the
/// methods of strings, arrays, numbers and booleans, and a function's
/// `name`.
pub fn intrinsic_member(value: &Value, name: &str) -> Option<Value> {
    match value.unguarded() {
        Value::String(s) => match name {
            "length" => Some(Value::from(s.chars().count())),
            _ => find_method(string::METHODS, name),
        },
        Value::Array(items) => match name {
            "length" => Some(Value::from(items.len())),
            _ => find_method(array::METHODS, name),
        },
        Value::Number(_) => find_method(number::METHODS, name),
        Value::Bool(_) => find_method(number::BOOLEAN_METHODS, name),
        Value::Function(function) => (name == "name").then(|| Value::from(function.name())),
        _ => None,
    }
}

fn find_method(table: &[(&'static str, Method)], name: &str) -> Option<Value> {
    table
        .iter()
        .find(|(method, _)| *method == name)
        .map(|(method, func)| Value::function(*method, *func))
}

// ============================================================================
// Argument helpers
// ============================================================================

/// Argument `index`, or `undefined` when missing.
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Numeric coercion of argument `index` (`NaN` when missing).
pub(crate) fn number_arg(args: &[Value], index: usize) -> f64 {
    args.get(index).map_or(f64::NAN, Value::to_number)
}

/// Numeric argument that defaults when missing or `undefined`.
pub(crate) fn number_arg_or(args: &[Value], index: usize, default: f64) -> f64 {
    match args.get(index) {
        None | Some(Value::Undefined) => default,
        Some(value) => value.to_number(),
    }
}

/// String coercion of argument `index` (`"undefined"` when missing).
pub(crate) fn string_arg(args: &[Value], index: usize) -> String {
    arg(args, index).to_string()
}
