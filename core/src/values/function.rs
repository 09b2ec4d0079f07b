//! Native function values.
//!
//! The language has no user-defined functions: every callable value is a
//! host closure, either supplied through the bindings or registered as a
//! safe global or intrinsic method.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

use super::Value;
use crate::evaluator::ExecutionError;

/// Signature of a native function: the receiver (`undefined` for a bare
/// call) and the evaluated arguments.
///
/// # Example
///
/// ```
/// use warded_core::values::{NativeFunction, Value};
///
/// let double = NativeFunction::new("double", |_this, args| {
///     let n = args.first().map(Value::to_number).unwrap_or(f64::NAN);
///     Ok(Value::from(n * 2.0))
/// });
/// assert_eq!(double.call(&Value::Undefined, &[Value::from(4)]).unwrap(), Value::from(8));
/// ```
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, ExecutionError>;

pub struct NativeFunction {
    name: Cow<'static, str>,
    func: Box<NativeFn>,
    statics: IndexMap<String, Value>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&Value, &[Value]) -> Result<Value, ExecutionError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
            statics: IndexMap::new(),
        }
    }

    /// Attach a static member, e.g. `Number.isInteger`.
    pub fn with_static(mut self, name: impl Into<String>, value: Value) -> Self {
        self.statics.insert(name.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, ExecutionError> {
        (self.func)(this, args)
    }

    pub fn get_static(&self, name: &str) -> Option<Value> {
        self.statics.get(name).cloned()
    }

    pub fn has_static(&self, name: &str) -> bool {
        self.statics.contains_key(name)
    }

    pub fn static_names(&self) -> impl Iterator<Item = &str> {
        self.statics.keys().map(String::as_str)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}
