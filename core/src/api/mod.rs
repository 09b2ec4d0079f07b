//! Public API for the warded expression language.
//!
//! [`Engine::compile`] turns text into a [`CompiledExpression`];
//! [`CompiledExpression::evaluate`] runs it against per-call [`Bindings`].
//! The host plugs in through [`HostServices`].
//!
//! # Example
//!
//! ```
//! use warded_core::api::{Bindings, evaluate};
//! use warded_core::values::Value;
//!
//! let state = Value::object([("items", Value::from(vec![Value::from(1), Value::from(2)]))]);
//! let result = evaluate("items.length > 1 ? 'many' : 'few'", &Bindings::new(state)).unwrap();
//! assert_eq!(result, Value::from("many"));
//! ```

mod bindings;
mod engine;
mod error;
mod expression;
mod host;
mod options;

pub use bindings::{Bindings, ScopeBinding};
pub use engine::Engine;
pub use error::{Diagnostic, Error, Severity};
pub use expression::CompiledExpression;
pub use host::{HostServices, NoopHost};
pub use options::EngineOptions;

use crate::values::Value;

/// Compile `source` with default options and evaluate it once.
///
/// Runtime faults read as `undefined`; syntax and security faults are
/// returned.
pub fn evaluate(source: &str, bindings: &Bindings) -> Result<Value, Error> {
    Engine::default().evaluate(source, bindings)
}
