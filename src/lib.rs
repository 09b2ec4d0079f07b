//! warded - a sandboxed expression language for template bindings
//!
//! # Overview
//!
//! warded evaluates the small expressions a template engine attaches to
//! markup (`count + 1`, `user.name`, `items.length > 0 ? 'many' : 'none'`)
//! without generating host code. It is meant for hosts running under a
//! strict content security policy, where evaluating strings is off the
//! table.
//!
//! Every identifier and property name is checked against a denylist and a
//! name-pattern heuristic before it is resolved, and values handed back by
//! host functions are wrapped in read-only views.
//!
//! # Quick Start
//!
//! ```
//! use warded::{Bindings, Engine, EngineOptions, Value};
//!
//! let engine = Engine::new(EngineOptions::default());
//! let expr = engine.compile("items.length > 1 ? 'many' : 'few'").unwrap();
//!
//! let state = Value::object([("items", Value::from(vec![Value::from(1), Value::from(2)]))]);
//! assert_eq!(expr.evaluate(&Bindings::new(state)).unwrap(), Value::from("many"));
//! ```
//!
//! # Host Functions
//!
//! Host closures are ordinary values:
//!
//! ```
//! use warded::{Bindings, Value, evaluate};
//!
//! let greet = Value::function("greet", |_this, args| {
//!     let name = args.first().map(Value::to_string).unwrap_or_default();
//!     Ok(Value::object([("text", Value::from(format!("hi {name}")))]))
//! });
//! let state = Value::object([("greet", greet)]);
//!
//! let result = evaluate("greet('Ada').text", &Bindings::new(state)).unwrap();
//! assert_eq!(result, Value::from("hi Ada"));
//! ```
//!
//! # Errors
//!
//! Syntax errors point at the offending span; use [`render_error`] and
//! friends to print them with source context.

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from warded_core
pub use warded_core::api::{
    Bindings, CompiledExpression, Diagnostic, Engine, EngineOptions, Error, HostServices,
    NoopHost, ScopeBinding, Severity, evaluate,
};

// Re-export commonly used types and values
pub use warded_core::scope::{self, Scope, ScopeKind, ScopeRef, new_scope};
pub use warded_core::values::{self, NativeFunction, Object, OwnerId, Value};

// Re-export errors
pub use warded_core::evaluator::{ExecutionError, RuntimeError};
pub use warded_core::parser::{CompileError, ParseError, ParseErrorKind, Span};
pub use warded_core::security::SecurityError;
