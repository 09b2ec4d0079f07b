//! Core of the warded expression language.
//!
//! warded evaluates small, user-authored expressions (typically template
//! bindings) without ever generating host code. The pipeline is:
//!
//! ```text
//! source --parser--> Expr --evaluator(bindings)--> Value
//! ```
//!
//! Every name the evaluator resolves goes through the [`security`] policy,
//! and every object handed back by a call is wrapped in a read-only
//! [`security::GuardedView`].
//!
//! # Example
//!
//! ```
//! use warded_core::api::{Bindings, Engine, EngineOptions};
//! use warded_core::values::Value;
//!
//! let engine = Engine::new(EngineOptions::default());
//! let expr = engine.compile("user.name + '!'").unwrap();
//!
//! let state = Value::object([("user", Value::object([("name", Value::from("Ada"))]))]);
//! let result = expr.evaluate(&Bindings::new(state)).unwrap();
//! assert_eq!(result, Value::from("Ada!"));
//! ```

pub mod api;
pub mod evaluator;
pub mod parser;
pub mod scope;
pub mod security;
pub mod stdlib;
pub mod syntax;
pub mod values;

pub use api::{
    Bindings, CompiledExpression, Diagnostic, Engine, EngineOptions, Error, HostServices,
    ScopeBinding, Severity, evaluate,
};
pub use values::Value;
