//! Tree-walking evaluator.
//!
//! The evaluator walks an [`Expr`](crate::parser::Expr) against a set of
//! [`Bindings`](crate::api::Bindings) and produces a [`Value`].
//!
//! ## Design Principles
//!
//! - **Never panic**: all adversarial inputs are handled gracefully.
//! - **Stack-safe**: depth tracking bounds recursion on deeply nested trees.
//! - **Policy first**: every name is checked before the object it names is
//!   touched. Denied reads degrade to `undefined` with a diagnostic; `in`
//!   probes of denied names fail hard.
//!
//! ## Example
//!
//! ```
//! use warded_core::api::{Bindings, EngineOptions};
//! use warded_core::evaluator::eval;
//! use warded_core::parser::parse;
//! use warded_core::values::Value;
//!
//! let expr = parse("a * 2").unwrap();
//! let bindings = Bindings::new(Value::object([("a", Value::from(21))]));
//! let result = eval(&expr, &bindings, &EngineOptions::default()).unwrap();
//! assert_eq!(result, Value::from(42));
//! ```

mod error;
mod eval;
pub(crate) mod operators;


pub use error::{ExecutionError, RuntimeError};
pub use eval::Evaluator;

use crate::api::{Bindings, EngineOptions};
use crate::parser::Expr;
use crate::values::Value;

/// Default evaluation depth limit.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 128;

/// Evaluate `expr` once, without absorbing runtime faults.
pub fn eval(
    expr: &Expr,
    bindings: &Bindings,
    options: &EngineOptions,
) -> Result<Value, ExecutionError> {
    Evaluator::new(bindings, options.max_eval_depth)?.eval(expr)
}
