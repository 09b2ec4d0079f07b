//! Compiled expressions.

use std::fmt;
use std::sync::Arc;

use super::{Bindings, Diagnostic, EngineOptions, Severity};
use crate::evaluator::{ExecutionError, eval};
use crate::parser::Expr;
use crate::security::SecurityError;
use crate::values::Value;

/// A parsed expression ready for evaluation.
///
/// The tree is immutable and shared, so cloning is cheap and the same unit
/// can be evaluated any number of times against different bindings.
///
/// # Evaluation Tiers
///
/// - **`evaluate()`**: runtime faults are logged, reported to the host and
///   read as `undefined`. Security faults propagate.
/// - **`run()`**: every fault propagates.
///
/// # Example
///
/// ```
/// use warded_core::api::{Bindings, Engine};
/// use warded_core::values::Value;
///
/// let expr = Engine::default().compile("JSON.parse(text).ok").unwrap();
///
/// let good = Bindings::new(Value::object([("text", Value::from("{\"ok\":true}"))]));
/// assert_eq!(expr.evaluate(&good).unwrap(), Value::from(true));
///
/// // Malformed JSON is a runtime fault: absorbed by `evaluate`, raised by `run`.
/// let bad = Bindings::new(Value::object([("text", Value::from("{"))]));
/// assert_eq!(expr.evaluate(&bad).unwrap(), Value::Undefined);
/// assert!(expr.run(&bad).is_err());
/// ```
#[derive(Clone)]
pub struct CompiledExpression {
    source: Arc<str>,
    expr: Arc<Expr>,
    options: EngineOptions,
}

impl CompiledExpression {
    pub(crate) fn new(source: Arc<str>, expr: Arc<Expr>, options: EngineOptions) -> Self {
        Self {
            source,
            expr,
            options,
        }
    }

    /// The source text this unit was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate without absorbing runtime faults.
    pub fn run(&self, bindings: &Bindings) -> Result<Value, ExecutionError> {
        eval(&self.expr, bindings, &self.options)
    }

    /// Evaluate, reading runtime faults as `undefined`.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Value, SecurityError> {
        match self.run(bindings) {
            Ok(value) => Ok(value),
            Err(ExecutionError::Security(err)) => {
                tracing::debug!(source = &*self.source, "security fault: {err}");
                Err(err)
            }
            Err(ExecutionError::Runtime(err)) => {
                tracing::warn!(source = &*self.source, "expression failed: {err}");
                bindings.host.report(&Diagnostic {
                    severity: Severity::Warning,
                    message: format!("expression '{}' failed: {err}", self.source),
                    span: None,
                    help: None,
                    code: Some("R001".to_string()),
                });
                Ok(Value::Undefined)
            }
        }
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .field("expr", &self.expr)
            .finish()
    }
}
