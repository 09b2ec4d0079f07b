//! The compilation engine.

use std::sync::Arc;

use super::{Bindings, CompiledExpression, EngineOptions, Error};
use crate::parser::{self, CompileError};
use crate::values::Value;

/// Compiles expression text into reusable [`CompiledExpression`]s.
///
/// The engine itself holds no evaluation state: bindings are supplied per
/// evaluation and the safe globals are shared, immutable data.
///
/// # Example
///
/// ```
/// use warded_core::api::{Bindings, Engine, EngineOptions};
/// use warded_core::values::Value;
///
/// let engine = Engine::new(EngineOptions::default());
/// let expr = engine.compile("Math.max(a, 10)").unwrap();
///
/// let bindings = Bindings::new(Value::object([("a", Value::from(42))]));
/// assert_eq!(expr.evaluate(&bindings).unwrap(), Value::from(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Parse `source` into a compiled unit.
    ///
    /// Fails with a syntax error, or with a security error when the
    /// nesting ceiling is exceeded.
    pub fn compile(&self, source: &str) -> Result<CompiledExpression, CompileError> {
        tracing::debug!(len = source.len(), "compiling expression");
        let expr = parser::parse_with_options(source, &self.options)?;
        Ok(CompiledExpression::new(
            Arc::from(source),
            Arc::new(expr),
            self.options.clone(),
        ))
    }

    /// Compile and evaluate in one step, absorbing runtime faults.
    pub fn evaluate(&self, source: &str, bindings: &Bindings) -> Result<Value, Error> {
        let expr = self.compile(source)?;
        Ok(expr.evaluate(bindings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseErrorKind;
    use crate::security::SecurityError;

    #[test]
    fn test_compile_reports_syntax_errors() {
        let engine = Engine::default();
        let err = engine.compile("1 +").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Syntax(ref e) if matches!(e.kind, ParseErrorKind::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_compile_honors_depth_option() {
        let engine = Engine::new(EngineOptions {
            max_parse_depth: 3,
            ..EngineOptions::default()
        });
        assert!(engine.compile("((1))").is_ok());
        assert_eq!(
            engine.compile("((((1))))").unwrap_err(),
            CompileError::Security(SecurityError::DepthExceeded {
                depth: 4,
                max_depth: 3
            })
        );
    }

    #[test]
    fn test_compile_honors_length_option() {
        let engine = Engine::new(EngineOptions {
            max_source_len: 4,
            ..EngineOptions::default()
        });
        assert!(engine.compile("1+2").is_ok());
        assert!(matches!(
            engine.compile("1 + 2"),
            Err(CompileError::Syntax(_))
        ));
    }

    #[test]
    fn test_engine_evaluate() {
        let engine = Engine::default();
        let bindings = Bindings::new(Value::object([("n", Value::from(2))]));
        assert_eq!(engine.evaluate("n * 21", &bindings), Ok(Value::from(42)));
        assert!(matches!(
            engine.evaluate("n +", &bindings),
            Err(Error::Syntax(_))
        ));
    }
}
