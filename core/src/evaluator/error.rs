//! Runtime evaluation errors.
//!
//! # Error Categories
//!
//! - **Runtime errors**: faults raised while computing a value (a native
//!   function rejecting its arguments, malformed JSON, a cyclic value). The
//!   compiled-unit boundary absorbs these: they are logged, reported to the
//!   host and the expression evaluates to `undefined`.
//!
//! - **Security errors**: policy violations and resource limits. These are
//!   never absorbed.

use thiserror::Error;

use crate::security::SecurityError;

/// Runtime faults that the compiled-unit boundary may absorb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("cannot set property '{name}' on a {type_name}")]
    ReadOnlyTarget {
        name: String,
        type_name: &'static str,
    },

    #[error("{function}: {message}")]
    Native { function: String, message: String },

    #[error("JSON error: {message}")]
    Json { message: String },

    #[error("value is cyclic or nested too deeply to serialize")]
    CyclicValue,

    #[error("host error: {message}")]
    Host { message: String },
}

impl RuntimeError {
    /// Convenience for native functions rejecting their input.
    pub fn native(function: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::Native {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// Evaluation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Security(#[from] SecurityError),
}

impl ExecutionError {
    pub fn is_security(&self) -> bool {
        matches!(self, ExecutionError::Security(_))
    }
}
