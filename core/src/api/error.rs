//! Public error types for the warded API.
//!
//! Each stage has its own error type ([`CompileError`] from parsing,
//! [`ExecutionError`] from evaluation). [`Error`] joins them for the one-shot
//! [`evaluate`](crate::api::evaluate) helper. Soft outcomes are not errors at
//! all: they surface as [`Diagnostic`]s through
//! [`HostServices::report`](crate::api::HostServices::report).

use std::fmt;

use thiserror::Error;

use crate::evaluator::{ExecutionError, RuntimeError};
use crate::parser::{CompileError, ParseError, Span};
use crate::security::SecurityError;

/// Umbrella error for operations that both compile and evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source text is not a valid expression.
    #[error("syntax error: {0}")]
    Syntax(ParseError),

    /// Policy violations and resource limits. Never absorbed.
    #[error("security error: {0}")]
    Security(SecurityError),

    /// Runtime faults (only from APIs that do not absorb them).
    #[error("runtime error: {0}")]
    Runtime(RuntimeError),
}

impl Error {
    pub fn is_security(&self) -> bool {
        matches!(self, Error::Security(_))
    }

    pub fn span(&self) -> Option<&Span> {
        match self {
            Error::Syntax(err) => Some(&err.span),
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Syntax(err) => err.to_diagnostic(),
            Error::Security(err) => err.to_diagnostic(),
            Error::Runtime(err) => Diagnostic {
                severity: Severity::Error,
                message: err.to_string(),
                span: None,
                help: None,
                code: Some("R001".to_string()),
            },
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Syntax(err) => Error::Syntax(err),
            CompileError::Security(err) => Error::Security(err),
        }
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Runtime(err) => Error::Runtime(err),
            ExecutionError::Security(err) => Error::Security(err),
        }
    }
}

impl From<SecurityError> for Error {
    fn from(err: SecurityError) -> Self {
        Error::Security(err)
    }
}

/// A diagnostic message (error, warning, or info) with optional source
/// location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue, when known. Evaluation-time
    /// diagnostics carry none.
    pub span: Option<Span>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Stable code: `P0xx` parse, `S0xx` soft security, `X0xx` hard
    /// security, `R0xx` runtime.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the operation failed.
    Error,
    /// Warning - something was denied or dropped, evaluation continued.
    Warning,
    /// Info - informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\nhelp: {help}")?;
        }
        Ok(())
    }
}
