use thiserror::Error;

use crate::api::{Diagnostic, Severity};

/// Hard security faults.
///
/// Unlike runtime faults these are never absorbed at the compiled-unit
/// boundary: they always reach the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("expression nesting depth {depth} exceeds the maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("evaluation depth exceeds the maximum of {max_depth}")]
    EvalDepthExceeded { max_depth: usize },

    #[error("probing forbidden property '{name}' is not allowed")]
    ForbiddenProbe { name: String },

    #[error("scope binding must be a scope or an empty object, found {found}")]
    BindingContract { found: String },

    #[error("cannot write '{name}' through a read-only view")]
    GuardedWrite { name: String },

    #[error("'{name}' cannot be stored in a scope")]
    ForbiddenScopeKey { name: String },
}

impl SecurityError {
    pub fn code(&self) -> &'static str {
        match self {
            SecurityError::DepthExceeded { .. } => "X001",
            SecurityError::EvalDepthExceeded { .. } => "X002",
            SecurityError::ForbiddenProbe { .. } => "X003",
            SecurityError::BindingContract { .. } => "X004",
            SecurityError::GuardedWrite { .. } => "X005",
            SecurityError::ForbiddenScopeKey { .. } => "X006",
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let help = match self {
            SecurityError::DepthExceeded { .. } | SecurityError::EvalDepthExceeded { .. } => {
                Some("Reduce nesting or simplify the expression".to_string())
            }
            _ => None,
        };
        Diagnostic {
            severity: Severity::Error,
            message: self.to_string(),
            span: None,
            help,
            code: Some(self.code().to_string()),
        }
    }
}
