use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;
use crate::security::SecurityError;

/// Parser error with the byte span of the offending text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: String },

    #[error("unclosed delimiter '{delimiter}'")]
    UnclosedDelimiter { delimiter: char },

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("empty expression")]
    EmptyExpression,

    #[error("expression is {len} bytes long, the limit is {max_len}")]
    SourceTooLong { len: usize, max_len: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Stable diagnostic code for this error kind.
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } => "P001",
            ParseErrorKind::UnexpectedEnd { .. } => "P002",
            ParseErrorKind::UnclosedDelimiter { .. } => "P003",
            ParseErrorKind::UnterminatedString => "P004",
            ParseErrorKind::InvalidNumber { .. } => "P005",
            ParseErrorKind::EmptyExpression => "P006",
            ParseErrorKind::SourceTooLong { .. } => "P007",
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let help = match &self.kind {
            ParseErrorKind::UnclosedDelimiter { .. } => {
                Some("Add the missing closing delimiter".to_string())
            }
            ParseErrorKind::UnterminatedString => {
                Some("Close the string with the same quote it starts with".to_string())
            }
            ParseErrorKind::SourceTooLong { .. } => {
                Some("Move the logic into a function bound in state".to_string())
            }
            _ => None,
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: Some(self.span.clone()),
            help,
            code: Some(self.code().to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} at {}..{} [{}]",
            self.kind,
            self.span.0.start,
            self.span.0.end,
            self.code()
        )
    }
}

impl std::error::Error for ParseError {}

/// Everything that can go wrong while turning source text into an AST.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Security(#[from] SecurityError),
}

impl CompileError {
    pub fn span(&self) -> Option<&Span> {
        match self {
            CompileError::Syntax(err) => Some(&err.span),
            CompileError::Security(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Syntax(err) => err.to_diagnostic(),
            CompileError::Security(err) => err.to_diagnostic(),
        }
    }
}
