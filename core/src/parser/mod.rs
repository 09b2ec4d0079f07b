mod parsed_expr;
#[allow(clippy::module_inception)]
pub mod parser;
mod syntax;
pub mod error;

pub use parser::{DEFAULT_MAX_DEPTH, Parser, parse, parse_with_options};

pub use error::{CompileError, ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, Literal, ObjectEntry, Property, PropertyKey};
pub use syntax::{BinaryOp, Span, UnaryOp};


#[cfg(test)]
mod parse_test;
