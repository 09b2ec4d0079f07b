//! Lexical building blocks shared by the parser and the security policy.
//!
//! The identifier classes live here rather than in the parser because the
//! pattern heuristic in [`crate::security`] must agree with the parser on
//! what counts as an identifier boundary.

pub mod ident;
pub mod string_literal;

pub use ident::{ZWJ, ZWNJ, is_ident_continue, is_ident_start};
pub use string_literal::{QuoteStyle, StringScanError, escape_string, scan_string_literal};
