//! Configuration options for the engine.

use crate::evaluator::DEFAULT_MAX_EVAL_DEPTH;
use crate::parser::DEFAULT_MAX_DEPTH;

/// Resource limits applied to every compilation and evaluation.
///
/// # Example
///
/// ```
/// use warded_core::api::EngineOptions;
///
/// let options = EngineOptions {
///     max_parse_depth: 20,
///     ..EngineOptions::default()
/// };
/// assert_eq!(options.max_eval_depth, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum nesting of parentheses, brackets, branches and unary
    /// prefixes accepted by the parser.
    ///
    /// Default: 50
    pub max_parse_depth: usize,

    /// Maximum evaluation recursion depth.
    ///
    /// Default: 128
    pub max_eval_depth: usize,

    /// Longest source text accepted, in bytes.
    ///
    /// Default: 16 KiB
    pub max_source_len: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_parse_depth: DEFAULT_MAX_DEPTH,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
            max_source_len: 16 * 1024,
        }
    }
}
