//! Token-boundary heuristic for dangerous names.
//!
//! Catches spellings the exact denylists miss (`_constructor`, `$eval`,
//! `obj.constructor` as a computed key) without blocking ordinary names that
//! merely contain a root word (`constructor_id`, `proto_config`).

use crate::syntax::is_ident_continue;

/// Root words rejected when they appear as a delimited token.
pub const DANGEROUS_ROOTS: &[&str] = &[
    "constructor",
    "proto",
    "eval",
    "function",
    "import",
    "require",
    "process",
    "global",
];

/// Zero-width format characters stripped before matching.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Removes zero-width characters so `con\u{200D}structor` reads as
/// `constructor`.
pub fn normalize(name: &str) -> String {
    name.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

/// Returns true if `name` starts with `__` or contains a root word on a
/// token boundary.
pub fn matches_dangerous_pattern(name: &str) -> bool {
    let normalized = normalize(name);
    if normalized.starts_with("__") {
        return true;
    }
    DANGEROUS_ROOTS.iter().any(|root| {
        normalized
            .match_indices(root)
            .any(|(idx, _)| is_delimited(&normalized, idx, idx + root.len()))
    })
}

fn is_delimited(text: &str, start: usize, end: usize) -> bool {
    // Leading `_`/`$` padding is part of the boundary, not of a longer word.
    let before = text[..start].trim_end_matches(['_', '$']);
    let leading = before.chars().next_back().is_none_or(|c| !is_ident_continue(c));
    let trailing = text[end..].chars().next().is_none_or(|c| !is_ident_continue(c));
    leading && trailing
}
