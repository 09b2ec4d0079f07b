//! Identifier character classes.
//!
//! Start characters: ASCII letters, `_`, `$`, or any `XID_Start` codepoint.
//! Continuation characters are `XID_Continue` plus `$` and the zero-width
//! joiner/non-joiner, which joiner-using scripts (Devanagari, Persian, ...)
//! need inside a single word.

use unicode_ident::{is_xid_continue, is_xid_start};

/// Zero-width non-joiner (U+200C).
pub const ZWNJ: char = '\u{200C}';

/// Zero-width joiner (U+200D).
pub const ZWJ: char = '\u{200D}';

/// Returns true if `c` may start an identifier.
pub fn is_ident_start(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphabetic() || c == '_' || c == '$'
    } else {
        is_xid_start(c)
    }
}

/// Returns true if `c` may continue an identifier.
pub fn is_ident_continue(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || c == '_' || c == '$'
    } else {
        is_xid_continue(c) || c == ZWNJ || c == ZWJ
    }
}
