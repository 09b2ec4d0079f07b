//! Name-level security policy.
//!
//! Two layers, both pure functions of a name:
//!
//! 1. Exact denylists ([`denylist`]), one for properties and a broader one
//!    for methods at call sites.
//! 2. A token-boundary pattern heuristic ([`pattern`]).
//!
//! Plain reads of a denied name degrade to `undefined` plus a diagnostic;
//! `in` probes and writes through a [`GuardedView`] fail with a
//! [`SecurityError`].

pub mod denylist;
mod error;
pub mod guarded;
pub mod pattern;

pub use denylist::{is_forbidden_method, is_forbidden_property};
pub use error::SecurityError;
pub use guarded::GuardedView;
pub use pattern::matches_dangerous_pattern;

/// Why a name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Exact property denylist.
    Property,
    /// Exact method denylist (call sites only).
    Method,
    /// Token-boundary heuristic.
    Pattern,
}

impl core::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DenyReason::Property => write!(f, "denylisted property"),
            DenyReason::Method => write!(f, "denylisted method"),
            DenyReason::Pattern => write!(f, "dangerous name pattern"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenyReason),
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allowed)
    }
}

/// Policy for member reads, identifiers, object keys and `in` probes.
pub fn check_property(name: &str) -> Access {
    if is_forbidden_property(name) {
        Access::Denied(DenyReason::Property)
    } else if matches_dangerous_pattern(name) {
        Access::Denied(DenyReason::Pattern)
    } else {
        Access::Allowed
    }
}

/// Policy for the method name at a call site.
pub fn check_method(name: &str) -> Access {
    if is_forbidden_method(name) {
        Access::Denied(DenyReason::Method)
    } else if matches_dangerous_pattern(name) {
        Access::Denied(DenyReason::Pattern)
    } else {
        Access::Allowed
    }
}

/// Names that may never be stored as a key, regardless of context.
pub fn is_structurally_dangerous(name: &str) -> bool {
    matches!(name, "__proto__" | "constructor" | "prototype") || name.starts_with("__")
}

#[cfg(test)]
mod policy_test;
