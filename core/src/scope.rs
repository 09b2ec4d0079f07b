//! Parent-linked key/value scopes.
//!
//! Template hosts nest scopes (a loop body inside a component inside a
//! page). Two representations share one [`Scope`] contract:
//!
//! - [`ChainedScope`]: a node with its own map and a shared parent link.
//!   Writes land locally, reads fall through to the parent.
//! - [`FlatScope`]: the visible entries of a chain copied into one map.
//!   It has no parent, so a miss goes straight to the evaluator's
//!   state/global fallback.
//!
//! Neither representation will ever hold a structurally dangerous key
//! (`__proto__`, `constructor`, `prototype`, any `__` prefix).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::security::{SecurityError, is_structurally_dangerous};
use crate::values::Value;

pub type ScopeRef = Rc<dyn Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeKind {
    #[default]
    Chained,
    Flat,
}

/// Capability contract shared by both scope representations.
pub trait Scope: fmt::Debug {
    /// Look up `name` in this node only.
    fn lookup_local(&self, name: &str) -> Option<Value>;

    fn has_local(&self, name: &str) -> bool {
        self.lookup_local(name).is_some()
    }

    /// Bind `name` in this node. Fails for structurally dangerous names.
    fn set(&self, name: &str, value: Value) -> Result<(), SecurityError>;

    /// Remove `name` from this node only. Returns whether it was present.
    fn delete(&self, name: &str) -> bool;

    /// Names bound in this node, in insertion order.
    fn local_keys(&self) -> Vec<String>;

    fn parent(&self) -> Option<ScopeRef>;

    fn kind(&self) -> ScopeKind;

    fn local_entries(&self) -> Vec<(String, Value)> {
        self.local_keys()
            .into_iter()
            .filter_map(|key| self.lookup_local(&key).map(|value| (key, value)))
            .collect()
    }

    /// Look up `name` here, then along the parent chain.
    fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.lookup_local(name) {
            return Some(value);
        }
        let mut current = self.parent();
        while let Some(scope) = current {
            if let Some(value) = scope.lookup_local(name) {
                return Some(value);
            }
            current = scope.parent();
        }
        None
    }

    fn has(&self, name: &str) -> bool {
        if self.has_local(name) {
            return true;
        }
        let mut current = self.parent();
        while let Some(scope) = current {
            if scope.has_local(name) {
                return true;
            }
            current = scope.parent();
        }
        false
    }

    /// Every visible name once, innermost first.
    fn keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys: Vec<String> = self
            .local_keys()
            .into_iter()
            .filter(|key| seen.insert(key.clone()))
            .collect();
        let mut current = self.parent();
        while let Some(scope) = current {
            keys.extend(
                scope
                    .local_keys()
                    .into_iter()
                    .filter(|key| seen.insert(key.clone())),
            );
            current = scope.parent();
        }
        keys
    }
}

/// Build a scope of the requested kind.
pub fn new_scope<K, I>(kind: ScopeKind, parent: Option<ScopeRef>, entries: I) -> ScopeRef
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    match kind {
        ScopeKind::Chained => Rc::new(ChainedScope::from_entries(parent, entries)),
        ScopeKind::Flat => match parent {
            Some(parent) => Rc::new(FlatScope::collapse(parent.as_ref(), entries)),
            None => Rc::new(FlatScope::from_entries(entries)),
        },
    }
}

/// Keep only the keys that may be stored; report the rest.
fn safe_entries<K, I>(entries: I) -> IndexMap<String, Value>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .filter(|(key, _)| {
            let dangerous = is_structurally_dangerous(key);
            if dangerous {
                tracing::warn!(key = key.as_str(), "dropping dangerous scope key");
            }
            !dangerous
        })
        .collect()
}

fn checked_insert(
    vars: &RefCell<IndexMap<String, Value>>,
    name: &str,
    value: Value,
) -> Result<(), SecurityError> {
    if is_structurally_dangerous(name) {
        return Err(SecurityError::ForbiddenScopeKey {
            name: name.to_string(),
        });
    }
    vars.borrow_mut().insert(name.to_string(), value);
    Ok(())
}

// ============================================================================
// Chained
// ============================================================================

#[derive(Default)]
pub struct ChainedScope {
    vars: RefCell<IndexMap<String, Value>>,
    parent: Option<ScopeRef>,
}

impl ChainedScope {
    pub fn new(parent: Option<ScopeRef>) -> Self {
        Self {
            vars: RefCell::default(),
            parent,
        }
    }

    pub fn from_entries<K, I>(parent: Option<ScopeRef>, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            vars: RefCell::new(safe_entries(entries)),
            parent,
        }
    }
}

impl Scope for ChainedScope {
    fn lookup_local(&self, name: &str) -> Option<Value> {
        self.vars.borrow().get(name).cloned()
    }

    fn has_local(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
    }

    fn set(&self, name: &str, value: Value) -> Result<(), SecurityError> {
        checked_insert(&self.vars, name, value)
    }

    fn delete(&self, name: &str) -> bool {
        self.vars.borrow_mut().shift_remove(name).is_some()
    }

    fn local_keys(&self) -> Vec<String> {
        self.vars.borrow().keys().cloned().collect()
    }

    fn parent(&self) -> Option<ScopeRef> {
        self.parent.clone()
    }

    fn kind(&self) -> ScopeKind {
        ScopeKind::Chained
    }
}

impl fmt::Debug for ChainedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedScope")
            .field("keys", &self.local_keys())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

// ============================================================================
// Flat
// ============================================================================

#[derive(Default)]
pub struct FlatScope {
    vars: RefCell<IndexMap<String, Value>>,
}

impl FlatScope {
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            vars: RefCell::new(safe_entries(entries)),
        }
    }

    /// Copy everything visible from `scope` (inner entries shadowing outer
    /// ones), then add `entries` on top.
    pub fn collapse<K, I>(scope: &dyn Scope, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut chain = vec![scope.local_entries()];
        let mut current = scope.parent();
        while let Some(node) = current {
            chain.push(node.local_entries());
            current = node.parent();
        }

        let mut vars = IndexMap::new();
        for (key, value) in chain.into_iter().rev().flatten() {
            vars.insert(key, value);
        }
        vars.extend(safe_entries(entries));
        Self {
            vars: RefCell::new(vars),
        }
    }
}

impl Scope for FlatScope {
    fn lookup_local(&self, name: &str) -> Option<Value> {
        self.vars.borrow().get(name).cloned()
    }

    fn has_local(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
    }

    fn set(&self, name: &str, value: Value) -> Result<(), SecurityError> {
        checked_insert(&self.vars, name, value)
    }

    fn delete(&self, name: &str) -> bool {
        self.vars.borrow_mut().shift_remove(name).is_some()
    }

    fn local_keys(&self) -> Vec<String> {
        self.vars.borrow().keys().cloned().collect()
    }

    fn parent(&self) -> Option<ScopeRef> {
        None
    }

    fn kind(&self) -> ScopeKind {
        ScopeKind::Flat
    }
}

impl fmt::Debug for FlatScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatScope")
            .field("keys", &self.local_keys())
            .finish()
    }
}
