//! Per-evaluation inputs.

use std::fmt;
use std::rc::Rc;

use crate::api::{HostServices, NoopHost};
use crate::scope::ScopeRef;
use crate::values::Value;

/// The scope part of the bindings.
#[derive(Clone)]
pub enum ScopeBinding {
    /// A scope chain, walked by the evaluator.
    Scope(ScopeRef),
    /// A plain value standing in for "no scope". Only `undefined`, `null`
    /// and an empty object are accepted at evaluation time.
    Plain(Value),
}

/// Everything one evaluation may read. Supplied fresh on every call and
/// never cached in the compiled unit.
///
/// # Example
///
/// ```
/// use warded_core::api::Bindings;
/// use warded_core::scope::{ScopeKind, new_scope};
/// use warded_core::values::Value;
///
/// let scope = new_scope(ScopeKind::Chained, None, [("item", Value::from(3))]);
/// let bindings = Bindings::new(Value::object([("count", Value::from(1))]))
///     .with_scope(scope)
///     .with_event(Value::from("click"));
/// assert!(bindings.event.is_some());
/// ```
#[derive(Clone)]
pub struct Bindings {
    pub state: Value,
    pub scope: Option<ScopeBinding>,
    pub event: Option<Value>,
    pub element: Option<Value>,
    pub refs: Option<Value>,
    pub host: Rc<dyn HostServices>,
}

impl Bindings {
    pub fn new(state: Value) -> Self {
        Self {
            state,
            scope: None,
            event: None,
            element: None,
            refs: None,
            host: Rc::new(NoopHost),
        }
    }

    pub fn with_scope(mut self, scope: ScopeRef) -> Self {
        self.scope = Some(ScopeBinding::Scope(scope));
        self
    }

    pub fn with_plain_scope(mut self, value: Value) -> Self {
        self.scope = Some(ScopeBinding::Plain(value));
        self
    }

    pub fn with_event(mut self, event: Value) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_element(mut self, element: Value) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_refs(mut self, refs: Value) -> Self {
        self.refs = Some(refs);
        self
    }

    pub fn with_host(mut self, host: Rc<dyn HostServices>) -> Self {
        self.host = host;
        self
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new(Value::Undefined)
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("state", &self.state)
            .field("has_scope", &self.scope.is_some())
            .field("event", &self.event)
            .field("element", &self.element)
            .field("refs", &self.refs)
            .finish_non_exhaustive()
    }
}
