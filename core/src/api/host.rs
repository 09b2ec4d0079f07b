//! Hooks into the embedding application.

use crate::api::Diagnostic;
use crate::evaluator::ExecutionError;
use crate::values::{OwnerId, Value};

/// Services the host provides to the evaluator. Every method has a no-op
/// default, so a host implements only what it uses.
pub trait HostServices {
    /// A property of a reactive object was read.
    fn track_dependency(&self, _owner: OwnerId, _property: &str) {}

    /// Produce the value `$el` resolves to. The default exposes the
    /// element value unchanged.
    fn wrap_element(&self, element: &Value) -> Value {
        element.clone()
    }

    /// `$dispatch(name, payload)`.
    fn dispatch(&self, _name: &str, _payload: &Value) -> Result<(), ExecutionError> {
        Ok(())
    }

    /// `$nextTick(callback?)`.
    fn schedule_next_tick(&self, _callback: Option<Value>) {}

    /// A soft diagnostic (denied read, dropped key, absorbed runtime fault).
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Host that ignores every hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl HostServices for NoopHost {}
