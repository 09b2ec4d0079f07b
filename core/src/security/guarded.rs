//! Read-only views over values handed back from calls.
//!
//! A host function may return one of its own objects. Wrapping it keeps the
//! expression from writing into it and from reading denied names off it.
//! Wrapping is lazy: nested values are wrapped only when a read traverses
//! them, so wrapping a large structure costs one allocation.

use std::fmt;
use std::rc::Rc;

use super::{SecurityError, check_property};
use crate::values::Value;

#[derive(Clone)]
pub struct GuardedView {
    target: Rc<Value>,
}

impl GuardedView {
    /// Wrap object-like values; primitives and existing views pass through.
    pub fn wrap(value: Value) -> Value {
        match value {
            Value::Object(_) | Value::Array(_) | Value::Function(_) => {
                Value::Guarded(GuardedView {
                    target: Rc::new(value),
                })
            }
            other => other,
        }
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    pub fn get(&self, name: &str) -> Value {
        if let Some(reason) = denied(name) {
            tracing::warn!(name, %reason, "read of denied name through a guarded view");
            return Value::Undefined;
        }
        Self::wrap(self.target.get_property(name))
    }

    /// Probing a denied name is an error, not `false`, so the answer can
    /// never be used to tell which denied names exist.
    pub fn has(&self, name: &str) -> Result<bool, SecurityError> {
        if denied(name).is_some() {
            return Err(SecurityError::ForbiddenProbe {
                name: name.to_string(),
            });
        }
        self.target.has_property(name)
    }

    pub fn set(&self, name: &str, _value: Value) -> Result<(), SecurityError> {
        tracing::warn!(name, "write through a guarded view");
        Err(SecurityError::GuardedWrite {
            name: name.to_string(),
        })
    }

    pub fn delete(&self, name: &str) -> Result<(), SecurityError> {
        tracing::warn!(name, "delete through a guarded view");
        Err(SecurityError::GuardedWrite {
            name: name.to_string(),
        })
    }

    /// Keys of the target that the policy allows.
    pub fn keys(&self) -> Vec<String> {
        self.target
            .keys()
            .into_iter()
            .filter(|key| denied(key).is_none())
            .collect()
    }

    /// True if both views wrap the same allocation.
    pub fn ptr_eq(&self, other: &GuardedView) -> bool {
        Rc::ptr_eq(&self.target, &other.target) || self.target.same_identity(&other.target)
    }
}

fn denied(name: &str) -> Option<super::DenyReason> {
    match check_property(name) {
        super::Access::Allowed => None,
        super::Access::Denied(reason) => Some(reason),
    }
}

impl fmt::Debug for GuardedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GuardedView").field(&self.target).finish()
    }
}
