use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::Value;

/// Identifies an object that participates in host reactivity.
///
/// Reads of a property on an owned object are reported to
/// [`HostServices::track_dependency`](crate::api::HostServices::track_dependency)
/// together with this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// A mutable, insertion-ordered record.
///
/// The host may keep a handle and mutate it between evaluations; the
/// evaluator itself only reads.
#[derive(Default)]
pub struct Object {
    properties: RefCell<IndexMap<String, Value>>,
    owner: Option<OwnerId>,
}

pub type ObjectRef = Rc<Object>;

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            properties: RefCell::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.borrow().contains_key(key)
    }

    /// Insert or overwrite; returns the previous value.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.borrow_mut().insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.properties.borrow_mut().shift_remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.properties.borrow().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.properties
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }
}
