use std::fmt;
use std::rc::Rc;

use super::convert::{self, number_to_string};
use super::function::NativeFunction;
use super::object::{Object, ObjectRef, OwnerId};
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::security::{GuardedView, SecurityError};
use crate::stdlib;

/// A dynamic value. Cloning is cheap: compound values are reference
/// counted.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(ObjectRef),
    Function(Rc<NativeFunction>),
    /// Read-only view over a value returned from a call.
    Guarded(GuardedView),
}

// ============================================================================
// Construction
// ============================================================================

impl Value {
    pub fn object<K, I>(pairs: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Rc::new(Object::from_entries(pairs)))
    }

    /// An object whose reads are reported to the host's dependency tracker.
    pub fn reactive_object<K, I>(owner: OwnerId, pairs: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Rc::new(Object::from_entries(pairs).with_owner(owner)))
    }

    pub fn function(
        name: &'static str,
        func: impl Fn(&Value, &[Value]) -> Result<Value, ExecutionError> + 'static,
    ) -> Value {
        Value::Function(Rc::new(NativeFunction::new(name, func)))
    }

    pub fn string(s: impl AsRef<str>) -> Value {
        Value::String(Rc::from(s.as_ref()))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }
}

impl From<NativeFunction> for Value {
    fn from(function: NativeFunction) -> Self {
        Value::Function(Rc::new(function))
    }
}

// ============================================================================
// Inspection
// ============================================================================

impl Value {
    /// Strip any guarded views.
    pub fn unguarded(&self) -> &Value {
        match self {
            Value::Guarded(view) => view.target().unguarded(),
            other => other,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Guarded(_)
        )
    }

    pub fn is_guarded(&self) -> bool {
        matches!(self, Value::Guarded(_))
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Guarded(view) => view.target().type_of(),
        }
    }

    /// Reactive owner of the underlying object, if any.
    pub fn owner(&self) -> Option<OwnerId> {
        match self.unguarded() {
            Value::Object(object) => object.owner(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<NativeFunction>> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn to_number(&self) -> f64 {
        convert::to_number(self)
    }

    pub fn is_truthy(&self) -> bool {
        convert::is_truthy(self)
    }

    /// Same underlying allocation (for compound values) or same primitive.
    pub fn same_identity(&self, other: &Value) -> bool {
        match (self.unguarded(), other.unguarded()) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// Property access
// ============================================================================

impl Value {
    /// Read a property without consulting the name policy.
    ///
    /// Own data comes first (object entries, array and string indices,
    /// function statics), then the intrinsic members of the value's kind.
    /// Missing properties are `undefined`. Guarded views apply their own
    /// filtering and wrap what they return.
    pub fn get_property(&self, name: &str) -> Value {
        let own = match self {
            Value::Undefined | Value::Null => return Value::Undefined,
            Value::Guarded(view) => return view.get(name),
            Value::Object(object) => object.get(name),
            Value::Array(items) => parse_index(name).and_then(|i| items.get(i).cloned()),
            Value::String(s) => parse_index(name)
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::from(c.to_string())),
            Value::Function(function) => function.get_static(name),
            Value::Bool(_) | Value::Number(_) => None,
        };
        own.or_else(|| stdlib::intrinsic_member(self, name))
            .unwrap_or_default()
    }

    /// `name in self` for object-like values; primitives have no
    /// properties to probe.
    pub fn has_property(&self, name: &str) -> Result<bool, SecurityError> {
        Ok(match self {
            Value::Guarded(view) => return view.has(name),
            Value::Object(object) => object.contains_key(name),
            Value::Array(items) => {
                name == "length" || parse_index(name).is_some_and(|i| i < items.len())
            }
            Value::Function(function) => name == "name" || function.has_static(name),
            _ => false,
        })
    }

    /// Host-side write. Guarded views refuse every write.
    pub fn set_property(&self, name: &str, value: Value) -> Result<(), ExecutionError> {
        match self {
            Value::Object(object) => {
                object.insert(name, value);
                Ok(())
            }
            Value::Guarded(view) => view.set(name, value).map_err(Into::into),
            other => Err(RuntimeError::ReadOnlyTarget {
                name: name.to_string(),
                type_name: other.type_of(),
            }
            .into()),
        }
    }

    /// Own enumerable keys, in order.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(object) => object.keys(),
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            Value::String(s) => (0..s.chars().count()).map(|i| i.to_string()).collect(),
            Value::Guarded(view) => view.keys(),
            _ => Vec::new(),
        }
    }
}

/// Canonical array index: decimal digits without leading zeros.
fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

// ============================================================================
// Formatting and equality
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&number_to_string(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(function) => {
                write!(f, "function {}() {{ [native code] }}", function.name())
            }
            Value::Guarded(view) => write!(f, "{}", view.target()),
        }
    }
}

const DEBUG_DEPTH: usize = 6;

struct DebugValue<'a>(&'a Value, usize);

impl fmt::Debug for DebugValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, depth) = (self.0, self.1);
        if depth >= DEBUG_DEPTH && value.is_object_like() {
            return write!(f, "…");
        }
        match value {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => f
                .debug_list()
                .entries(items.iter().map(|item| DebugValue(item, depth + 1)))
                .finish(),
            Value::Object(object) => {
                let entries = object.entries();
                let mut map = f.debug_map();
                for (key, item) in &entries {
                    map.entry(key, &DebugValue(item, depth + 1));
                }
                map.finish()
            }
            Value::Function(function) => write!(f, "{function:?}"),
            Value::Guarded(view) => {
                write!(f, "Guarded(")?;
                DebugValue(view.target(), depth + 1).fmt(f)?;
                write!(f, ")")
            }
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DebugValue(self, 0).fmt(f)
    }
}

/// Structural equality, for host code and tests. The language's own `==`
/// and `===` live in the evaluator.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.same_identity(other) {
            return true;
        }
        match (self.unguarded(), other.unguarded()) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.entries() == b.entries(),
            _ => false,
        }
    }
}
