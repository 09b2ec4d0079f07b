//! Tests for the value model: display, property access and host writes.

use crate::evaluator::{ExecutionError, RuntimeError};
use crate::security::{GuardedView, SecurityError};
use crate::values::{NativeFunction, Object, OwnerId, Value};

#[test]
fn test_display_primitives() {
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::from(42).to_string(), "42");
    assert_eq!(Value::from(3.14).to_string(), "3.14");
    assert_eq!(Value::from("hi").to_string(), "hi");
}

#[test]
fn test_display_compound() {
    let array = Value::from(vec![
        Value::from(1),
        Value::Null,
        Value::from("x"),
        Value::Undefined,
    ]);
    assert_eq!(array.to_string(), "1,,x,");
    assert_eq!(
        Value::from(vec![Value::from(vec![Value::from(1), Value::from(2)]), Value::from(3)])
            .to_string(),
        "1,2,3"
    );
    assert_eq!(Value::object::<&str, _>([]).to_string(), "[object Object]");
    assert_eq!(
        Value::function("greet", |_, _| Ok(Value::Undefined)).to_string(),
        "function greet() { [native code] }"
    );
}

#[test]
fn test_type_of() {
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::from(vec![]).type_of(), "object");
    assert_eq!(Value::from(1).type_of(), "number");
    assert_eq!(
        GuardedView::wrap(Value::function("f", |_, _| Ok(Value::Undefined))).type_of(),
        "function"
    );
}

#[test]
fn test_array_and_string_indices() {
    let array = Value::from(vec![Value::from("a"), Value::from("b")]);
    assert_eq!(array.get_property("1"), Value::from("b"));
    assert_eq!(array.get_property("2"), Value::Undefined);
    assert_eq!(array.get_property("01"), Value::Undefined);
    assert_eq!(array.get_property("length"), Value::from(2));

    let s = Value::from("héllo");
    assert_eq!(s.get_property("1"), Value::from("é"));
    assert_eq!(s.get_property("length"), Value::from(5));
}

#[test]
fn test_nullish_has_no_properties() {
    assert_eq!(Value::Undefined.get_property("a"), Value::Undefined);
    assert_eq!(Value::Null.get_property("length"), Value::Undefined);
}

#[test]
fn test_function_statics() {
    let f = Value::from(
        NativeFunction::new("f", |_, _| Ok(Value::Undefined)).with_static("answer", Value::from(42)),
    );
    assert_eq!(f.get_property("answer"), Value::from(42));
    assert_eq!(f.get_property("name"), Value::from("f"));
    assert_eq!(f.has_property("answer"), Ok(true));
}

#[test]
fn test_static_names_keep_insertion_order() {
    let f = NativeFunction::new("f", |_, _| Ok(Value::Undefined))
        .with_static("zeta", Value::from(1))
        .with_static("alpha", Value::from(2));
    assert_eq!(f.static_names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    assert_eq!(
        NativeFunction::new("g", |_, _| Ok(Value::Undefined)).static_names().count(),
        0
    );
}

#[test]
fn test_has_property() {
    let object = Value::object([("a", Value::Undefined)]);
    assert_eq!(object.has_property("a"), Ok(true));
    assert_eq!(object.has_property("b"), Ok(false));
    assert_eq!(Value::from("abc").has_property("length"), Ok(false));
    assert_eq!(
        Value::from(vec![Value::from(1)]).has_property("0"),
        Ok(true)
    );
}

#[test]
fn test_host_writes() {
    let object = Value::object([("a", Value::from(1))]);
    object.set_property("b", Value::from(2)).unwrap();
    assert_eq!(object.keys(), vec!["a", "b"]);

    assert!(matches!(
        Value::from(1).set_property("a", Value::Null),
        Err(ExecutionError::Runtime(RuntimeError::ReadOnlyTarget { .. }))
    ));
}

#[test]
fn test_host_removal_keeps_remaining_order() {
    let object = Object::from_entries([
        ("a", Value::from(1)),
        ("b", Value::from(2)),
        ("c", Value::from(3)),
    ]);
    assert_eq!(object.remove("b"), Some(Value::from(2)));
    assert_eq!(object.remove("b"), None);
    assert_eq!(object.keys(), vec!["a", "c"]);

    let value = Value::from(object);
    assert_eq!(value.get_property("b"), Value::Undefined);
    assert_eq!(value.has_property("b"), Ok(false));
}

#[test]
fn test_writes_through_views_are_security_faults() {
    let view = GuardedView::wrap(Value::object([("a", Value::from(1))]));
    assert_eq!(
        view.set_property("a", Value::from(2)),
        Err(ExecutionError::Security(SecurityError::GuardedWrite {
            name: "a".into()
        }))
    );
    assert_eq!(view.get_property("a"), Value::from(1));
}

#[test]
fn test_reactive_owner() {
    let owner = OwnerId(7);
    let object = Value::reactive_object(owner, [("a", Value::from(1))]);
    assert_eq!(object.owner(), Some(owner));
    assert_eq!(GuardedView::wrap(object).owner(), Some(owner));
    assert_eq!(Value::object([("a", Value::from(1))]).owner(), None);
}

#[test]
fn test_structural_equality() {
    let a = Value::object([("x", Value::from(vec![Value::from(1)]))]);
    let b = Value::object([("x", Value::from(vec![Value::from(1)]))]);
    assert_eq!(a, b);
    assert!(!a.same_identity(&b));
    assert_eq!(GuardedView::wrap(a.clone()), a);
    assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
}

#[test]
fn test_debug_stops_at_cycles() {
    let object = Object::new();
    let value = Value::from(object);
    value.set_property("me", value.clone()).unwrap();
    let rendered = format!("{value:?}");
    assert!(rendered.contains('…'));
}
