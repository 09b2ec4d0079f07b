use crate::security::{
    Access, DenyReason, GuardedView, SecurityError, check_method, check_property,
    denylist::FORBIDDEN_PROPERTIES, is_structurally_dangerous, pattern::DANGEROUS_ROOTS,
};
use crate::values::{NativeFunction, Value};

fn guarded(value: Value) -> GuardedView {
    match GuardedView::wrap(value) {
        Value::Guarded(view) => view,
        other => panic!("expected a guarded view, got {other:?}"),
    }
}

// ============================================================================
// Name policy
// ============================================================================

#[test]
fn test_every_denylisted_property_is_denied() {
    for name in FORBIDDEN_PROPERTIES.iter() {
        assert!(!check_property(name).is_allowed(), "{name}");
        assert!(!check_method(name).is_allowed(), "{name}");
    }
}

#[test]
fn test_every_root_word_is_denied() {
    for root in DANGEROUS_ROOTS {
        assert!(!check_property(root).is_allowed(), "{root}");
    }
}

#[test]
fn test_deny_reasons() {
    assert_eq!(
        check_property("constructor"),
        Access::Denied(DenyReason::Property)
    );
    assert_eq!(
        check_property("_constructor"),
        Access::Denied(DenyReason::Pattern)
    );
    assert_eq!(check_method("bind"), Access::Denied(DenyReason::Method));
    assert_eq!(check_property("bind"), Access::Allowed);
}

#[test]
fn test_ordinary_names_are_allowed() {
    for name in [
        "constructor_id",
        "proto_config",
        "name",
        "items",
        "length",
        "toUpperCase",
        "evaluate",
    ] {
        assert_eq!(check_property(name), Access::Allowed, "{name}");
        assert_eq!(check_method(name), Access::Allowed, "{name}");
    }
}

#[test]
fn test_structurally_dangerous() {
    assert!(is_structurally_dangerous("__proto__"));
    assert!(is_structurally_dangerous("constructor"));
    assert!(is_structurally_dangerous("prototype"));
    assert!(is_structurally_dangerous("__anything"));
    assert!(!is_structurally_dangerous("_private"));
    assert!(!is_structurally_dangerous("window"));
}

// ============================================================================
// Guarded views
// ============================================================================

#[test]
fn test_wrap_leaves_primitives_alone() {
    assert_eq!(GuardedView::wrap(Value::from(1)), Value::from(1));
    assert!(!GuardedView::wrap(Value::from("s")).is_guarded());
    assert!(!GuardedView::wrap(Value::Null).is_guarded());
    assert!(GuardedView::wrap(Value::from(vec![])).is_guarded());
}

#[test]
fn test_reads_pass_through() {
    let view = guarded(Value::object([("a", Value::from(1))]));
    assert_eq!(view.get("a"), Value::from(1));
    assert_eq!(view.get("missing"), Value::Undefined);
}

#[test]
fn test_denied_reads_are_absent() {
    let view = guarded(Value::object([
        ("constructor", Value::from("leak")),
        ("__proto__", Value::from("leak")),
        ("ok", Value::from(true)),
    ]));
    assert_eq!(view.get("constructor"), Value::Undefined);
    assert_eq!(view.get("__proto__"), Value::Undefined);
    assert_eq!(view.keys(), vec!["ok".to_string()]);
}

#[test]
fn test_nested_values_are_wrapped_lazily() {
    let inner = Value::object([("b", Value::from(2))]);
    let view = guarded(Value::object([("a", inner.clone())]));
    let nested = view.get("a");
    assert!(nested.is_guarded());
    assert!(nested.same_identity(&inner));
    assert_eq!(nested.get_property("b"), Value::from(2));
}

#[test]
fn test_writes_fail() {
    let object = Value::object([("a", Value::from(1))]);
    let view = guarded(object.clone());
    assert_eq!(
        view.set("a", Value::from(2)),
        Err(SecurityError::GuardedWrite { name: "a".into() })
    );
    assert!(view.delete("a").is_err());
    assert_eq!(object.get_property("a"), Value::from(1));
}

#[test]
fn test_has_raises_on_denied_names() {
    let view = guarded(Value::object([("a", Value::from(1))]));
    assert_eq!(view.has("a"), Ok(true));
    assert_eq!(view.has("b"), Ok(false));
    assert_eq!(
        view.has("constructor"),
        Err(SecurityError::ForbiddenProbe {
            name: "constructor".into()
        })
    );
}

#[test]
fn test_guarded_functions_stay_callable() {
    let function = Value::from(NativeFunction::new("f", |_, _| Ok(Value::from(3))));
    let view = GuardedView::wrap(function);
    assert_eq!(view.type_of(), "function");
    let Value::Function(f) = view.unguarded() else {
        panic!("expected a function");
    };
    assert_eq!(f.call(&Value::Undefined, &[]).unwrap(), Value::from(3));
}

#[test]
fn test_views_compare_by_target() {
    let object = Value::object([("a", Value::from(1))]);
    let a = guarded(object.clone());
    let b = guarded(object);
    assert!(a.ptr_eq(&b));
}
