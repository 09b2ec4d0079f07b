//! Scope chains and flat scopes as seen by expressions.

use pretty_assertions::assert_eq;
use warded::{
    Bindings, Error, Scope, ScopeKind, ScopeRef, SecurityError, Value, evaluate, new_scope,
};

fn chain() -> (ScopeRef, ScopeRef) {
    let outer = new_scope(
        ScopeKind::Chained,
        None,
        [("item", Value::from("outer")), ("index", Value::from(0))],
    );
    let inner = new_scope(
        ScopeKind::Chained,
        Some(outer.clone()),
        [("item", Value::from("inner"))],
    );
    (outer, inner)
}

#[test]
fn test_inner_bindings_shadow_outer_ones() {
    let (outer, inner) = chain();
    let state = Value::object([("index", Value::from(99)), ("title", Value::from("t"))]);

    let bindings = Bindings::new(state.clone()).with_scope(inner);
    assert_eq!(evaluate("item", &bindings).unwrap(), Value::from("inner"));
    assert_eq!(evaluate("index", &bindings).unwrap(), Value::from(0));
    assert_eq!(evaluate("title", &bindings).unwrap(), Value::from("t"));

    let bindings = Bindings::new(state).with_scope(outer);
    assert_eq!(evaluate("item", &bindings).unwrap(), Value::from("outer"));
}

#[test]
fn test_state_shadows_globals() {
    let state = Value::object([("Math", Value::object([("PI", Value::from(3))]))]);
    assert_eq!(
        evaluate("Math.PI", &Bindings::new(state)).unwrap(),
        Value::from(3)
    );
    assert_eq!(
        evaluate("Math.PI > 3.14", &Bindings::default()).unwrap(),
        Value::from(true)
    );
}

#[test]
fn test_scope_updates_are_seen_by_later_evaluations() {
    let (_, inner) = chain();
    let bindings = Bindings::default().with_scope(inner.clone());
    assert_eq!(evaluate("index + 1", &bindings).unwrap(), Value::from(1));

    inner.set("index", Value::from(5)).unwrap();
    assert_eq!(evaluate("index + 1", &bindings).unwrap(), Value::from(6));

    assert!(inner.delete("index"));
    assert_eq!(evaluate("index + 1", &bindings).unwrap(), Value::from(1));
}

#[test]
fn test_flat_scope_snapshots_the_chain() {
    let (outer, inner) = chain();
    let flat = new_scope(ScopeKind::Flat, Some(inner), [("extra", Value::from(1))]);
    let bindings = Bindings::default().with_scope(flat.clone());

    assert_eq!(
        evaluate("item + ':' + index + ':' + extra", &bindings).unwrap(),
        Value::from("inner:0:1")
    );

    outer.set("late", Value::from(1)).unwrap();
    assert_eq!(evaluate("late", &bindings).unwrap(), Value::Undefined);
    assert_eq!(flat.keys(), vec!["item", "index", "extra"]);
}

#[test]
fn test_dangerous_scope_keys_are_refused() {
    let scope = new_scope(
        ScopeKind::Chained,
        None,
        [("__proto__", Value::from(1)), ("ok", Value::from(2))],
    );
    assert_eq!(scope.keys(), vec!["ok"]);
    assert_eq!(
        scope.set("constructor", Value::Null),
        Err(SecurityError::ForbiddenScopeKey {
            name: "constructor".into()
        })
    );
}

#[test]
fn test_plain_scope_binding_contract() {
    let state = Value::object([("x", Value::from(1))]);

    for empty in [Value::Undefined, Value::Null, Value::object::<&str, _>([])] {
        let bindings = Bindings::new(state.clone()).with_plain_scope(empty);
        assert_eq!(evaluate("x", &bindings).unwrap(), Value::from(1));
    }

    let bindings =
        Bindings::new(state).with_plain_scope(Value::object([("x", Value::from(2))]));
    assert!(matches!(
        evaluate("x", &bindings),
        Err(Error::Security(SecurityError::BindingContract { .. }))
    ));
}

#[test]
fn test_member_reads_on_scope_values() {
    let scope = new_scope(
        ScopeKind::Chained,
        None,
        [(
            "user",
            Value::object([
                ("name", Value::from("Ada")),
                ("tags", Value::from(vec![Value::from("a"), Value::from("b")])),
            ]),
        )],
    );
    let bindings = Bindings::default().with_scope(scope);

    assert_eq!(
        evaluate("user.name.toUpperCase()", &bindings).unwrap(),
        Value::from("ADA")
    );
    assert_eq!(
        evaluate("user.tags.includes('b')", &bindings).unwrap(),
        Value::from(true)
    );
    assert_eq!(evaluate("user.missing.deeper", &bindings).unwrap(), Value::Undefined);
}
