//! Binary and unary operator implementations.
//!
//! Coercions never fail and arithmetic follows IEEE 754 (producing
//! `NaN`/`Infinity` rather than errors). The one fault is a concatenation
//! longer than [`MAX_STRING_LEN`](crate::stdlib::MAX_STRING_LEN).

use std::cmp::Ordering;

use crate::evaluator::RuntimeError;
use crate::parser::{BinaryOp, UnaryOp};
use crate::stdlib::check_string_len;
use crate::values::Value;

/// Compound values take part in arithmetic and comparison through their
/// string form.
fn to_primitive(value: &Value) -> Value {
    if value.is_object_like() {
        Value::from(value.to_string())
    } else {
        value.clone()
    }
}

/// Apply a non-short-circuit binary operator to evaluated operands.
///
/// `in` and the logical operators are handled by the evaluator, which
/// needs control over operand evaluation and the name policy.
pub(crate) fn eval_binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    Ok(match op {
        BinaryOp::Add => add(left, right)?,
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            Value::Number(arithmetic(op, left.to_number(), right.to_number()))
        }
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
            Value::Bool(compare(op, left, right))
        }
        BinaryOp::Eq => Value::Bool(loose_equals(left, right)),
        BinaryOp::Ne => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNe => Value::Bool(!strict_equals(left, right)),
        BinaryOp::In | BinaryOp::Nullish | BinaryOp::And | BinaryOp::Or => {
            debug_assert!(false, "{op:?} is evaluated by the evaluator");
            Value::Undefined
        }
    })
}

/// Apply a unary operator other than `typeof`.
pub(crate) fn eval_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
        UnaryOp::TypeOf => Value::from(operand.type_of()),
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let left = to_primitive(left);
    let right = to_primitive(right);
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        let (left, right) = (left.to_string(), right.to_string());
        check_string_len(left.chars().count() + right.chars().count(), "+")?;
        Ok(Value::from(left + &right))
    } else {
        Ok(Value::Number(left.to_number() + right.to_number()))
    }
}

/// Evaluate a numeric binary operation.
///
/// `%` is the truncating remainder (sign follows the dividend).
pub(crate) fn arithmetic(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Rem => left % right,
        _ => f64::NAN,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> bool {
    let left = to_primitive(left);
    let right = to_primitive(right);

    let ordering = match (&left, &right) {
        // Code-unit order, matching how strings sort in the host language.
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    let Some(ordering) = ordering else {
        return false;
    };

    match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => false,
    }
}

/// `===`: no coercion; compound values compare by identity, guarded views
/// by the value they wrap.
pub(crate) fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left.unguarded(), right.unguarded()) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (a, b) => a.same_identity(b),
    }
}

/// `==`: `null` and `undefined` equal each other and nothing else;
/// otherwise booleans become numbers, compound values their string form,
/// and a number compared with a string compares numerically.
pub(crate) fn loose_equals(left: &Value, right: &Value) -> bool {
    let (left, right) = (left.unguarded(), right.unguarded());
    match (left, right) {
        (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
        (Value::Bool(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Bool(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (Value::Number(a), Value::String(_)) => *a == right.to_number(),
        (Value::String(_), Value::Number(b)) => left.to_number() == *b,
        (a, b) if a.is_object_like() && b.is_object_like() => a.same_identity(b),
        (a, b) if a.is_object_like() => loose_equals(&to_primitive(a), b),
        (a, b) if b.is_object_like() => loose_equals(a, &to_primitive(b)),
        (a, b) => strict_equals(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::MAX_STRING_LEN;

    fn n(v: f64) -> Value {
        Value::from(v)
    }

    fn s(v: &str) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_add_concatenates_with_strings() {
        assert_eq!(add(&s("a"), &n(1.0)), Ok(s("a1")));
        assert_eq!(add(&n(1.0), &s("a")), Ok(s("1a")));
        assert_eq!(add(&n(1.0), &n(2.0)), Ok(n(3.0)));
        assert_eq!(add(&Value::from(true), &n(1.0)), Ok(n(2.0)));
        assert_eq!(add(&Value::from(vec![n(1.0), n(2.0)]), &n(3.0)), Ok(s("1,23")));
        assert_eq!(add(&Value::Null, &s("x")), Ok(s("nullx")));
    }

    #[test]
    fn test_add_enforces_string_length_cap() {
        let half = s(&"x".repeat(MAX_STRING_LEN / 2));
        assert!(add(&half, &half).is_ok());
        assert!(matches!(
            add(&half, &s(&"y".repeat(MAX_STRING_LEN / 2 + 1))),
            Err(RuntimeError::Native { .. })
        ));
    }

    #[test]
    fn test_arithmetic_is_ieee() {
        assert_eq!(arithmetic(BinaryOp::Div, 1.0, 0.0), f64::INFINITY);
        assert!(arithmetic(BinaryOp::Div, 0.0, 0.0).is_nan());
        assert_eq!(arithmetic(BinaryOp::Rem, -7.0, 3.0), -1.0);
        assert_eq!(arithmetic(BinaryOp::Rem, 5.5, 2.0), 1.5);
    }

    #[test]
    fn test_string_comparison_is_lexicographic() {
        assert!(compare(BinaryOp::Lt, &s("apple"), &s("banana")));
        assert!(compare(BinaryOp::Lt, &s("10"), &s("9")));
        assert!(compare(BinaryOp::Gt, &s("b"), &s("B")));
    }

    #[test]
    fn test_mixed_comparison_is_numeric() {
        assert!(compare(BinaryOp::Gt, &s("10"), &n(9.0)));
        assert!(compare(BinaryOp::Le, &Value::Null, &n(0.0)));
        assert!(!compare(BinaryOp::Lt, &n(f64::NAN), &n(1.0)));
        assert!(!compare(BinaryOp::Ge, &Value::Undefined, &n(0.0)));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(!loose_equals(&Value::Null, &n(0.0)));
        assert!(loose_equals(&n(1.0), &s("1")));
        assert!(loose_equals(&Value::from(true), &n(1.0)));
        assert!(loose_equals(&Value::from(false), &s("")));
        assert!(loose_equals(&Value::from(vec![n(1.0)]), &s("1")));
        assert!(!loose_equals(&n(f64::NAN), &n(f64::NAN)));
    }

    #[test]
    fn test_strict_equality() {
        assert!(!strict_equals(&n(1.0), &s("1")));
        assert!(strict_equals(&s("a"), &s("a")));
        assert!(strict_equals(&n(0.0), &n(-0.0)));

        let object = Value::object([("a", n(1.0))]);
        let twin = Value::object([("a", n(1.0))]);
        assert!(strict_equals(&object, &object.clone()));
        assert!(!strict_equals(&object, &twin));
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval_unary(UnaryOp::Not, &s("")), Value::from(true));
        assert_eq!(eval_unary(UnaryOp::Neg, &s("3")), n(-3.0));
        assert_eq!(eval_unary(UnaryOp::Plus, &Value::from(true)), n(1.0));
        assert_eq!(eval_unary(UnaryOp::TypeOf, &Value::Null), s("object"));
    }
}
