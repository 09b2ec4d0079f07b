use once_cell::sync::Lazy;
use warded::Value;
use warded_core::parser::{BinaryOp, Expr, Literal, Property, UnaryOp};

/// Expected result of an evaluation case.
#[derive(Debug, Clone, Copy)]
pub enum Expected {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(&'static str),
}

impl Expected {
    pub fn to_value(self) -> Value {
        match self {
            Expected::Undefined => Value::Undefined,
            Expected::Null => Value::Null,
            Expected::Bool(b) => Value::from(b),
            Expected::Number(n) => Value::from(n),
            Expected::Str(s) => Value::from(s),
        }
    }
}

pub struct EvalCase {
    pub name: &'static str,
    pub expr: &'static str,
    pub expected: Expected,
}

pub struct ParseCase {
    pub name: &'static str,
    pub expr: &'static str,
    pub ast: Expr,
}

/// Literal-only expressions with well-known results.
pub static EVAL_CASES: Lazy<Vec<EvalCase>> = Lazy::new(|| {
    use Expected::*;

    let case = |name, expr, expected| EvalCase {
        name,
        expr,
        expected,
    };
    vec![
        case("precedence", "1 + 2 * 3", Number(7.0)),
        case("grouping", "(1 + 2) * 3", Number(9.0)),
        case("string_plus_number", "\"a\" + 1", Str("a1")),
        case("left_to_right_concat", "1 + 2 + '3'", Str("33")),
        case("division", "7 / 2", Number(3.5)),
        case("remainder_sign", "-7 % 3", Number(-1.0)),
        case("division_by_zero", "1 / 0", Number(f64::INFINITY)),
        case("numeric_comparison", "10 > 9", Bool(true)),
        case("string_comparison", "'10' > '9'", Bool(false)),
        case("loose_equality", "'1' == 1", Bool(true)),
        case("strict_equality", "'1' === 1", Bool(false)),
        case("nullish_equality", "null == undefined", Bool(true)),
        case("not", "!0", Bool(true)),
        case("double_not", "!!'x'", Bool(true)),
        case("or_returns_operand", "'' || 'fallback'", Str("fallback")),
        case("and_returns_operand", "1 && null", Null),
        case("nullish_keeps_zero", "0 ?? 1", Number(0.0)),
        case("ternary", "1 < 2 ? 'yes' : 'no'", Str("yes")),
        case("typeof_string", "typeof 'x'", Str("string")),
        case("typeof_unknown", "typeof nope", Str("undefined")),
        case("array_index", "[10, 20, 30][1]", Number(20.0)),
        case("object_member", "({ a: { b: 2 } }).a.b", Number(2.0)),
        case("computed_key", "({ ['x' + 1]: 5 }).x1", Number(5.0)),
        case("missing_member", "({}).nope", Undefined),
        case("string_length", "'hello'.length", Number(5.0)),
        case("template_literal", "`plain`", Str("plain")),
        case("leading_dot_literal", ".5 + .25", Number(0.75)),
        case("exponent_literal", "1.5e3", Number(1500.0)),
        case("in_operator", "'a' in { a: 1 }", Bool(true)),
        case("unary_minus_string", "-'2'", Number(-2.0)),
    ]
});

/// Expressions with their expected trees.
pub static PARSE_CASES: Lazy<Vec<ParseCase>> = Lazy::new(|| {
    vec![
        ParseCase {
            name: "simple_addition",
            expr: "1 + 2",
            ast: Expr::binary(BinaryOp::Add, Expr::number(1.0), Expr::number(2.0)),
        },
        ParseCase {
            name: "member_chain",
            expr: "a.b.c",
            ast: Expr::member(Expr::member(Expr::ident("a"), "b"), "c"),
        },
        ParseCase {
            name: "computed_member",
            expr: "a[0]",
            ast: Expr::Member {
                object: Box::new(Expr::ident("a")),
                property: Property::Computed(Box::new(Expr::number(0.0))),
            },
        },
        ParseCase {
            name: "call_with_args",
            expr: "f(1, 'x')",
            ast: Expr::Call {
                callee: Box::new(Expr::ident("f")),
                args: vec![Expr::number(1.0), Expr::string("x")],
            },
        },
        ParseCase {
            name: "typeof_binds_tighter_than_equality",
            expr: "typeof x === 'string'",
            ast: Expr::binary(
                BinaryOp::StrictEq,
                Expr::unary(UnaryOp::TypeOf, Expr::ident("x")),
                Expr::string("string"),
            ),
        },
        ParseCase {
            name: "nested_ternary_is_right_associative",
            expr: "a ? b : c ? d : e",
            ast: Expr::Ternary {
                cond: Box::new(Expr::ident("a")),
                then_branch: Box::new(Expr::ident("b")),
                else_branch: Box::new(Expr::Ternary {
                    cond: Box::new(Expr::ident("c")),
                    then_branch: Box::new(Expr::ident("d")),
                    else_branch: Box::new(Expr::ident("e")),
                }),
            },
        },
        ParseCase {
            name: "null_literal",
            expr: "null",
            ast: Expr::Literal(Literal::Null),
        },
    ]
});
