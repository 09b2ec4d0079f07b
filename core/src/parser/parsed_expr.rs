use crate::parser::{BinaryOp, UnaryOp};
use serde::Serialize;

/// An expression tree. Nodes own their children and are never mutated
/// after the parser hands them out.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    Member {
        object: Box<Expr>,
        property: Property,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<ObjectEntry>),
}

/// The property half of a member access.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Property {
    /// `a.name`
    Named(String),
    /// `a[expr]`
    Computed(Box<Expr>),
}

impl Property {
    pub fn is_computed(&self) -> bool {
        matches!(self, Property::Computed(_))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: PropertyKey,
    pub value: Expr,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier, string and numeric keys, already in their string form.
    Static(String),
    /// `[expr]: value`
    Computed(Expr),
}

impl PropertyKey {
    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyKey::Computed(_))
    }
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(value.into()))
    }

    pub fn member(object: Expr, name: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Property::Named(name.into()),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::Unary {
            op,
            expr: Box::new(expr),
        }
    }
}

#[derive(Clone, Serialize)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

// Numbers compare bitwise so that parsing `NaN` twice yields equal trees.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Undefined, Literal::Undefined) => true,
            (Literal::Null, Literal::Null) => true,
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Number(a), Literal::Number(b)) => a.to_bits() == b.to_bits(),
            (Literal::Str(a), Literal::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl core::fmt::Debug for Literal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Literal::Undefined => write!(f, "Undefined"),
            Literal::Null => write!(f, "Null"),
            Literal::Bool(b) => write!(f, "Bool({b})"),
            Literal::Number(n) => write!(f, "Number({n})"),
            Literal::Str(s) => write!(f, "Str({s:?})"),
        }
    }
}
