//! Core evaluation logic.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::api::{Bindings, Diagnostic, ScopeBinding, Severity};
use crate::evaluator::{ExecutionError, operators};
use crate::parser::{BinaryOp, Expr, Literal, Property, PropertyKey, UnaryOp};
use crate::scope::ScopeRef;
use crate::security::{Access, GuardedView, SecurityError, check_method, check_property};
use crate::stdlib;
use crate::syntax::{QuoteStyle, escape_string};
use crate::values::{NativeFunction, Object, Value};

/// Evaluator for one run of one expression.
pub struct Evaluator<'b> {
    bindings: &'b Bindings,
    scope: Option<ScopeRef>,
    depth: usize,
    max_depth: usize,
}

/// One link of a postfix chain.
enum Link<'e> {
    Member(&'e Property),
    Method {
        callee: &'e Expr,
        property: &'e Property,
        args: &'e [Expr],
    },
    Call {
        callee: &'e Expr,
        args: &'e [Expr],
    },
}

impl<'b> Evaluator<'b> {
    /// Validate the bindings and prepare an evaluator.
    ///
    /// A plain scope binding must be empty (or absent); anything else is a
    /// contract violation, since a plain object cannot be walked as a chain.
    pub fn new(bindings: &'b Bindings, max_depth: usize) -> Result<Self, SecurityError> {
        let scope = match &bindings.scope {
            None => None,
            Some(ScopeBinding::Scope(scope)) => Some(scope.clone()),
            Some(ScopeBinding::Plain(value)) => match value {
                Value::Undefined | Value::Null => None,
                Value::Object(object) if object.is_empty() => None,
                other => {
                    return Err(SecurityError::BindingContract {
                        found: describe_binding(other),
                    });
                }
            },
        };

        Ok(Self {
            bindings,
            scope,
            depth: 0,
            max_depth,
        })
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        self.depth = 0;
        self.eval_expr(expr)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        if self.depth >= self.max_depth {
            tracing::debug!(max_depth = self.max_depth, "evaluation depth ceiling reached");
            return Err(SecurityError::EvalDepthExceeded {
                max_depth: self.max_depth,
            }
            .into());
        }
        self.depth += 1;
        let result = self.eval_expr_inner(expr);
        self.depth -= 1;
        result
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),
            Expr::Ident(name) => self.resolve_identifier(name),
            Expr::Member { .. } | Expr::Call { .. } => self.eval_chain(expr),
            Expr::Binary { .. } => self.eval_binary_chain(expr),
            Expr::Unary { op, expr } => self.eval_unary(*op, expr),
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.eval_expr(then_branch)
                } else {
                    self.eval_expr(else_branch)
                }
            }
            Expr::Array(elements) => {
                let items = elements
                    .iter()
                    .map(|element| self.eval_expr(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::from(items))
            }
            Expr::Object(entries) => {
                let object = Object::new();
                for entry in entries {
                    let key = match &entry.key {
                        PropertyKey::Static(key) => key.clone(),
                        PropertyKey::Computed(expr) => property_key(&self.eval_expr(expr)?),
                    };
                    if let Access::Denied(reason) = check_property(&key) {
                        self.soft_deny(
                            "S004",
                            format!("dropped object key {} ({reason})", quoted(&key)),
                        );
                        continue;
                    }
                    let value = self.eval_expr(&entry.value)?;
                    object.insert(key, value);
                }
                Ok(Value::from(object))
            }
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn resolve_identifier(&mut self, name: &str) -> Result<Value, ExecutionError> {
        if let Some(value) = self.magic(name) {
            return Ok(value);
        }

        if let Access::Denied(reason) = check_property(name) {
            self.soft_deny(
                "S001",
                format!("identifier {} is not accessible ({reason})", quoted(name)),
            );
            return Ok(Value::Undefined);
        }

        Ok(self.lookup(name))
    }

    /// Scope chain, then state, then safe globals.
    fn lookup(&self, name: &str) -> Value {
        let mut current = self.scope.clone();
        while let Some(node) = current {
            if let Some(value) = node.lookup_local(name) {
                if let Some(owner) = value.owner() {
                    self.bindings.host.track_dependency(owner, name);
                }
                return value;
            }
            current = node.parent();
        }

        let state = &self.bindings.state;
        if state.has_property(name).unwrap_or(false) {
            if let Some(owner) = state.owner() {
                self.bindings.host.track_dependency(owner, name);
            }
            return state.get_property(name);
        }

        stdlib::lookup_global(name).unwrap_or_default()
    }

    fn magic(&self, name: &str) -> Option<Value> {
        let bindings = self.bindings;
        match name {
            "$event" => Some(bindings.event.clone().unwrap_or_default()),
            "$el" => Some(
                bindings
                    .element
                    .as_ref()
                    .map(|element| bindings.host.wrap_element(element))
                    .unwrap_or_default(),
            ),
            "$refs" => Some(bindings.refs.clone().unwrap_or_default()),
            "$dispatch" => {
                let host = Rc::clone(&bindings.host);
                Some(Value::from(NativeFunction::new("$dispatch", move |_, args| {
                    let event = args.first().map(Value::to_string).unwrap_or_default();
                    let payload = args.get(1).cloned().unwrap_or_default();
                    host.dispatch(&event, &payload)?;
                    Ok(Value::Undefined)
                })))
            }
            "$nextTick" => {
                let host = Rc::clone(&bindings.host);
                Some(Value::from(NativeFunction::new("$nextTick", move |_, args| {
                    host.schedule_next_tick(args.first().cloned());
                    Ok(Value::Undefined)
                })))
            }
            _ => None,
        }
    }

    // ========================================================================
    // Members and calls
    // ========================================================================

    fn property_name(&mut self, property: &Property) -> Result<String, ExecutionError> {
        Ok(match property {
            Property::Named(name) => name.clone(),
            Property::Computed(expr) => property_key(&self.eval_expr(expr)?),
        })
    }

    fn read_member(&self, object: &Value, name: &str) -> Value {
        if let Access::Denied(reason) = check_property(name) {
            self.soft_deny(
                "S002",
                format!("property {} is not accessible ({reason})", quoted(name)),
            );
            return Value::Undefined;
        }
        if let Some(owner) = object.owner() {
            self.bindings.host.track_dependency(owner, name);
        }
        object.get_property(name)
    }

    /// Postfix chains (`a.b[c](d).e`) nest to the left. The spine is
    /// collected in a loop and folded outward, so chain length costs heap
    /// rather than stack.
    fn eval_chain(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        let mut links: SmallVec<[Link<'_>; 8]> = SmallVec::new();
        let mut base = expr;
        loop {
            match base {
                Expr::Member { object, property } => {
                    links.push(Link::Member(property));
                    base = object.as_ref();
                }
                Expr::Call { callee, args } => match callee.as_ref() {
                    Expr::Member { object, property } => {
                        links.push(Link::Method {
                            callee: callee.as_ref(),
                            property,
                            args: args.as_slice(),
                        });
                        base = object.as_ref();
                    }
                    other => {
                        links.push(Link::Call {
                            callee: other,
                            args: args.as_slice(),
                        });
                        base = other;
                    }
                },
                _ => break,
            }
        }

        let mut value = self.eval_expr(base)?;
        for link in links.into_iter().rev() {
            value = match link {
                Link::Member(_) if value.is_nullish() => Value::Undefined,
                Link::Member(property) => {
                    let name = self.property_name(property)?;
                    self.read_member(&value, &name)
                }
                Link::Method { .. } if value.is_nullish() => Value::Undefined,
                Link::Method {
                    callee,
                    property,
                    args,
                } => {
                    let name = self.property_name(property)?;
                    if let Access::Denied(reason) = check_method(&name) {
                        self.soft_deny(
                            "S003",
                            format!("method {} is not callable ({reason})", quoted(&name)),
                        );
                        Value::Undefined
                    } else {
                        if let Some(owner) = value.owner() {
                            self.bindings.host.track_dependency(owner, &name);
                        }
                        let function = value.get_property(&name);
                        self.invoke(&function, &value, callee, args)?
                    }
                }
                Link::Call { callee, args } => {
                    self.invoke(&value, &Value::Undefined, callee, args)?
                }
            };
        }
        Ok(value)
    }

    fn invoke(
        &mut self,
        function: &Value,
        receiver: &Value,
        callee: &Expr,
        args: &[Expr],
    ) -> Result<Value, ExecutionError> {
        let args = args
            .iter()
            .map(|arg| self.eval_expr(arg))
            .collect::<Result<SmallVec<[Value; 4]>, _>>()?;

        let Value::Function(function) = function.unguarded() else {
            self.soft_deny(
                "S005",
                format!("{} is not a function", describe_callee(callee)),
            );
            return Ok(Value::Undefined);
        };

        tracing::trace!(function = function.name(), argc = args.len(), "call");
        let result = function.call(receiver, &args)?;
        Ok(GuardedView::wrap(result))
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Binary operators are left-associative, so a long chain is a deep left
    /// spine. Only right operands recurse.
    fn eval_binary_chain(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        let mut links: SmallVec<[(BinaryOp, &Expr); 8]> = SmallVec::new();
        let mut base = expr;
        while let Expr::Binary { op, left, right } = base {
            links.push((*op, right.as_ref()));
            base = left.as_ref();
        }

        let mut value = self.eval_expr(base)?;
        for (op, right) in links.into_iter().rev() {
            value = self.apply_binary(op, value, right)?;
        }
        Ok(value)
    }

    fn apply_binary(
        &mut self,
        op: BinaryOp,
        left: Value,
        right: &Expr,
    ) -> Result<Value, ExecutionError> {
        match op {
            BinaryOp::And if !left.is_truthy() => Ok(left),
            BinaryOp::Or if left.is_truthy() => Ok(left),
            BinaryOp::Nullish if !left.is_nullish() => Ok(left),
            BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => self.eval_expr(right),
            BinaryOp::In => {
                let key = property_key(&left);
                let target = self.eval_expr(right)?;
                // Checked before the target so the answer never depends on
                // whether a denied name exists.
                if !check_property(&key).is_allowed() {
                    tracing::warn!(name = key.as_str(), "`in` probe of a denied name");
                    return Err(SecurityError::ForbiddenProbe { name: key }.into());
                }
                if !target.is_object_like() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(target.has_property(&key)?))
            }
            _ => {
                let right = self.eval_expr(right)?;
                Ok(operators::eval_binary(op, &left, &right)?)
            }
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Value, ExecutionError> {
        if op != UnaryOp::TypeOf {
            let value = self.eval_expr(operand)?;
            return Ok(operators::eval_unary(op, &value));
        }

        // `typeof` never fails on an unknown or denied name, and runtime
        // faults in its operand read as `undefined`.
        let value = match operand {
            Expr::Ident(name) => match self.magic(name) {
                Some(value) => value,
                None if check_property(name).is_allowed() => self.lookup(name),
                None => Value::Undefined,
            },
            other => match self.eval_expr(other) {
                Ok(value) => value,
                Err(ExecutionError::Runtime(_)) => Value::Undefined,
                Err(err) => return Err(err),
            },
        };
        Ok(Value::from(value.type_of()))
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    fn soft_deny(&self, code: &'static str, message: String) {
        tracing::warn!(code, "{message}");
        self.bindings.host.report(&Diagnostic {
            severity: Severity::Warning,
            message,
            span: None,
            help: None,
            code: Some(code.to_string()),
        });
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Undefined => Value::Undefined,
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::Str(s) => Value::from(s.as_str()),
    }
}

/// Computed keys are coerced to strings.
fn property_key(value: &Value) -> String {
    value.to_string()
}

fn describe_binding(value: &Value) -> String {
    match value {
        Value::Object(_) => "a non-empty plain object".to_string(),
        other => format!("a value of type {}", other.type_of()),
    }
}

/// Names in diagnostics may come from computed keys; keep them on one line.
fn quoted(name: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = escape_string(&mut out, name, QuoteStyle::AlwaysSingle);
    out
}

fn describe_callee(callee: &Expr) -> String {
    match callee {
        Expr::Ident(name) => quoted(name),
        Expr::Member {
            property: Property::Named(name),
            ..
        } => quoted(&format!(".{name}")),
        _ => "callee".to_string(),
    }
}
