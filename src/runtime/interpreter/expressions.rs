//! Expression evaluation.

use std::rc::Rc;

use t262_core::errors::ErrorKind;
use t262_core::numbers::array_index;
use t262_core::strings::{utf16_cmp, utf16_len};
use t262_syntax::ast::{AssignOp, BinaryOp, Expr, Literal, LogicalOp, Spanned, UnaryOp, UpdateOp};

use super::{Eval, Hint, Interpreter, ensure_sufficient_stack};
use crate::runtime::env::{ScopeId, ScopeKind};
use crate::runtime::object::PropertyDescriptor;
use crate::runtime::value::Value;

/// Where an assignment, update or `delete` lands.
enum Reference {
    /// An identifier; `found` is `None` when it did not resolve.
    Binding { found: Option<ScopeId>, name: String },
    Property { base: Value, key: Rc<str> },
}

impl Interpreter {
    pub(crate) fn eval(&mut self, expr: &Spanned<Expr>, scope: ScopeId) -> Eval<Value> {
        ensure_sufficient_stack(|| self.eval_node(expr, scope))
    }

    fn eval_node(&mut self, expr: &Spanned<Expr>, scope: ScopeId) -> Eval<Value> {
        match &expr.node {
            Expr::Literal(literal) => Ok(literal_value(literal)),
            Expr::Ident(name) => self.read_binding(name, scope),
            Expr::This => Ok(self.scopes.this_value(scope)),
            Expr::Array(items) => {
                let values = self.eval_list(items, scope)?;
                Ok(Value::Object(self.realm.new_array(values)))
            }
            Expr::Object(properties) => {
                let id = self.realm.new_object();
                for property in properties {
                    let value = self.eval(&property.value, scope)?;
                    self.realm
                        .define_own_property(id, &property.key, PropertyDescriptor::data(value).into());
                }
                Ok(Value::Object(id))
            }
            Expr::Function(decl) => Ok(self.function_expression(decl, scope)),
            Expr::Unary(op, operand) => self.eval_unary(*op, operand, scope),
            Expr::Update { op, prefix, target } => {
                let reference = self.eval_reference(target, scope)?;
                let current = self.reference_value(&reference)?;
                let old = self.to_number(&current)?;
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.assign_reference(&reference, Value::Number(new))?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Expr::Binary(lhs, op, rhs) => {
                let lhs = self.eval(lhs, scope)?;
                let rhs = self.eval(rhs, scope)?;
                self.binary(*op, &lhs, &rhs)
            }
            Expr::Logical(lhs, op, rhs) => {
                let lhs = self.eval(lhs, scope)?;
                let short_circuit = match op {
                    LogicalOp::And => !lhs.to_boolean(),
                    LogicalOp::Or => lhs.to_boolean(),
                };
                if short_circuit { Ok(lhs) } else { self.eval(rhs, scope) }
            }
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.eval(condition, scope)?.to_boolean() {
                    self.eval(then_expr, scope)
                } else {
                    self.eval(else_expr, scope)
                }
            }
            Expr::Assign { op, target, value } => {
                let reference = self.eval_reference(target, scope)?;
                let value = match op {
                    AssignOp::Assign => self.eval(value, scope)?,
                    AssignOp::Compound(op) => {
                        let current = self.reference_value(&reference)?;
                        let rhs = self.eval(value, scope)?;
                        self.binary(*op, &current, &rhs)?
                    }
                };
                self.assign_reference(&reference, value.clone())?;
                Ok(value)
            }
            Expr::Member(..) | Expr::Index(..) => {
                let (base, key) = self.eval_property_reference(expr, scope)?;
                self.get_property(&base, &key)
            }
            Expr::Call(callee, args) => self.eval_call(callee, args, scope),
            Expr::New(callee, args) => {
                let constructor = self.eval(callee, scope)?;
                let args = self.eval_list(args, scope)?;
                let constructible = constructor
                    .as_object()
                    .is_some_and(|id| self.realm.object(id).is_constructor());
                if !constructible {
                    let name = callee_text(&callee.node);
                    return Err(self.type_error(format!("{name} is not a constructor")));
                }
                self.construct(&constructor, &args)
            }
            Expr::Sequence(exprs) => {
                let mut last = Value::Undefined;
                for expr in exprs {
                    last = self.eval(expr, scope)?;
                }
                Ok(last)
            }
        }
    }

    fn eval_list(&mut self, exprs: &[Spanned<Expr>], scope: ScopeId) -> Eval<Vec<Value>> {
        exprs.iter().map(|expr| self.eval(expr, scope)).collect()
    }

    fn eval_call(&mut self, callee: &Spanned<Expr>, args: &[Spanned<Expr>], scope: ScopeId) -> Eval<Value> {
        let (function, this) = match &callee.node {
            Expr::Member(..) | Expr::Index(..) => {
                let (base, key) = self.eval_property_reference(callee, scope)?;
                (self.get_property(&base, &key)?, base)
            }
            _ => (self.eval(callee, scope)?, Value::Undefined),
        };
        let args = self.eval_list(args, scope)?;
        if !self.realm.is_callable(&function) {
            let name = callee_text(&callee.node);
            return Err(self.type_error(format!("{name} is not a function")));
        }
        self.call(&function, this, &args)
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn eval_unary(&mut self, op: UnaryOp, operand: &Spanned<Expr>, scope: ScopeId) -> Eval<Value> {
        match op {
            UnaryOp::Typeof => {
                if let Expr::Ident(name) = &operand.node {
                    if self.resolve(name, scope).is_none() {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.eval(operand, scope)?;
                Ok(Value::string(self.type_of(&value)))
            }
            UnaryOp::Delete => self.eval_delete(operand, scope).map(Value::Bool),
            UnaryOp::Void => {
                self.eval(operand, scope)?;
                Ok(Value::Undefined)
            }
            UnaryOp::Not => Ok(Value::Bool(!self.eval(operand, scope)?.to_boolean())),
            UnaryOp::Neg => {
                let value = self.eval(operand, scope)?;
                Ok(Value::Number(-self.to_number(&value)?))
            }
            UnaryOp::Plus => {
                let value = self.eval(operand, scope)?;
                Ok(Value::Number(self.to_number(&value)?))
            }
        }
    }

    /// `delete operand`: `false` for declared bindings and non-configurable properties.
    fn eval_delete(&mut self, operand: &Spanned<Expr>, scope: ScopeId) -> Eval<bool> {
        match &operand.node {
            Expr::Ident(name) => {
                let Some(found) = self.resolve(name, scope) else {
                    return Ok(true);
                };
                match self.scopes.get(found).kind {
                    ScopeKind::Global => {
                        let global = self.realm.global();
                        Ok(self.realm.delete(global, name))
                    }
                    ScopeKind::Declarative(_) => Ok(false),
                }
            }
            Expr::Member(..) | Expr::Index(..) => {
                let (base, key) = self.eval_property_reference(operand, scope)?;
                match base {
                    Value::Object(id) => Ok(self.realm.delete(id, &key)),
                    Value::Undefined | Value::Null => Err(self.type_error("Cannot convert undefined or null to object")),
                    Value::String(_) => Ok(key.as_ref() != "length" && array_index(&key).is_none()),
                    _ => Ok(true),
                }
            }
            _ => {
                self.eval(operand, scope)?;
                Ok(true)
            }
        }
    }

    /// Apply a binary operator to evaluated operands.
    pub(crate) fn binary(&mut self, op: BinaryOp, lhs: &Value, rhs: &Value) -> Eval<Value> {
        match op {
            BinaryOp::Add => {
                let lhs = self.to_primitive(lhs.clone(), Hint::Number)?;
                let rhs = self.to_primitive(rhs.clone(), Hint::Number)?;
                if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) {
                    let lhs = self.to_string(&lhs)?;
                    let rhs = self.to_string(&rhs)?;
                    self.ensure_string_length(utf16_len(&lhs).saturating_add(utf16_len(&rhs)))?;
                    let mut joined = String::with_capacity(lhs.len() + rhs.len());
                    joined.push_str(&lhs);
                    joined.push_str(&rhs);
                    Ok(Value::string(joined))
                } else {
                    Ok(Value::Number(self.to_number(&lhs)? + self.to_number(&rhs)?))
                }
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                let a = self.to_number(lhs)?;
                let b = self.to_number(rhs)?;
                Ok(Value::Number(match op {
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    _ => a % b,
                }))
            }
            BinaryOp::Eq => self.loose_equals(lhs, rhs).map(Value::Bool),
            BinaryOp::NotEq => self.loose_equals(lhs, rhs).map(|eq| Value::Bool(!eq)),
            BinaryOp::StrictEq => Ok(Value::Bool(lhs.strict_equals(rhs))),
            BinaryOp::StrictNotEq => Ok(Value::Bool(!lhs.strict_equals(rhs))),
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => self.compare(op, lhs, rhs),
            BinaryOp::In => self.has_property_in(lhs, rhs).map(Value::Bool),
            BinaryOp::Instanceof => self.instance_of(lhs, rhs).map(Value::Bool),
        }
    }

    /// Relational comparison. Strings compare by UTF-16 code units; any `NaN` makes the result `false`.
    fn compare(&mut self, op: BinaryOp, lhs: &Value, rhs: &Value) -> Eval<Value> {
        let lhs = self.to_primitive(lhs.clone(), Hint::Number)?;
        let rhs = self.to_primitive(rhs.clone(), Hint::Number)?;
        if let (Value::String(a), Value::String(b)) = (&lhs, &rhs) {
            let ordering = utf16_cmp(a, b);
            return Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Gt => ordering.is_gt(),
                BinaryOp::LtEq => ordering.is_le(),
                _ => ordering.is_ge(),
            }));
        }
        let a = self.to_number(&lhs)?;
        let b = self.to_number(&rhs)?;
        Ok(Value::Bool(match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Gt => a > b,
            BinaryOp::LtEq => a <= b,
            _ => a >= b,
        }))
    }

    // ========================================================================
    // References
    // ========================================================================

    fn eval_reference(&mut self, expr: &Spanned<Expr>, scope: ScopeId) -> Eval<Reference> {
        match &expr.node {
            Expr::Ident(name) => Ok(Reference::Binding {
                found: self.resolve(name, scope),
                name: name.clone(),
            }),
            Expr::Member(..) | Expr::Index(..) => {
                let (base, key) = self.eval_property_reference(expr, scope)?;
                Ok(Reference::Property { base, key })
            }
            _ => Err(self.throw(ErrorKind::ReferenceError, "Invalid left-hand side in assignment")),
        }
    }

    /// Evaluate the base and key of `a.b` or `a[b]`.
    fn eval_property_reference(&mut self, expr: &Spanned<Expr>, scope: ScopeId) -> Eval<(Value, Rc<str>)> {
        match &expr.node {
            Expr::Member(object, name) => {
                let base = self.eval(object, scope)?;
                Ok((base, name.as_str().into()))
            }
            Expr::Index(object, index) => {
                let base = self.eval(object, scope)?;
                let key = self.eval(index, scope)?;
                let key = self.to_string(&key)?;
                if base.is_nullish() {
                    let shown = if matches!(base, Value::Null) { "null" } else { "undefined" };
                    return Err(self.type_error(format!("Cannot read property '{key}' of {shown}")));
                }
                Ok((base, key))
            }
            _ => Err(self.throw(ErrorKind::ReferenceError, "Invalid property reference")),
        }
    }

    fn reference_value(&mut self, reference: &Reference) -> Eval<Value> {
        match reference {
            Reference::Binding { found, name } => self.binding_value(*found, name),
            Reference::Property { base, key } => self.get_property(base, key),
        }
    }

    fn assign_reference(&mut self, reference: &Reference, value: Value) -> Eval<()> {
        match reference {
            Reference::Binding { found, name } => self.write_binding(*found, name, value),
            Reference::Property { base, key } => self.put_property(base, key, value),
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::string(s.as_str()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Null => Value::Null,
    }
}

/// Source-like rendering of a callee for "is not a function" messages.
fn callee_text(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::This => "this".to_string(),
        Expr::Member(object, name) => format!("{}.{name}", callee_text(&object.node)),
        Expr::Index(object, _) => format!("{}[...]", callee_text(&object.node)),
        Expr::Call(callee, _) => format!("{}(...)", callee_text(&callee.node)),
        _ => "expression".to_string(),
    }
}
