//! Tree-walking evaluator for the fixture script subset.
//!
//! The interpreter owns one [`Realm`] and the scope arena for a single run. It is deliberately bounded: every
//! statement and call consumes a step, the wall-clock deadline is polled periodically, and script recursion is
//! capped. Exhausting a step or time limit produces [`Abrupt::Halt`], which `try`/`catch`/`finally` never see.
//!
//! ## Structure
//! - `mod.rs`: state, limits, calls and declaration hoisting
//! - `statements.rs`: statement execution and completions
//! - `expressions.rs`: expression evaluation and references
//! - `conversions.rs`: `ToPrimitive`, `ToString`, `ToNumber`, equality and property access on any value
//! - `stack.rs`: on-demand stack growth for recursive evaluation

mod conversions;
mod expressions;
mod stack;
mod statements;

use std::rc::Rc;
use std::time::Instant;

use t262_core::errors::{CALL_STACK_EXCEEDED_MSG, ErrorKind, INVALID_STRING_LENGTH_MSG};
use t262_core::strings::MAX_STRING_LENGTH;
use t262_syntax::ast::{ForInit, FunctionDecl, Program, Spanned, Statement};

use super::env::{ScopeId, ScopeKind, Scopes};
use super::object::{FunctionKind, JsObject, ObjectKind, PropertyDescriptor, ScriptFunction};
use super::realm::Realm;
use super::value::{ObjectId, Value};

pub use conversions::Hint;
pub(crate) use stack::ensure_sufficient_stack;

/// How often (in steps) the wall-clock deadline is polled.
const DEADLINE_POLL_INTERVAL: u64 = 1024;

/// Why a run was stopped from outside the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    StepBudget,
    Deadline,
}

/// A non-normal exit from evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Abrupt {
    /// A script-visible exception.
    Throw(Value),
    /// The run exceeded a limit. Not catchable.
    Halt(HaltReason),
}

/// Statement completion other than a thrown exception.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub type Eval<T> = Result<T, Abrupt>;

/// Resource limits for one run.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionLimits {
    pub max_steps: u64,
    pub deadline: Option<Instant>,
    pub max_call_depth: usize,
    /// Longest string a run may build, in UTF-16 code units.
    pub max_string_length: usize,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            deadline: None,
            max_call_depth: 200,
            max_string_length: MAX_STRING_LENGTH,
        }
    }
}

pub struct Interpreter {
    realm: Realm,
    scopes: Scopes,
    limits: ExecutionLimits,
    steps: u64,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(realm: Realm, limits: ExecutionLimits) -> Self {
        let scopes = Scopes::new(Value::Object(realm.global()));
        Self {
            realm,
            scopes,
            limits,
            steps: 0,
            call_depth: 0,
        }
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn realm_mut(&mut self) -> &mut Realm {
        &mut self.realm
    }

    pub fn into_realm(self) -> Realm {
        self.realm
    }

    /// Steps consumed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn global_object(&self) -> Value {
        Value::Object(self.realm.global())
    }

    /// Hoist declarations into the global scope, then execute the program's statements.
    pub fn run_program(&mut self, program: &Program) -> Eval<()> {
        self.hoist(&program.body, Scopes::GLOBAL);
        for stmt in &program.body {
            if let Completion::Return(_) = self.exec(stmt, Scopes::GLOBAL)? {
                break;
            }
        }
        Ok(())
    }

    /// Consume one step, halting when a limit is exhausted.
    pub(crate) fn tick(&mut self) -> Eval<()> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(Abrupt::Halt(HaltReason::StepBudget));
        }
        if self.steps % DEADLINE_POLL_INTERVAL == 0 {
            if let Some(deadline) = self.limits.deadline {
                if Instant::now() >= deadline {
                    return Err(Abrupt::Halt(HaltReason::Deadline));
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// A new error object of `kind`, wrapped as a throw.
    pub fn throw(&mut self, kind: ErrorKind, message: impl AsRef<str>) -> Abrupt {
        Abrupt::Throw(Value::Object(self.realm.new_error(kind, message.as_ref())))
    }

    pub fn type_error(&mut self, message: impl AsRef<str>) -> Abrupt {
        self.throw(ErrorKind::TypeError, message)
    }

    /// Throw `RangeError` before building a string of `units` code units past the limit.
    pub(crate) fn ensure_string_length(&mut self, units: usize) -> Eval<()> {
        if units > self.limits.max_string_length {
            return Err(self.throw(ErrorKind::RangeError, INVALID_STRING_LENGTH_MSG));
        }
        Ok(())
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// `[[Call]]`: invoke `callee` with `this` and `args`.
    pub fn call(&mut self, callee: &Value, this: Value, args: &[Value]) -> Eval<Value> {
        let target = callee.as_object().and_then(|id| match &self.realm.object(id).kind {
            ObjectKind::Function(kind) => Some((id, kind.clone())),
            _ => None,
        });
        let Some(kind) = target else {
            let shown = self.describe_value(callee);
            return Err(self.type_error(format!("{shown} is not a function")));
        };
        if self.call_depth >= self.limits.max_call_depth {
            return Err(self.throw(ErrorKind::RangeError, CALL_STACK_EXCEEDED_MSG));
        }
        self.tick()?;

        self.call_depth += 1;
        let result = ensure_sufficient_stack(|| match kind {
            (_, FunctionKind::Native(native)) => (native.call)(self, this, args),
            (id, FunctionKind::Script(function)) => self.call_script(id, &function, this, args),
        });
        self.call_depth -= 1;
        result
    }

    fn call_script(&mut self, callee: ObjectId, function: &ScriptFunction, this: Value, args: &[Value]) -> Eval<Value> {
        let this = if this.is_nullish() { self.global_object() } else { this };
        let scope = self.scopes.declarative(function.scope, Some(this), true);

        let decl = function.decl.clone();
        for (index, param) in decl.params.iter().enumerate() {
            let value = args.get(index).cloned().unwrap_or(Value::Undefined);
            self.scopes.bind(scope, param, value);
        }
        if !decl.params.iter().any(|p| p == "arguments") {
            let arguments = self.arguments_object(callee, args);
            self.scopes.bind(scope, "arguments", Value::Object(arguments));
        }
        self.hoist(&decl.body, scope);

        match self.exec_block(&decl.body, scope)? {
            Completion::Return(value) => Ok(value),
            _ => Ok(Value::Undefined),
        }
    }

    fn arguments_object(&mut self, callee: ObjectId, args: &[Value]) -> ObjectId {
        let proto = self.realm.intrinsics().object_prototype;
        let id = self.realm.alloc(JsObject::new(Some(proto), ObjectKind::Arguments));
        for (index, arg) in args.iter().enumerate() {
            self.realm.insert_property(id, &index.to_string(), PropertyDescriptor::data(arg.clone()));
        }
        self.realm.insert_property(id, "length", PropertyDescriptor::hidden(Value::Number(args.len() as f64)));
        self.realm.insert_property(id, "callee", PropertyDescriptor::hidden(Value::Object(callee)));
        id
    }

    /// `[[Construct]]`: `new callee(...args)`.
    ///
    /// Built-in constructors behave the same whether called or constructed, so they are simply called.
    pub fn construct(&mut self, callee: &Value, args: &[Value]) -> Eval<Value> {
        let target = callee.as_object().filter(|id| self.realm.object(*id).is_constructor());
        let Some(id) = target else {
            let shown = self.describe_value(callee);
            return Err(self.type_error(format!("{shown} is not a constructor")));
        };
        if let ObjectKind::Function(FunctionKind::Native(_)) = self.realm.object(id).kind {
            return self.call(callee, Value::Undefined, args);
        }

        let proto = match self.realm.get(id, "prototype") {
            Value::Object(proto) => proto,
            _ => self.realm.intrinsics().object_prototype,
        };
        let instance = self.realm.alloc(JsObject::new(Some(proto), ObjectKind::Ordinary));
        match self.call(callee, Value::Object(instance), args)? {
            result @ Value::Object(_) => Ok(result),
            _ => Ok(Value::Object(instance)),
        }
    }

    /// Short rendering of a value for error messages.
    pub(crate) fn describe_value(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("\"{s}\""),
            Value::Object(id) if self.realm.object(*id).is_callable() => "function".to_string(),
            Value::Object(_) => "object".to_string(),
            other => other.primitive_to_string().map(|s| s.to_string()).unwrap_or_default(),
        }
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Scope in the chain from `scope` that holds `name`, or `None` if unresolvable.
    pub(crate) fn resolve(&self, name: &str, mut scope: ScopeId) -> Option<ScopeId> {
        loop {
            let current = self.scopes.get(scope);
            let found = match &current.kind {
                ScopeKind::Declarative(vars) => vars.contains_key(name),
                ScopeKind::Global => self.realm.has_property(self.realm.global(), name),
            };
            if found {
                return Some(scope);
            }
            scope = current.parent?;
        }
    }

    pub(crate) fn read_binding(&mut self, name: &str, scope: ScopeId) -> Eval<Value> {
        let found = self.resolve(name, scope);
        self.binding_value(found, name)
    }

    /// Value of `name` in the scope it resolved to; `ReferenceError` if it did not resolve.
    pub(crate) fn binding_value(&mut self, found: Option<ScopeId>, name: &str) -> Eval<Value> {
        match found {
            Some(found) => Ok(match &self.scopes.get(found).kind {
                ScopeKind::Declarative(vars) => vars.get(name).cloned().unwrap_or(Value::Undefined),
                ScopeKind::Global => self.realm.get(self.realm.global(), name),
            }),
            None => Err(self.throw(ErrorKind::ReferenceError, format!("{name} is not defined"))),
        }
    }

    /// Assign to a resolved binding; unresolvable names become global properties.
    pub(crate) fn write_binding(&mut self, found: Option<ScopeId>, name: &str, value: Value) -> Eval<()> {
        if let Some(scope) = found {
            if let ScopeKind::Declarative(vars) = &mut self.scopes.get_mut(scope).kind {
                vars.insert(name.to_string(), value);
                return Ok(());
            }
        }
        let global = self.global_object();
        self.put_property(&global, name, value)
    }

    // ========================================================================
    // Hoisting
    // ========================================================================

    /// Instantiate function declarations, then `var` names, found anywhere in `body` outside nested functions.
    pub(crate) fn hoist(&mut self, body: &[Spanned<Statement>], scope: ScopeId) {
        let mut functions = Vec::new();
        let mut vars = Vec::new();
        collect_declarations(body, &mut functions, &mut vars);

        for decl in functions {
            let Some(name) = decl.name.clone() else { continue };
            let closure = Value::Object(self.realm.new_script_function(decl, scope));
            self.declare(scope, &name, Some(closure));
        }
        for name in vars {
            self.declare(scope, &name, None);
        }
    }

    /// Declare `name` in `scope`. `None` leaves an existing binding untouched.
    fn declare(&mut self, scope: ScopeId, name: &str, value: Option<Value>) {
        let global = self.realm.global();
        match (&mut self.scopes.get_mut(scope).kind, value) {
            (ScopeKind::Declarative(vars), Some(value)) => {
                vars.insert(name.to_string(), value);
            }
            (ScopeKind::Declarative(vars), None) => {
                vars.entry(name.to_string()).or_insert(Value::Undefined);
            }
            (ScopeKind::Global, Some(value)) => {
                let fresh = PropertyDescriptor::global_binding(value.clone());
                if !self.realm.define_own_property(global, name, fresh.into()) {
                    self.realm.put(global, name, value);
                }
            }
            (ScopeKind::Global, None) => {
                if self.realm.get_own_property(global, name).is_none() {
                    let fresh = PropertyDescriptor::global_binding(Value::Undefined);
                    self.realm.define_own_property(global, name, fresh.into());
                }
            }
        }
    }

    /// Closure for a function expression. A named expression can refer to itself through an extra scope.
    pub(crate) fn function_expression(&mut self, decl: &Rc<FunctionDecl>, scope: ScopeId) -> Value {
        let Some(name) = decl.name.clone() else {
            return Value::Object(self.realm.new_script_function(decl.clone(), scope));
        };
        let own_scope = self.scopes.declarative(scope, None, false);
        let closure = Value::Object(self.realm.new_script_function(decl.clone(), own_scope));
        self.scopes.bind(own_scope, &name, closure.clone());
        closure
    }
}

fn collect_declarations(body: &[Spanned<Statement>], functions: &mut Vec<Rc<FunctionDecl>>, vars: &mut Vec<String>) {
    for stmt in body {
        collect_statement(&stmt.node, functions, vars);
    }
}

fn collect_statement(stmt: &Statement, functions: &mut Vec<Rc<FunctionDecl>>, vars: &mut Vec<String>) {
    match stmt {
        Statement::Function(decl) => functions.push(decl.clone()),
        Statement::Var(declarators) => vars.extend(declarators.iter().map(|d| d.name.clone())),
        Statement::Block(body) => collect_declarations(body, functions, vars),
        Statement::If(stmt) => {
            collect_statement(&stmt.then_branch.node, functions, vars);
            if let Some(else_branch) = &stmt.else_branch {
                collect_statement(&else_branch.node, functions, vars);
            }
        }
        Statement::While(stmt) | Statement::DoWhile(stmt) => collect_statement(&stmt.body.node, functions, vars),
        Statement::For(stmt) => {
            if let Some(ForInit::Var(declarators)) = &stmt.init {
                vars.extend(declarators.iter().map(|d| d.name.clone()));
            }
            collect_statement(&stmt.body.node, functions, vars);
        }
        Statement::ForIn(stmt) => {
            if stmt.declares {
                vars.push(stmt.name.clone());
            }
            collect_statement(&stmt.body.node, functions, vars);
        }
        Statement::Try(stmt) => {
            collect_declarations(&stmt.block, functions, vars);
            if let Some(handler) = &stmt.handler {
                collect_declarations(&handler.body, functions, vars);
            }
            if let Some(finalizer) = &stmt.finalizer {
                collect_declarations(finalizer, functions, vars);
            }
        }
        Statement::Expr(_)
        | Statement::Return(_)
        | Statement::Break
        | Statement::Continue
        | Statement::Throw(_)
        | Statement::Empty => {}
    }
}
