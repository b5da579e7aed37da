//! Lexical environments.
//!
//! Scopes live in an arena owned by the interpreter and are addressed by [`ScopeId`]; closures capture the id of
//! the scope they were created in. The root scope is backed by the global object, so global `var`s and host globals
//! are ordinary properties on it.

use std::collections::HashMap;

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub enum ScopeKind {
    /// Bindings are properties of the realm's global object.
    Global,
    /// Function, catch-clause and named-function-expression scopes.
    Declarative(HashMap<String, Value>),
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// `this` for code running directly in this scope. `None` defers to the parent.
    pub this: Option<Value>,
    /// Function scopes receive hoisted `var` and function declarations; catch scopes do not.
    pub is_var_scope: bool,
}

/// Arena of every scope created during one run.
#[derive(Debug, Default)]
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Scopes {
    /// Create the arena with its global scope at [`Scopes::GLOBAL`].
    pub fn new(global_this: Value) -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Global,
                parent: None,
                this: Some(global_this),
                is_var_scope: true,
            }],
        }
    }

    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn push(&mut self, scope: Scope) -> ScopeId {
        self.scopes.push(scope);
        ScopeId(self.scopes.len() - 1)
    }

    /// A new declarative scope under `parent`.
    pub fn declarative(&mut self, parent: ScopeId, this: Option<Value>, is_var_scope: bool) -> ScopeId {
        self.push(Scope {
            kind: ScopeKind::Declarative(HashMap::new()),
            parent: Some(parent),
            this,
            is_var_scope,
        })
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    /// Declare or overwrite `name` in a declarative scope. No-op for the global scope.
    pub fn bind(&mut self, id: ScopeId, name: &str, value: Value) {
        if let ScopeKind::Declarative(vars) = &mut self.get_mut(id).kind {
            vars.insert(name.to_string(), value);
        }
    }

    /// Nearest scope (starting at `id`) that receives `var` declarations.
    pub fn var_scope(&self, mut id: ScopeId) -> ScopeId {
        loop {
            let scope = self.get(id);
            match scope.parent {
                Some(parent) if !scope.is_var_scope => id = parent,
                _ => return id,
            }
        }
    }

    /// `this` visible from `id`.
    pub fn this_value(&self, mut id: ScopeId) -> Value {
        loop {
            let scope = self.get(id);
            if let Some(this) = &scope.this {
                return this.clone();
            }
            match scope.parent {
                Some(parent) => id = parent,
                None => return Value::Undefined,
            }
        }
    }

    /// Number of scopes allocated so far.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_scope_skips_catch_scopes() {
        let mut scopes = Scopes::new(Value::Null);
        let function = scopes.declarative(Scopes::GLOBAL, Some(Value::Undefined), true);
        let catch = scopes.declarative(function, None, false);
        assert_eq!(scopes.var_scope(catch), function);
        assert_eq!(scopes.var_scope(Scopes::GLOBAL), Scopes::GLOBAL);
    }

    #[test]
    fn test_this_inherits_through_catch_scope() {
        let mut scopes = Scopes::new(Value::Null);
        let function = scopes.declarative(Scopes::GLOBAL, Some(Value::Bool(true)), true);
        let catch = scopes.declarative(function, None, false);
        assert_eq!(scopes.this_value(catch), Value::Bool(true));
        assert_eq!(scopes.this_value(Scopes::GLOBAL), Value::Null);
    }
}
