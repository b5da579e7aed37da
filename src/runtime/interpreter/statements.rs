//! Statement execution.

use t262_syntax::ast::{ForInStmt, ForInit, ForStmt, LoopStmt, Spanned, Statement, TryStmt, VarDeclarator};

use super::{Abrupt, Completion, Eval, Interpreter};
use crate::runtime::env::ScopeId;
use crate::runtime::value::Value;

/// What a loop does after its body completes.
enum LoopControl {
    Next,
    Exit(Completion),
}

fn loop_control(completion: Completion) -> LoopControl {
    match completion {
        Completion::Normal | Completion::Continue => LoopControl::Next,
        Completion::Break => LoopControl::Exit(Completion::Normal),
        ret @ Completion::Return(_) => LoopControl::Exit(ret),
    }
}

impl Interpreter {
    pub(crate) fn exec_block(&mut self, body: &[Spanned<Statement>], scope: ScopeId) -> Eval<Completion> {
        for stmt in body {
            match self.exec(stmt, scope)? {
                Completion::Normal => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal)
    }

    pub(crate) fn exec(&mut self, stmt: &Spanned<Statement>, scope: ScopeId) -> Eval<Completion> {
        self.tick()?;
        match &stmt.node {
            Statement::Var(declarators) => {
                self.exec_var(declarators, scope)?;
                Ok(Completion::Normal)
            }
            // Instantiated during hoisting.
            Statement::Function(_) | Statement::Empty => Ok(Completion::Normal),
            Statement::Expr(expr) => {
                self.eval(expr, scope)?;
                Ok(Completion::Normal)
            }
            Statement::Block(body) => self.exec_block(body, scope),
            Statement::If(stmt) => {
                if self.eval(&stmt.condition, scope)?.to_boolean() {
                    self.exec(&stmt.then_branch, scope)
                } else if let Some(else_branch) = &stmt.else_branch {
                    self.exec(else_branch, scope)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Statement::While(stmt) => self.exec_while(stmt, scope),
            Statement::DoWhile(stmt) => self.exec_do_while(stmt, scope),
            Statement::For(stmt) => self.exec_for(stmt, scope),
            Statement::ForIn(stmt) => self.exec_for_in(stmt, scope),
            Statement::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Statement::Break => Ok(Completion::Break),
            Statement::Continue => Ok(Completion::Continue),
            Statement::Throw(expr) => {
                let value = self.eval(expr, scope)?;
                Err(Abrupt::Throw(value))
            }
            Statement::Try(stmt) => self.exec_try(stmt, scope),
        }
    }

    fn exec_var(&mut self, declarators: &[VarDeclarator], scope: ScopeId) -> Eval<()> {
        for declarator in declarators {
            if let Some(init) = &declarator.init {
                let value = self.eval(init, scope)?;
                let found = self.resolve(&declarator.name, scope);
                self.write_binding(found, &declarator.name, value)?;
            }
        }
        Ok(())
    }

    fn exec_while(&mut self, stmt: &LoopStmt, scope: ScopeId) -> Eval<Completion> {
        while self.eval(&stmt.condition, scope)?.to_boolean() {
            if let LoopControl::Exit(completion) = loop_control(self.exec(&stmt.body, scope)?) {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_do_while(&mut self, stmt: &LoopStmt, scope: ScopeId) -> Eval<Completion> {
        loop {
            if let LoopControl::Exit(completion) = loop_control(self.exec(&stmt.body, scope)?) {
                return Ok(completion);
            }
            if !self.eval(&stmt.condition, scope)?.to_boolean() {
                return Ok(Completion::Normal);
            }
        }
    }

    fn exec_for(&mut self, stmt: &ForStmt, scope: ScopeId) -> Eval<Completion> {
        match &stmt.init {
            Some(ForInit::Var(declarators)) => self.exec_var(declarators, scope)?,
            Some(ForInit::Expr(expr)) => {
                self.eval(expr, scope)?;
            }
            None => {}
        }
        loop {
            if let Some(condition) = &stmt.condition {
                if !self.eval(condition, scope)?.to_boolean() {
                    return Ok(Completion::Normal);
                }
            }
            if let LoopControl::Exit(completion) = loop_control(self.exec(&stmt.body, scope)?) {
                return Ok(completion);
            }
            if let Some(update) = &stmt.update {
                self.eval(update, scope)?;
            }
        }
    }

    /// `for (k in o)`: the key list is taken up front; keys deleted before their turn are skipped.
    fn exec_for_in(&mut self, stmt: &ForInStmt, scope: ScopeId) -> Eval<Completion> {
        let subject = self.eval(&stmt.object, scope)?;
        if subject.is_nullish() {
            return Ok(Completion::Normal);
        }
        let object = self.to_object(&subject)?;
        for key in self.realm.for_in_keys(object) {
            if !self.realm.has_property(object, &key) {
                continue;
            }
            self.tick()?;
            let found = self.resolve(&stmt.name, scope);
            self.write_binding(found, &stmt.name, Value::String(key))?;
            if let LoopControl::Exit(completion) = loop_control(self.exec(&stmt.body, scope)?) {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_try(&mut self, stmt: &TryStmt, scope: ScopeId) -> Eval<Completion> {
        let mut result = self.exec_block(&stmt.block, scope);

        if let Some(handler) = &stmt.handler {
            if let Err(Abrupt::Throw(thrown)) = &result {
                let thrown = thrown.clone();
                let catch_scope = self.scopes.declarative(scope, None, false);
                self.scopes.bind(catch_scope, &handler.param, thrown);
                result = self.exec_block(&handler.body, catch_scope);
            }
        }

        let Some(finalizer) = &stmt.finalizer else {
            return result;
        };
        if let Err(Abrupt::Halt(_)) = result {
            return result;
        }
        match self.exec_block(finalizer, scope)? {
            Completion::Normal => result,
            overriding => Ok(overriding),
        }
    }
}
