//! Environment for variable scoping in the interpreter.
//!
//! A stack of scopes for the running function body. Each call gets its own
//! stack whose base scope has the closure's captured scope as parent, so
//! lookups fall through to the defining scopes and then the module.

use cause_ir::Name;
use cause_patterns::{AssignError, LocalScope, Mutability, Scope, Value};

pub struct Environment {
    /// Scopes of the running body, innermost last.
    scopes: Vec<LocalScope<Scope>>,
    /// Builtins; the root of every chain.
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the innermost scope. The base scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Innermost scope, shared. Closures and handler frames capture this.
    #[inline]
    pub fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value, mutability);
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .assign(name, value)
    }

    /// Define an immutable builtin.
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global
            .borrow_mut()
            .define(name, value, Mutability::Immutable);
    }

    /// Fresh environment for running code that was captured in `base`: a
    /// closure body or a handler body.
    #[must_use]
    pub fn child_of(&self, base: LocalScope<Scope>) -> Self {
        Environment {
            scopes: vec![LocalScope::new(Scope::with_parent(base))],
            global: self.global.clone(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
