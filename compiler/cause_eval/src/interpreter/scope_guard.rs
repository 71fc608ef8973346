//! RAII guards for interpreter state.
//!
//! [`ScopedInterpreter`] pops the environment scope it pushed when dropped.
//! [`ContextGuard`] swaps in a whole environment plus `break`/`return`
//! targets for a closure call or handler body, and puts the previous ones
//! back when dropped. Both restore on every exit path, unwinds included.
//!
//! ```text
//! {
//!     let mut scoped = interpreter.scoped();
//!     scoped.env.define(name, value, Mutability::Immutable);
//!     scoped.eval(body)?;
//! } // scope popped here
//! ```

use std::mem;
use std::ops::{Deref, DerefMut};

use cause_ir::Name;
use cause_patterns::{FrameId, Mutability, Value};

use super::Interpreter;
use crate::Environment;

/// Guard that pops one environment scope on drop.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// Guard for a swapped-in evaluation context.
pub struct ContextGuard<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    saved_env: Option<Environment>,
    saved_loop: Option<FrameId>,
    saved_return: Option<FrameId>,
}

impl Drop for ContextGuard<'_, '_> {
    fn drop(&mut self) {
        if let Some(env) = self.saved_env.take() {
            self.interpreter.env = env;
        }
        self.interpreter.loop_target = self.saved_loop;
        self.interpreter.return_target = self.saved_return;
    }
}

impl<'interp> Deref for ContextGuard<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ContextGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope that is popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` in a new scope holding immutable `bindings`.
    pub fn with_bindings<T, F>(&mut self, bindings: Vec<(Name, Value)>, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        self.with_env_scope(|scoped| {
            for (name, value) in bindings {
                scoped.env.define(name, value, Mutability::Immutable);
            }
            f(scoped)
        })
    }

    /// Swap in `env` and the given unwind targets until the guard drops.
    pub fn enter_context(
        &mut self,
        env: Environment,
        loop_target: Option<FrameId>,
        return_target: Option<FrameId>,
    ) -> ContextGuard<'_, 'a> {
        let saved_env = mem::replace(&mut self.env, env);
        let saved_loop = mem::replace(&mut self.loop_target, loop_target);
        let saved_return = mem::replace(&mut self.return_target, return_target);
        ContextGuard {
            interpreter: self,
            saved_env: Some(saved_env),
            saved_loop,
            saved_return,
        }
    }
}
