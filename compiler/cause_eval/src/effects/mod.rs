//! Effect engine: the handler stack, `effect for` and `cause`.
//!
//! An `effect for` statement pushes a [`HandlerFrame`] for the rest of its
//! block. `cause` scans the stack innermost first and runs the body of the
//! first frame whose pattern matches. While that body runs, the matched
//! frame and every frame above it are hidden, so a `cause` inside the body
//! goes to outer handlers. The body's value is the value of the `cause`
//! expression.
//!
//! Both the installed frame and the hidden frames are restored by guards,
//! whatever way evaluation leaves them.

use std::ops::{Deref, DerefMut};

use cause_ir::ast::Pattern;
use cause_ir::ExprId;
use cause_patterns::{
    match_pattern, not_causable, unhandled_signal, Bindings, EvalResult, FrameId, LocalScope,
    Mutability, Scope, Value,
};
use cause_types::{ResolvedType, TypeId, TypeTable};

use crate::host_handler::HostSignal;
use crate::interpreter::Interpreter;

/// An installed `effect for` handler.
#[derive(Clone, Debug)]
pub struct HandlerFrame {
    pub pattern: Pattern,
    pub body: ExprId,
    /// Scope the `effect for` statement ran in.
    pub env: LocalScope<Scope>,
    /// `break` target where the handler was installed.
    pub loop_target: Option<FrameId>,
    /// `return` target where the handler was installed.
    pub return_target: Option<FrameId>,
}

/// Installed handlers, innermost last.
#[derive(Debug, Default)]
pub struct HandlerStack {
    frames: Vec<HandlerFrame>,
}

impl HandlerStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self, frame: HandlerFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<HandlerFrame> {
        self.frames.pop()
    }

    /// Innermost frame whose pattern matches `signal`, with its bindings.
    pub fn find_match(&self, signal: &Value, table: &TypeTable) -> Option<(usize, Bindings)> {
        self.frames
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, frame)| {
                match_pattern(&frame.pattern, signal, table).map(|bindings| (index, bindings))
            })
    }

    /// Remove the frames from `index` up. Put them back with [`restore`].
    ///
    /// [`restore`]: HandlerStack::restore
    pub fn split_off(&mut self, index: usize) -> Vec<HandlerFrame> {
        self.frames.split_off(index)
    }

    pub fn restore(&mut self, frames: Vec<HandlerFrame>) {
        self.frames.extend(frames);
    }
}

/// Pops the frame it installed.
struct InstalledHandler<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for InstalledHandler<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.handlers.pop();
        tracing::trace!(depth = self.interpreter.handlers.len(), "handler removed");
    }
}

/// Puts hidden frames back on the stack.
struct HiddenHandlers<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    frames: Vec<HandlerFrame>,
}

impl Drop for HiddenHandlers<'_, '_> {
    fn drop(&mut self) {
        let frames = std::mem::take(&mut self.frames);
        self.interpreter.handlers.restore(frames);
    }
}

impl<'interp> Deref for HiddenHandlers<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for HiddenHandlers<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Run `f` with `frame` installed, removing it afterwards on every path.
    pub(crate) fn with_handler<T, F>(&mut self, frame: HandlerFrame, f: F) -> T
    where
        F: FnOnce(&mut Interpreter<'a>) -> T,
    {
        self.handlers.push(frame);
        tracing::trace!(depth = self.handlers.len(), "handler installed");
        let guard = InstalledHandler { interpreter: self };
        f(&mut *guard.interpreter)
    }

    /// Raise `signal` and return the value it resumes with.
    pub(crate) fn raise_cause(&mut self, signal: Value) -> EvalResult {
        let type_id = match signal.type_id() {
            Some(id) if signal.is_signal() => id,
            _ => return Err(not_causable(&signal.type_name(self.types, self.interner)).into()),
        };
        let name = self.interner.lookup(self.types.get(type_id).name);
        match self.handlers.find_match(&signal, self.types) {
            Some((index, bindings)) => {
                tracing::trace!(signal = name, frame = index, "cause handled");
                let value = self.run_handler(index, bindings)?;
                self.resume_value(type_id, value)
            }
            None => self.unhandled(type_id, signal),
        }
    }

    /// Evaluate the body of frame `index` with that frame and the ones
    /// above it hidden.
    fn run_handler(&mut self, index: usize, bindings: Bindings) -> EvalResult {
        let frames = self.handlers.split_off(index);
        let mut hidden = HiddenHandlers {
            interpreter: self,
            frames,
        };
        let Some(frame) = hidden.frames.first() else {
            return Ok(Value::Action);
        };
        let body = frame.body;
        let (loop_target, return_target) = (frame.loop_target, frame.return_target);
        let env = hidden.env.child_of(frame.env.clone());

        let mut handler = hidden.enter_context(env, loop_target, return_target);
        for (name, value) in bindings {
            handler.env.define(name, value, Mutability::Immutable);
        }
        handler.eval(body)
    }

    /// Check a handler's answer against the signal's declared result.
    fn resume_value(&self, signal: TypeId, value: Value) -> EvalResult {
        let expected = self.types.signal_result(signal);
        if *expected == ResolvedType::ACTION {
            return Ok(Value::Action);
        }
        self.check_value(&value, expected)?;
        Ok(value)
    }

    /// No frame matched: offer the signal to the host, which may resume
    /// it or take a `Debug`. Fail otherwise.
    fn unhandled(&mut self, type_id: TypeId, signal: Value) -> EvalResult {
        let name = self.interner.lookup(self.types.get(type_id).name);
        if let Some(host) = &self.host {
            let answer = host.answer(&HostSignal {
                name,
                value: &signal,
            });
            if let Some(value) = answer {
                tracing::trace!(signal = name, "cause answered by host");
                self.host_ticks += 1;
                return self.resume_value(type_id, value);
            }
            if type_id == TypeId::DEBUG {
                let line = signal
                    .instance()
                    .and_then(|inst| inst.field(self.names.value))
                    .map(|value| self.display(value))
                    .unwrap_or_default();
                host.debug(&line);
                self.host_ticks += 1;
                return Ok(Value::Action);
            }
        }
        tracing::debug!(signal = name, "unhandled cause");
        Err(unhandled_signal(name, signal).into())
    }
}
