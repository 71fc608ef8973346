//! Tree-walking interpreter for Cause.
//!
//! # Architecture
//!
//! All evaluation goes through [`Interpreter::eval`]. Helpers are split by
//! concern:
//!
//! - `declarations` - hoisting and binding of declarations
//! - `function_call` - closures, natives and constructors
//! - `scope_guard` - RAII guards for scopes and call contexts
//! - `crate::effects` - handler stack, `effect for` and `cause`
//!
//! # Unwinding
//!
//! `return` and `break` travel as [`ControlAction`] values tagged with the
//! [`FrameId`] of the function or loop activation they target. The targets in
//! effect are part of the interpreter state, saved and restored with the
//! environment on every call and handler entry, so a `break` in a handler
//! body leaves the loop that enclosed the `effect for` statement.

mod builder;
mod declarations;
mod function_call;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::{ContextGuard, ScopedInterpreter};

use cause_ir::ast::{BranchExpr, BranchOptionKind, ExprKind, FunctionExpr, Module, Stmt, StmtKind};
use cause_ir::{ExprArena, ExprId, Name, Span, StringInterner};
use cause_patterns::{
    escaped_control_flow, immutable_binding, match_pattern, no_such_field, runaway_loop,
    type_mismatch, unbound_name, AssignError, ControlAction, EvalError, EvalResult, FrameId,
    FunctionValue, Value,
};
use cause_stack::ensure_sufficient_stack;
use cause_types::TypeTable;

use crate::diagnostics::CallStack;
use crate::effects::{HandlerFrame, HandlerStack};
use crate::eval_mode::{EvalConfig, EvalMode};
use crate::host_handler::SharedHostHandler;
use crate::library::CoreLibrary;
use crate::Environment;

/// Names the interpreter needs on hot paths, interned once.
#[derive(Clone, Copy)]
pub(crate) struct CoreNames {
    /// Field of the `Debug` signal.
    pub(crate) value: Name,
    /// Call frame name of `fn` literals.
    pub(crate) anonymous: Name,
}

impl CoreNames {
    fn new(interner: &StringInterner) -> Self {
        Self {
            value: interner.intern("value"),
            anonymous: interner.intern("<fn>"),
        }
    }
}

/// Tree-walking interpreter over one lowered and resolved module.
///
/// All state is per instance: independent interpreters never share
/// handler stacks or environments.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a ExprArena,
    /// Read-only after resolution.
    pub(crate) types: &'a TypeTable,
    pub(crate) env: Environment,
    pub(crate) handlers: HandlerStack,
    pub(crate) call_stack: CallStack,
    pub(crate) mode: EvalMode,
    pub(crate) config: EvalConfig,
    /// Outermost handler; `None` leaves every unmatched cause unhandled.
    pub(crate) host: Option<SharedHostHandler>,
    pub(crate) library: CoreLibrary,
    pub(crate) names: CoreNames,
    next_frame: u32,
    /// Innermost loop activation, target of `break`.
    pub(crate) loop_target: Option<FrameId>,
    /// Innermost function activation, target of `return`.
    pub(crate) return_target: Option<FrameId>,
    /// Answers given by the host so far. A change restarts the iteration
    /// count of every running loop.
    pub(crate) host_ticks: u64,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with the default mode and no host handler.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena, types: &'a TypeTable) -> Self {
        InterpreterBuilder::new(interner, arena, types).build()
    }

    pub fn builder(
        interner: &'a StringInterner,
        arena: &'a ExprArena,
        types: &'a TypeTable,
    ) -> InterpreterBuilder<'a> {
        InterpreterBuilder::new(interner, arena, types)
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        self.interner
    }

    #[inline]
    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    #[inline]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Number of installed `effect for` frames.
    pub fn handler_depth(&self) -> usize {
        self.handlers.len()
    }

    /// Number of active calls.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Bind the module's declarations in its scope: types, functions and
    /// imports first, then `let` values in order.
    ///
    /// `module` must be the module whose arena this interpreter was built on.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %module.path))]
    pub fn load_module(&mut self, module: &Module) -> Result<(), EvalError> {
        debug_assert!(std::ptr::eq(&module.arena, self.arena));
        self.bind_declarations(&module.declarations)
            .map_err(ControlAction::into_eval_error)
    }

    /// Call a module-level function by name.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let callee = self
            .env
            .lookup(self.interner.intern(name))
            .ok_or_else(|| unbound_name(name))?;
        let result = self
            .call_value(&callee, args, Span::DUMMY)
            .map_err(ControlAction::into_eval_error);
        debug_assert_eq!(self.handlers.len(), 0, "handler frames leaked");
        debug_assert!(self.call_stack.is_empty(), "call frames leaked");
        result
    }

    /// Look up a binding visible at module level.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.lookup(self.interner.intern(name))
    }

    /// Render a value the way `Debug` output shows it.
    pub fn display(&self, value: &Value) -> String {
        value.display(self.types, self.interner)
    }

    pub(crate) fn fresh_frame(&mut self) -> FrameId {
        let id = FrameId::new(self.next_frame);
        self.next_frame = self.next_frame.wrapping_add(1);
        id
    }

    /// Evaluate an expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let arena = self.arena;
        let expr = arena.expr(id);
        let result: EvalResult = match &expr.kind {
            ExprKind::Group(inner) => self.eval(*inner),
            ExprKind::Block(stmts) => self.eval_block(stmts),
            ExprKind::Function(function) => Ok(self.closure(function)),
            ExprKind::Branch(branch) => self.eval_branch(branch),
            ExprKind::Loop(body) => self.eval_loop(*body),
            ExprKind::Cause(payload) => {
                let signal = self.eval(*payload)?;
                self.raise_cause(signal)
            }
            ExprKind::Return(value) => {
                let value = self.eval_optional(*value)?;
                let target = self.return_target.ok_or_else(escaped_control_flow)?;
                Err(ControlAction::Return { target, value })
            }
            ExprKind::Break(value) => {
                let value = self.eval_optional(*value)?;
                let target = self.loop_target.ok_or_else(escaped_control_flow)?;
                Err(ControlAction::Break { target, value })
            }
            ExprKind::String(text) => Ok(Value::string(self.interner.lookup(*text))),
            ExprKind::Number(n) => Ok(Value::number(*n)),
            ExprKind::Ident(name) => self
                .env
                .lookup(*name)
                .ok_or_else(|| unbound_name(self.interner.lookup(*name)).into()),
            ExprKind::Call { callee, args } => {
                let callee = self.eval(*callee)?;
                let args = self.eval_args(None, args)?;
                self.call_value(&callee, args, expr.span)
            }
            ExprKind::Member { receiver, field } => {
                let receiver = self.eval(*receiver)?;
                self.member(&receiver, *field)
            }
            ExprKind::PipeCall {
                subject,
                callee,
                args,
            } => {
                let subject = self.eval(*subject)?;
                let callee = self.eval(*callee)?;
                let args = self.eval_args(Some(subject), args)?;
                self.call_value(&callee, args, expr.span)
            }
        };
        result.map_err(|action| action.with_span_if_error(expr.span))
    }

    fn eval_optional(&mut self, id: Option<ExprId>) -> EvalResult {
        match id {
            Some(id) => self.eval(id),
            None => Ok(Value::Action),
        }
    }

    /// Arguments left to right, after an optional piped-in first argument.
    fn eval_args(&mut self, first: Option<Value>, args: &[ExprId]) -> Result<Vec<Value>, ControlAction> {
        let mut values = Vec::with_capacity(args.len() + usize::from(first.is_some()));
        values.extend(first);
        for arg in args {
            values.push(self.eval(*arg)?);
        }
        Ok(values)
    }

    /// `fn` literal capturing the current scope.
    fn closure(&self, function: &FunctionExpr) -> Value {
        Value::function(FunctionValue {
            name: None,
            params: function.params.clone(),
            return_type: function.return_type,
            body: function.body,
            captured: self.env.current_scope(),
        })
    }

    fn member(&self, receiver: &Value, field: Name) -> EvalResult {
        receiver
            .instance()
            .and_then(|inst| inst.field(field))
            .cloned()
            .ok_or_else(|| {
                no_such_field(
                    self.interner.lookup(field),
                    &receiver.type_name(self.types, self.interner),
                )
                .into()
            })
    }

    /// Block in its own scope.
    fn eval_block(&mut self, stmts: &[Stmt]) -> EvalResult {
        let mut scoped = self.scoped();
        scoped.exec_block(stmts)
    }

    /// Hoist, then run the statements. The value is that of the last
    /// statement when it is an expression, `Action` otherwise.
    fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult {
        let arena = self.arena;
        for stmt in stmts {
            if let StmtKind::Decl(decl) = stmt.kind {
                if arena.decl(decl).kind.is_hoisted() {
                    self.bind_hoisted(decl)?;
                }
            }
        }
        self.run_stmts(stmts)
    }

    /// Run statements in order. An `effect for` statement installs its
    /// handler around the rest of the block.
    fn run_stmts(&mut self, stmts: &[Stmt]) -> EvalResult {
        let arena = self.arena;
        let mut last = Value::Action;
        for (i, stmt) in stmts.iter().enumerate() {
            last = match &stmt.kind {
                StmtKind::Expr(expr) => self.eval(*expr)?,
                StmtKind::Decl(decl) => {
                    if !arena.decl(*decl).kind.is_hoisted() {
                        self.bind_named_value(*decl)?;
                    }
                    Value::Action
                }
                StmtKind::Set { target, value } => {
                    let value = self.eval(*value)?;
                    self.set(*target, value)
                        .map_err(|e| ControlAction::from(e.with_span(stmt.span)))?;
                    Value::Action
                }
                StmtKind::Effect { pattern, body } => {
                    let frame = HandlerFrame {
                        pattern: *pattern,
                        body: *body,
                        env: self.env.current_scope(),
                        loop_target: self.loop_target,
                        return_target: self.return_target,
                    };
                    let rest = &stmts[i + 1..];
                    return self.with_handler(frame, |scope| scope.run_stmts(rest));
                }
            };
        }
        Ok(last)
    }

    fn set(&mut self, target: Name, value: Value) -> Result<(), EvalError> {
        self.env.assign(target, value).map_err(|e| {
            let name = self.interner.lookup(target);
            match e {
                AssignError::Immutable => immutable_binding(name),
                AssignError::Undefined => unbound_name(name),
            }
        })
    }

    /// Arms in order; the first that applies wins. No arm yields `Action`.
    fn eval_branch(&mut self, branch: &BranchExpr) -> EvalResult {
        let subject = match branch.subject {
            Some(subject) => Some(self.eval(subject)?),
            None => None,
        };
        for option in &branch.options {
            match &option.kind {
                BranchOptionKind::If { condition, body } => {
                    let condition = self.eval(*condition)?;
                    if self.truthy(&condition)? {
                        return self.eval(*body);
                    }
                }
                BranchOptionKind::Is { pattern, body } => {
                    let Some(subject) = &subject else {
                        return Err(EvalError::new("`is` arm in a branch without subject")
                            .with_span(option.span)
                            .into());
                    };
                    if let Some(bindings) = match_pattern(pattern, subject, self.types) {
                        let body = *body;
                        return self.with_bindings(bindings, |scoped| scoped.eval(body));
                    }
                }
                BranchOptionKind::Else { body } => return self.eval(*body),
            }
        }
        Ok(Value::Action)
    }

    fn truthy(&self, value: &Value) -> Result<bool, EvalError> {
        value
            .as_bool()
            .ok_or_else(|| type_mismatch("BinaryAnswer", &value.type_name(self.types, self.interner)))
    }

    fn eval_loop(&mut self, body: ExprId) -> EvalResult {
        let frame = self.fresh_frame();
        let saved = self.loop_target.replace(frame);
        let limit = self.config.runaway_loop_threshold;
        let mut iterations = 0usize;
        let mut ticks = self.host_ticks;
        let result = loop {
            if self.host_ticks != ticks {
                ticks = self.host_ticks;
                iterations = 0;
            }
            if limit.is_some_and(|limit| iterations >= limit) {
                break Err(runaway_loop(iterations).into());
            }
            iterations += 1;
            match self.eval(body) {
                Ok(_) => {}
                Err(ControlAction::Break { target, value }) if target == frame => break Ok(value),
                Err(other) => break Err(other),
            }
        };
        self.loop_target = saved;
        result
    }
}

#[cfg(test)]
mod tests;
