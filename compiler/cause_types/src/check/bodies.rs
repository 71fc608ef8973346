//! Expression and statement checking.
//!
//! Walks every body once, tracking loop and function nesting, and computes a
//! best-effort static type per expression (`None` when unknown) for the
//! call-site and `let` compatibility checks.

use cause_ir::ast::{
    BranchExpr, BranchOptionKind, DeclKind, ExprKind, Param, Stmt, StmtKind,
};
use cause_ir::{DeclId, ExprId, Name, Span};
use cause_stack::ensure_sufficient_stack;

use super::{ModuleChecker, ValueInfo, ValueKind};
use crate::{ResolvedType, TypeError};

impl ModuleChecker<'_> {
    /// Check a module's top-level declarations as one scope.
    pub(super) fn check_module_scope(&mut self, declarations: &[DeclId]) {
        self.push_scope();
        self.check_declarations(
            declarations.iter().copied().map(Item::Decl),
            FunctionBodies::AfterScope,
        );
        self.pop_scope();
    }

    /// Shared by module scope and blocks. Returns the static type of the
    /// last expression statement, `Action` for an empty sequence.
    fn check_declarations<'s>(
        &mut self,
        items: impl Iterator<Item = Item<'s>>,
        bodies: FunctionBodies,
    ) -> Option<ResolvedType> {
        let arena = self.arena;
        let items: Vec<Item<'s>> = items.collect();

        let hoisted: Vec<DeclId> = items
            .iter()
            .filter_map(|item| match item {
                Item::Decl(id) if arena.decl(*id).kind.is_hoisted() => Some(*id),
                _ => None,
            })
            .collect();
        self.register_hoisted(&hoisted);

        let mut deferred = Vec::new();
        let mut last = Some(ResolvedType::ACTION);
        for item in &items {
            last = Some(ResolvedType::ACTION);
            match item {
                Item::Decl(id) => match &arena.decl(*id).kind {
                    DeclKind::NamedValue(_) => self.check_named_value(*id),
                    DeclKind::Function(function) => match bodies {
                        FunctionBodies::AfterScope => deferred.push(*id),
                        FunctionBodies::InPlace => {
                            self.check_function_body(&function.params, function.body);
                        }
                    },
                    _ => {}
                },
                Item::Stmt(stmt) => last = self.check_stmt(stmt),
            }
        }

        for id in deferred {
            if let DeclKind::Function(function) = &arena.decl(id).kind {
                self.check_function_body(&function.params, function.body);
            }
        }
        last
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Option<ResolvedType> {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.check_expr(*expr),
            // Declarations are handled by `check_declarations`.
            StmtKind::Decl(_) => Some(ResolvedType::ACTION),
            StmtKind::Effect { pattern, body } => {
                self.push_scope();
                self.bind_pattern(pattern);
                self.check_expr(*body);
                self.pop_scope();
                Some(ResolvedType::ACTION)
            }
            StmtKind::Set { target, value } => {
                self.check_expr(*value);
                self.check_set_target(*target, stmt.span);
                Some(ResolvedType::ACTION)
            }
        }
    }

    fn check_set_target(&mut self, target: Name, span: Span) {
        match self.lookup_value(target).map(|info| info.kind) {
            None => self.errors.push(TypeError::UnknownName { name: target, span }),
            Some(ValueKind::Variable) => {}
            Some(_) => self.errors.push(TypeError::NotVariable { name: target, span }),
        }
    }

    fn check_named_value(&mut self, id: DeclId) {
        let arena = self.arena;
        let decl = arena.decl(id);
        let DeclKind::NamedValue(value) = &decl.kind else {
            return;
        };

        let found = self.check_expr(value.init);
        let ty = match value.declared_type {
            Some(type_ref) => {
                let expected = self.resolve_type_ref(type_ref);
                if let Some(found) = &found {
                    self.check_assignable(&expected, found, arena.expr(value.init).span);
                }
                Some(expected)
            }
            None => found,
        };

        self.declare_name(value.name, decl.span);
        self.define_value(
            value.name,
            ValueInfo {
                kind: if value.mutable {
                    ValueKind::Variable
                } else {
                    ValueKind::Constant
                },
                ty,
            },
        );
    }

    /// Report when a value of static type `found` cannot be stored where
    /// `expected` is declared.
    fn check_assignable(&mut self, expected: &ResolvedType, found: &ResolvedType, span: Span) {
        if self.table.accepts(expected, found) {
            return;
        }
        let error = match (expected, found) {
            (ResolvedType::Function(_), _) | (_, ResolvedType::Function(_)) => {
                TypeError::IncompatibleFunctionType {
                    expected: expected.clone(),
                    found: found.clone(),
                    span,
                }
            }
            _ => TypeError::DeclaredTypeMismatch {
                expected: expected.clone(),
                found: found.clone(),
                span,
            },
        };
        self.errors.push(error);
    }

    fn check_function_body(&mut self, params: &[Param], body: ExprId) {
        self.push_scope();
        for param in params {
            self.declare_name(param.name, param.span);
            let ty = param.ty.and_then(|t| self.table.resolved(t).cloned());
            self.define_value(
                param.name,
                ValueInfo {
                    kind: ValueKind::Constant,
                    ty,
                },
            );
        }

        let saved_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        self.check_expr(body);
        self.function_depth -= 1;
        self.loop_depth = saved_loops;
        self.pop_scope();
    }

    fn check_expr(&mut self, id: ExprId) -> Option<ResolvedType> {
        ensure_sufficient_stack(|| self.check_expr_inner(id))
    }

    fn check_expr_inner(&mut self, id: ExprId) -> Option<ResolvedType> {
        let arena = self.arena;
        let expr = arena.expr(id);
        match &expr.kind {
            ExprKind::Group(inner) => self.check_expr(*inner),
            ExprKind::Block(stmts) => {
                self.push_scope();
                let items = stmts.iter().map(|s| match s.kind {
                    StmtKind::Decl(decl) => Item::Decl(decl),
                    _ => Item::Stmt(s),
                });
                let ty = self.check_declarations(items, FunctionBodies::InPlace);
                self.pop_scope();
                ty
            }
            ExprKind::Function(function) => {
                let params = function
                    .params
                    .iter()
                    .map(|p| self.resolve_optional(p.ty))
                    .collect();
                let ret = self.resolve_optional(function.return_type);
                self.check_function_body(&function.params, function.body);
                Some(ResolvedType::function(params, ret))
            }
            ExprKind::Branch(branch) => {
                self.check_branch(branch);
                None
            }
            ExprKind::Loop(body) => {
                self.loop_depth += 1;
                self.check_expr(*body);
                self.loop_depth -= 1;
                None
            }
            ExprKind::Cause(payload) => {
                let payload_ty = self.check_expr(*payload)?;
                let signal = payload_ty.as_named().filter(|id| self.table.is_signal(*id))?;
                Some(self.table.signal_result(signal).clone())
            }
            ExprKind::Return(value) => {
                if self.function_depth == 0 {
                    self.errors.push(TypeError::ReturnOutsideFunction { span: expr.span });
                }
                if let Some(value) = value {
                    self.check_expr(*value);
                }
                None
            }
            ExprKind::Break(value) => {
                if self.loop_depth == 0 {
                    self.errors.push(TypeError::BreakOutsideLoop { span: expr.span });
                }
                if let Some(value) = value {
                    self.check_expr(*value);
                }
                None
            }
            ExprKind::String(_) => Some(ResolvedType::STRING),
            ExprKind::Number(_) => Some(ResolvedType::NUMBER),
            ExprKind::Ident(name) => match self.lookup_value(*name) {
                Some(info) => info.ty.clone(),
                None => {
                    self.errors.push(TypeError::UnknownName {
                        name: *name,
                        span: expr.span,
                    });
                    None
                }
            },
            ExprKind::Call { callee, args } => self.check_call(*callee, None, args, expr.span),
            ExprKind::Member { receiver, field } => {
                let receiver = self.check_expr(*receiver)?.as_named()?;
                self.table
                    .fields(receiver)
                    .iter()
                    .find(|f| f.name == *field)
                    .map(|f| f.ty.clone())
            }
            ExprKind::PipeCall {
                subject,
                callee,
                args,
            } => self.check_call(*callee, Some(*subject), args, expr.span),
        }
    }

    fn check_branch(&mut self, branch: &BranchExpr) {
        if let Some(subject) = branch.subject {
            self.check_expr(subject);
        }
        for option in &branch.options {
            match &option.kind {
                BranchOptionKind::If { condition, body } => {
                    self.check_expr(*condition);
                    self.check_expr(*body);
                }
                BranchOptionKind::Is { pattern, body } => {
                    if branch.subject.is_none() {
                        self.errors
                            .push(TypeError::IsArmWithoutSubject { span: option.span });
                    }
                    self.push_scope();
                    self.bind_pattern(pattern);
                    self.check_expr(*body);
                    self.pop_scope();
                }
                BranchOptionKind::Else { body } => {
                    self.check_expr(*body);
                }
            }
        }
    }

    /// Check a call or pipe call. `piped` is the left side of `>>`, passed
    /// as the first argument.
    fn check_call(
        &mut self,
        callee: ExprId,
        piped: Option<ExprId>,
        args: &[ExprId],
        span: Span,
    ) -> Option<ResolvedType> {
        let arena = self.arena;
        let mut arg_ids = Vec::with_capacity(args.len() + 1);
        arg_ids.extend(piped);
        arg_ids.extend_from_slice(args);

        let arg_types: Vec<Option<ResolvedType>> =
            arg_ids.iter().map(|a| self.check_expr(*a)).collect();
        let callee_ty = self.check_expr(callee);

        let known = match &arena.expr(callee).kind {
            ExprKind::Ident(name) => self
                .lookup_value(*name)
                .is_some_and(|info| info.kind.is_known_callable()),
            _ => false,
        };
        let sig = callee_ty.as_ref().and_then(ResolvedType::as_function)?;

        if known {
            if sig.arity() != arg_ids.len() {
                self.errors.push(TypeError::WrongArgumentCount {
                    expected: sig.arity(),
                    found: arg_ids.len(),
                    span,
                });
            }
            for ((param, arg), arg_id) in sig.params.iter().zip(&arg_types).zip(&arg_ids) {
                if let (ResolvedType::Function(_), Some(found)) = (param, arg) {
                    self.check_assignable(param, found, arena.expr(*arg_id).span);
                }
            }
        }

        Some(sig.ret.clone()).filter(|ret| !ret.is_unknown())
    }
}

/// When `function` bodies of a scope are checked.
///
/// Module bodies see every module name. Block bodies are checked where
/// they appear, like `fn` literals and handler bodies: they see the block's
/// hoisted names and the `let`s before them.
#[derive(Copy, Clone)]
enum FunctionBodies {
    AfterScope,
    InPlace,
}

/// Entry of a declaration scope: module items are declarations only, block
/// items may be any statement.
enum Item<'s> {
    Decl(DeclId),
    Stmt(&'s Stmt),
}
