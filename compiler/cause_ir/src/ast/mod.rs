//! Arena AST.
//!
//! Produced once by [`lower`](crate::lower) and immutable afterwards. Every
//! node carries the [`Span`](crate::Span) of the parse-tree node it came from.

mod decl;
mod expr;
mod pattern;

pub use decl::{Decl, DeclKind, Field, FunctionDecl, ImportDecl, ImportMapping, NamedValueDecl,
    ObjectDecl, OptionDecl, SignalDecl};
pub use expr::{BranchExpr, BranchOption, BranchOptionKind, Expr, ExprKind, FunctionExpr, Param,
    Stmt, StmtKind};
pub use pattern::{Pattern, PatternKind, TypeRef, TypeRefKind};

use crate::{DeclId, ExprArena};

/// One source file after lowering.
#[derive(Debug)]
pub struct Module {
    /// Opaque module path, as given by the parse tree.
    pub path: String,
    /// Top-level declarations in source order.
    pub declarations: Vec<DeclId>,
    pub arena: ExprArena,
}
