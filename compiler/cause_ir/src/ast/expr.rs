use crate::{DeclId, ExprId, Name, Span, TypeRefId};

use super::Pattern;

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression kinds.
///
/// Suffix chains from the parse tree are folded into nested `Call`,
/// `Member` and `PipeCall` nodes, innermost first.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Parenthesized expression.
    Group(ExprId),
    Block(Vec<Stmt>),
    /// `fn(params): Ret body`
    Function(FunctionExpr),
    Branch(BranchExpr),
    Loop(ExprId),
    Cause(ExprId),
    Return(Option<ExprId>),
    /// `break [with value]`
    Break(Option<ExprId>),
    /// Decoded string literal.
    String(Name),
    Number(f64),
    Ident(Name),
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Member {
        receiver: ExprId,
        field: Name,
    },
    /// `subject >> callee(args)`, called as `callee(subject, args)`.
    PipeCall {
        subject: ExprId,
        callee: ExprId,
        args: Vec<ExprId>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub ty: Option<TypeRefId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionExpr {
    pub params: Vec<Param>,
    pub return_type: Option<TypeRefId>,
    pub body: ExprId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchExpr {
    /// `branch with subject`
    pub subject: Option<ExprId>,
    pub options: Vec<BranchOption>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchOption {
    pub kind: BranchOptionKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BranchOptionKind {
    If { condition: ExprId, body: ExprId },
    Is { pattern: Pattern, body: ExprId },
    Else { body: ExprId },
}

impl BranchOptionKind {
    pub fn body(&self) -> ExprId {
        match self {
            BranchOptionKind::If { body, .. }
            | BranchOptionKind::Is { body, .. }
            | BranchOptionKind::Else { body } => *body,
        }
    }
}

/// Statement inside a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Expr(ExprId),
    /// Local declaration.
    Decl(DeclId),
    /// `effect for pattern body`, active for the rest of the block.
    Effect { pattern: Pattern, body: ExprId },
    /// `set name = value`
    Set { target: Name, value: ExprId },
}
