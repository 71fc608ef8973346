//! Flat storage for AST nodes.

use crate::ast::{Decl, Expr, TypeRef};
use crate::{DeclId, ExprId, TypeRefId};

/// Owner of every expression, declaration and type reference of a module.
#[derive(Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    decls: Vec<Decl>,
    type_refs: Vec<TypeRef>,
}

#[inline]
fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("arena exceeded {} nodes", u32::MAX))
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::new(next_index(self.decls.len()));
        self.decls.push(decl);
        id
    }

    pub fn alloc_type_ref(&mut self, type_ref: TypeRef) -> TypeRefId {
        let id = TypeRefId::new(next_index(self.type_refs.len()));
        self.type_refs.push(type_ref);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn type_ref(&self, id: TypeRefId) -> &TypeRef {
        &self.type_refs[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Number of type reference occurrences; resolver side tables are sized
    /// from this.
    pub fn type_ref_count(&self) -> usize {
        self.type_refs.len()
    }
}
