use crate::{ExprId, Name, Span, TypeRefId};

use super::Param;

/// Declaration node, at module level or inside a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Import(ImportDecl),
    Function(FunctionDecl),
    NamedValue(NamedValueDecl),
    Object(ObjectDecl),
    Signal(SignalDecl),
    Option(OptionDecl),
}

impl DeclKind {
    /// The declared name. Imports declare several names and return `None`.
    pub fn name(&self) -> Option<Name> {
        match self {
            DeclKind::Import(_) => None,
            DeclKind::Function(d) => Some(d.name),
            DeclKind::NamedValue(d) => Some(d.name),
            DeclKind::Object(d) => Some(d.name),
            DeclKind::Signal(d) => Some(d.name),
            DeclKind::Option(d) => Some(d.name),
        }
    }

    /// Declarations that are bound before the rest of their block runs.
    pub fn is_hoisted(&self) -> bool {
        !matches!(self, DeclKind::NamedValue(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub mappings: Vec<ImportMapping>,
}

/// `name` or `name as alias`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImportMapping {
    pub name: Name,
    pub alias: Option<Name>,
    pub span: Span,
}

impl ImportMapping {
    /// The name bound in the importing scope.
    pub fn local_name(&self) -> Name {
        self.alias.unwrap_or(self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: Name,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRefId>,
    pub body: ExprId,
}

/// `let [variable] name[: Type] = init`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedValueDecl {
    pub name: Name,
    pub mutable: bool,
    pub declared_type: Option<TypeRefId>,
    pub init: ExprId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: Name,
    pub ty: TypeRefId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectDecl {
    pub name: Name,
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalDecl {
    pub name: Name,
    pub fields: Vec<Field>,
    /// Resume-value type; `Action` when absent.
    pub result: Option<TypeRefId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: Name,
    pub members: Vec<TypeRefId>,
}
