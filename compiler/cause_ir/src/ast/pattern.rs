use crate::{Name, Span, TypeRefId};

/// Pattern used by `is` arms and `effect for` handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatternKind {
    /// `Type as name`: type test, then bind the value.
    CaptureValue { ty: TypeRefId, binding: Name },
    /// `Type`: type test only.
    TypeReferenceOnly { ty: TypeRefId },
}

impl Pattern {
    pub fn ty(&self) -> TypeRefId {
        match self.kind {
            PatternKind::CaptureValue { ty, .. } | PatternKind::TypeReferenceOnly { ty } => ty,
        }
    }

    pub fn binding(&self) -> Option<Name> {
        match self.kind {
            PatternKind::CaptureValue { binding, .. } => Some(binding),
            PatternKind::TypeReferenceOnly { .. } => None,
        }
    }
}

/// A written type, e.g. `Number` or `Function(String, Number): Action`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRefKind {
    Identifier(Name),
    Function {
        params: Vec<TypeRefId>,
        return_type: TypeRefId,
    },
}
