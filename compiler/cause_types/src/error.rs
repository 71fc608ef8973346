//! Resolution errors.

use std::fmt::Write;

use cause_diagnostic::{Diagnostic, ErrorCode};
use cause_ir::{Name, Span, StringInterner};

use crate::{ResolvedType, TypeTable};

/// A problem found while resolving a module.
///
/// The resolver collects every error of a module before reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    UnknownType {
        name: Name,
        span: Span,
    },
    DuplicateDeclaration {
        name: Name,
        span: Span,
        previous: Span,
    },
    IncompatibleFunctionType {
        expected: ResolvedType,
        found: ResolvedType,
        span: Span,
    },
    UnknownImport {
        path: String,
        name: Name,
        span: Span,
    },
    UnknownName {
        name: Name,
        span: Span,
    },
    IsArmWithoutSubject {
        span: Span,
    },
    NotVariable {
        name: Name,
        span: Span,
    },
    BreakOutsideLoop {
        span: Span,
    },
    ReturnOutsideFunction {
        span: Span,
    },
    WrongArgumentCount {
        expected: usize,
        found: usize,
        span: Span,
    },
    DeclaredTypeMismatch {
        expected: ResolvedType,
        found: ResolvedType,
        span: Span,
    },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::UnknownType { span, .. }
            | TypeError::DuplicateDeclaration { span, .. }
            | TypeError::IncompatibleFunctionType { span, .. }
            | TypeError::UnknownImport { span, .. }
            | TypeError::UnknownName { span, .. }
            | TypeError::IsArmWithoutSubject { span }
            | TypeError::NotVariable { span, .. }
            | TypeError::BreakOutsideLoop { span }
            | TypeError::ReturnOutsideFunction { span }
            | TypeError::WrongArgumentCount { span, .. }
            | TypeError::DeclaredTypeMismatch { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TypeError::UnknownType { .. } => ErrorCode::E2001,
            TypeError::DuplicateDeclaration { .. } => ErrorCode::E2002,
            TypeError::IncompatibleFunctionType { .. } => ErrorCode::E2003,
            TypeError::UnknownImport { .. } => ErrorCode::E2004,
            TypeError::UnknownName { .. } => ErrorCode::E2005,
            TypeError::IsArmWithoutSubject { .. } => ErrorCode::E2006,
            TypeError::NotVariable { .. } => ErrorCode::E2007,
            TypeError::BreakOutsideLoop { .. } => ErrorCode::E2008,
            TypeError::ReturnOutsideFunction { .. } => ErrorCode::E2009,
            TypeError::WrongArgumentCount { .. } => ErrorCode::E2010,
            TypeError::DeclaredTypeMismatch { .. } => ErrorCode::E2011,
        }
    }

    /// Human-readable message. Types are rendered through `table`.
    pub fn message(&self, table: &TypeTable, interner: &StringInterner) -> String {
        let name = |n: &Name| interner.lookup(*n);
        match self {
            TypeError::UnknownType { name: n, .. } => format!("unknown type `{}`", name(n)),
            TypeError::DuplicateDeclaration { name: n, .. } => {
                format!("`{}` is declared more than once in this scope", name(n))
            }
            TypeError::IncompatibleFunctionType {
                expected, found, ..
            } => format!(
                "incompatible function type: expected `{}`, found `{}`",
                table.display(expected, interner),
                table.display(found, interner)
            ),
            TypeError::UnknownImport { path, name: n, .. } => {
                format!("`{path}` does not export `{}`", name(n))
            }
            TypeError::UnknownName { name: n, .. } => {
                format!("`{}` is not in scope", name(n))
            }
            TypeError::IsArmWithoutSubject { .. } => {
                "`is` arms need a branch subject (`branch with value`)".to_owned()
            }
            TypeError::NotVariable { name: n, .. } => {
                format!("cannot `set` `{}`: not declared with `let variable`", name(n))
            }
            TypeError::BreakOutsideLoop { .. } => "`break` outside of a loop".to_owned(),
            TypeError::ReturnOutsideFunction { .. } => {
                "`return` outside of a function".to_owned()
            }
            TypeError::WrongArgumentCount {
                expected, found, ..
            } => {
                let mut msg = format!("expected {expected} argument");
                if *expected != 1 {
                    msg.push('s');
                }
                let _ = write!(msg, ", found {found}");
                msg
            }
            TypeError::DeclaredTypeMismatch {
                expected, found, ..
            } => format!(
                "declared type `{}` does not accept `{}`",
                table.display(expected, interner),
                table.display(found, interner)
            ),
        }
    }

    pub fn to_diagnostic(&self, table: &TypeTable, interner: &StringInterner) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.message(table, interner))
            .with_label(self.span(), "");
        match self {
            TypeError::DuplicateDeclaration { previous, .. } => {
                diag.with_secondary_label(*previous, "first declared here")
            }
            TypeError::IncompatibleFunctionType { .. } => diag.with_note(
                "function types must have the same arity and pairwise compatible parameter and return types",
            ),
            _ => diag,
        }
    }
}
