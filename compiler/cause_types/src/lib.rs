//! Type resolution for Cause modules.
//!
//! [`resolve`] walks a lowered module once and produces:
//! - a [`TypeTable`] with the builtins, every declared object, signal and
//!   option, every function signature, and the resolution of every type
//!   reference occurrence (keyed by [`TypeRefId`](cause_ir::TypeRefId));
//! - the list of [`TypeError`]s, all of them, not just the first.
//!
//! Function types are structural; everything else is nominal. See
//! [`TypeTable::accepts`] for the compatibility rule.

mod builtins;
mod check;
mod error;
mod imports;
mod table;
mod ty;

pub use builtins::BUILTIN_TYPE_NAMES;
pub use check::resolve;
pub use error::TypeError;
pub use imports::{ImportProvider, NoImports};
pub use table::{FieldDef, TypeDef, TypeKind, TypeTable};
pub use ty::{FunctionType, ResolvedType, TypeId};
