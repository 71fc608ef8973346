//! Core data structures of the Cause language front half.
//!
//! - [`Name`] and [`StringInterner`]: interned identifiers
//! - [`Span`]: byte ranges into the source file
//! - [`parse_tree`]: the tree handed over by the external parser
//! - [`ast`] and [`ExprArena`]: the immutable arena AST
//! - [`lower`]: the AST builder

mod arena;
pub mod ast;
mod ids;
mod interner;
mod lower;
mod name;
pub mod parse_tree;
mod span;

pub use arena::ExprArena;
pub use ids::{DeclId, ExprId, TypeRefId};
pub use interner::{InternError, StringInterner};
pub use lower::{lower, BuildError};
pub use name::Name;
pub use span::Span;
