//! Pattern matching against runtime values.
//!
//! Matching is pure: it reads the value and the type table and never
//! evaluates anything.

use cause_ir::ast::Pattern;
use cause_ir::Name;
use cause_types::{ResolvedType, TypeKind, TypeTable};

use crate::Value;

/// Names bound by a successful match, in pattern order.
pub type Bindings = Vec<(Name, Value)>;

/// Bound on option nesting; options may list themselves.
const MAX_OPTION_DEPTH: usize = 64;

/// Match `value` against `pattern`.
///
/// `None` when the type test fails or the pattern's type was never
/// resolved. A `Type as name` pattern binds `name` to the whole value.
pub fn match_pattern(pattern: &Pattern, value: &Value, table: &TypeTable) -> Option<Bindings> {
    let ty = table.resolved(pattern.ty())?;
    if !value_matches(value, ty, table) {
        return None;
    }
    Some(match pattern.binding() {
        Some(name) => vec![(name, value.clone())],
        None => Vec::new(),
    })
}

/// Whether `value` is an instance of `ty`.
///
/// Nominal types match on the value's own type; `Anything` matches every
/// value, `AnySignal` every signal, an option any value one of its members
/// matches, and a function type any callable of the same arity.
pub fn value_matches(value: &Value, ty: &ResolvedType, table: &TypeTable) -> bool {
    matches_at(value, ty, table, 0)
}

fn matches_at(value: &Value, ty: &ResolvedType, table: &TypeTable, depth: usize) -> bool {
    match ty {
        ResolvedType::Function(f) => value.callable_arity(table) == Some(f.arity()),
        ResolvedType::Named(id) => match &table.get(*id).kind {
            TypeKind::Anything | TypeKind::Unknown => true,
            TypeKind::AnySignal => value.is_signal(),
            TypeKind::Option { members } => {
                depth < MAX_OPTION_DEPTH
                    && members
                        .iter()
                        .any(|member| matches_at(value, member, table, depth + 1))
            }
            TypeKind::Primitive | TypeKind::Object { .. } | TypeKind::Signal { .. } => {
                value.type_id() == Some(*id)
            }
        },
    }
}
