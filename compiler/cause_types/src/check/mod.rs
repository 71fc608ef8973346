//! Module checker: scopes, type reference resolution, and the passes that
//! drive them.
//!
//! A module is checked like a block: hoisted declarations (imports, types,
//! functions) are registered first, `let` values in order, and function
//! bodies last so they see every name of their enclosing scope.

mod api;
mod bodies;
mod registration;

pub use api::resolve;

use cause_ir::ast::{Pattern, TypeRefKind};
use cause_ir::{ExprArena, Name, Span, StringInterner, TypeRefId};
use rustc_hash::FxHashMap;

use crate::builtins::BUILTIN_TYPE_NAMES;
use crate::{ImportProvider, ResolvedType, TypeError, TypeId, TypeTable};

/// How a value name was introduced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ValueKind {
    /// `function` declaration.
    Function,
    /// Imported or prelude native.
    Native,
    /// Object or signal name with fields; calling it constructs an instance.
    Constructor,
    /// `let` value, zero-field type instance, parameter or pattern binding.
    Constant,
    /// `let variable`
    Variable,
}

impl ValueKind {
    /// Statically known callee whose signature can be checked at call sites.
    fn is_known_callable(self) -> bool {
        matches!(
            self,
            ValueKind::Function | ValueKind::Native | ValueKind::Constructor
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ValueInfo {
    kind: ValueKind,
    ty: Option<ResolvedType>,
}

#[derive(Default)]
struct CheckScope {
    types: FxHashMap<Name, TypeId>,
    values: FxHashMap<Name, ValueInfo>,
    /// Sibling declarations, for duplicate detection.
    declared: FxHashMap<Name, Span>,
}

pub(crate) struct ModuleChecker<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    imports: &'a dyn ImportProvider,
    table: TypeTable,
    errors: Vec<TypeError>,
    scopes: Vec<CheckScope>,
    loop_depth: usize,
    function_depth: usize,
}

impl<'a> ModuleChecker<'a> {
    pub(crate) fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        imports: &'a dyn ImportProvider,
    ) -> Self {
        let mut checker = ModuleChecker {
            arena,
            interner,
            imports,
            table: TypeTable::with_builtins(interner, arena.type_ref_count()),
            errors: Vec::new(),
            scopes: Vec::new(),
            loop_depth: 0,
            function_depth: 0,
        };
        checker.push_builtin_scope();
        checker
    }

    pub(crate) fn finish(self) -> (TypeTable, Vec<TypeError>) {
        (self.table, self.errors)
    }

    fn push_builtin_scope(&mut self) {
        let mut scope = CheckScope::default();
        for (i, name) in BUILTIN_TYPE_NAMES.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, reason = "builtin count is tiny")]
            let id = TypeId::new(i as u32);
            scope.types.insert(self.interner.intern(name), id);
        }
        for id in [TypeId::TRUE, TypeId::FALSE] {
            scope.values.insert(
                self.table.get(id).name,
                ValueInfo {
                    kind: ValueKind::Constant,
                    ty: Some(ResolvedType::Named(id)),
                },
            );
        }
        for id in [TypeId::DEBUG, TypeId::ASSUMPTION_BROKEN] {
            let params = self.table.fields(id).iter().map(|f| f.ty.clone()).collect();
            scope.values.insert(
                self.table.get(id).name,
                ValueInfo {
                    kind: ValueKind::Constructor,
                    ty: Some(ResolvedType::function(params, ResolvedType::Named(id))),
                },
            );
        }
        for (name, sig) in self.imports.prelude() {
            scope.values.insert(
                self.interner.intern(name),
                ValueInfo {
                    kind: ValueKind::Native,
                    ty: Some(ResolvedType::Function(std::rc::Rc::new(sig))),
                },
            );
        }
        self.scopes.push(scope);
    }

    fn push_scope(&mut self) {
        self.scopes.push(CheckScope::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn current_scope(&mut self) -> &mut CheckScope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Record a sibling declaration, reporting a duplicate if the name is
    /// already declared in the current scope.
    fn declare_name(&mut self, name: Name, span: Span) {
        if let Some(previous) = self.current_scope().declared.get(&name).copied() {
            self.errors.push(TypeError::DuplicateDeclaration {
                name,
                span,
                previous,
            });
        } else {
            self.current_scope().declared.insert(name, span);
        }
    }

    fn define_value(&mut self, name: Name, info: ValueInfo) {
        self.current_scope().values.insert(name, info);
    }

    fn lookup_value(&self, name: Name) -> Option<&ValueInfo> {
        self.scopes.iter().rev().find_map(|s| s.values.get(&name))
    }

    fn lookup_type(&self, name: Name) -> Option<TypeId> {
        self.scopes.iter().rev().find_map(|s| s.types.get(&name).copied())
    }

    /// Resolve a type reference occurrence and record the result in the
    /// table. Unknown names are reported and resolve to `UNKNOWN`.
    fn resolve_type_ref(&mut self, id: TypeRefId) -> ResolvedType {
        let arena = self.arena;
        let type_ref = arena.type_ref(id);
        let resolved = match &type_ref.kind {
            TypeRefKind::Identifier(name) => match self.lookup_type(*name) {
                Some(ty) => ResolvedType::Named(ty),
                None => {
                    self.errors.push(TypeError::UnknownType {
                        name: *name,
                        span: type_ref.span,
                    });
                    ResolvedType::UNKNOWN
                }
            },
            TypeRefKind::Function {
                params,
                return_type,
            } => {
                let params = params.iter().map(|p| self.resolve_type_ref(*p)).collect();
                let ret = self.resolve_type_ref(*return_type);
                ResolvedType::function(params, ret)
            }
        };
        self.table.record_ref(id, resolved.clone());
        resolved
    }

    fn resolve_optional(&mut self, id: Option<TypeRefId>) -> ResolvedType {
        id.map_or(ResolvedType::UNKNOWN, |id| self.resolve_type_ref(id))
    }

    /// Resolve a pattern's type and bind its capture name in the current
    /// scope.
    fn bind_pattern(&mut self, pattern: &Pattern) {
        let ty = self.resolve_type_ref(pattern.ty());
        if let Some(binding) = pattern.binding() {
            self.define_value(
                binding,
                ValueInfo {
                    kind: ValueKind::Constant,
                    ty: Some(ty),
                },
            );
        }
    }
}
