//! The type table produced by resolution.

use cause_ir::{DeclId, Name, StringInterner, TypeRefId};
use rustc_hash::FxHashMap;

use crate::{FunctionType, ResolvedType, TypeId};

/// Nesting bound for [`TypeTable::accepts`].
const MAX_ACCEPTS_DEPTH: usize = 64;

/// One entry of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    pub name: Name,
    pub kind: TypeKind,
    /// Declaring node; `None` for builtins.
    pub decl: Option<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// `Number`, `String` or `Action`.
    Primitive,
    /// Accepts every value.
    Anything,
    /// Accepts every signal instance.
    AnySignal,
    Object {
        fields: Vec<FieldDef>,
    },
    Signal {
        fields: Vec<FieldDef>,
        /// Resume-value type.
        result: ResolvedType,
    },
    Option {
        members: Vec<ResolvedType>,
    },
    /// Placeholder for [`TypeId::UNKNOWN`].
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Name,
    pub ty: ResolvedType,
}

/// Declared types, function signatures, and the resolution of every type
/// reference occurrence in a module.
///
/// Read-only once [`resolve`](crate::resolve) returns.
#[derive(Clone, Debug)]
pub struct TypeTable {
    types: Vec<TypeDef>,
    decl_types: FxHashMap<DeclId, TypeId>,
    functions: FxHashMap<DeclId, FunctionType>,
    resolved_refs: Vec<Option<ResolvedType>>,
}

impl TypeTable {
    /// Table holding only the builtins.
    pub fn with_builtins(interner: &StringInterner, type_ref_count: usize) -> Self {
        let mut table = TypeTable {
            types: Vec::with_capacity(TypeId::BUILTIN_COUNT + 8),
            decl_types: FxHashMap::default(),
            functions: FxHashMap::default(),
            resolved_refs: vec![None; type_ref_count],
        };
        crate::builtins::register(&mut table, interner);
        table
    }

    pub(crate) fn push(&mut self, def: TypeDef) -> TypeId {
        let index = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type table exceeded {} entries", u32::MAX));
        if let Some(decl) = def.decl {
            self.decl_types.insert(decl, TypeId::new(index));
        }
        self.types.push(def);
        TypeId::new(index)
    }

    pub(crate) fn set_kind(&mut self, id: TypeId, kind: TypeKind) {
        self.types[id.index()].kind = kind;
    }

    pub(crate) fn record_ref(&mut self, type_ref: TypeRefId, ty: ResolvedType) {
        if let Some(slot) = self.resolved_refs.get_mut(type_ref.index()) {
            *slot = Some(ty);
        }
    }

    pub(crate) fn record_function(&mut self, decl: DeclId, sig: FunctionType) {
        self.functions.insert(decl, sig);
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
        self.types.iter().enumerate().map(|(i, def)| {
            #[allow(clippy::cast_possible_truncation, reason = "push bounds len to u32")]
            let id = TypeId::new(i as u32);
            (id, def)
        })
    }

    /// Type assigned to an `object`, `signal` or `option` declaration.
    pub fn decl_type(&self, decl: DeclId) -> Option<TypeId> {
        self.decl_types.get(&decl).copied()
    }

    /// Signature of a `function` declaration.
    pub fn function_signature(&self, decl: DeclId) -> Option<&FunctionType> {
        self.functions.get(&decl)
    }

    /// Resolution of a type reference occurrence. `None` only for references
    /// the resolver never visited.
    pub fn resolved(&self, type_ref: TypeRefId) -> Option<&ResolvedType> {
        self.resolved_refs.get(type_ref.index())?.as_ref()
    }

    pub fn is_signal(&self, id: TypeId) -> bool {
        matches!(self.get(id).kind, TypeKind::Signal { .. })
    }

    /// Fields of an object or signal type.
    pub fn fields(&self, id: TypeId) -> &[FieldDef] {
        match &self.get(id).kind {
            TypeKind::Object { fields } | TypeKind::Signal { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Resume-value type of a signal; `Action` for anything else.
    pub fn signal_result(&self, id: TypeId) -> &ResolvedType {
        match &self.get(id).kind {
            TypeKind::Signal { result, .. } => result,
            _ => &ResolvedType::ACTION,
        }
    }

    /// Whether a value of type `source` may be used where `target` is
    /// expected.
    ///
    /// Nominal types are equal only to themselves. `Anything` accepts all,
    /// `AnySignal` accepts signal types, an option accepts its members
    /// (transitively), and function types are compared structurally.
    pub fn accepts(&self, target: &ResolvedType, source: &ResolvedType) -> bool {
        self.accepts_at(target, source, 0)
    }

    fn accepts_at(&self, target: &ResolvedType, source: &ResolvedType, depth: usize) -> bool {
        if target.is_unknown() || source.is_unknown() || target == source {
            return true;
        }
        // Options may list themselves as members.
        if depth > MAX_ACCEPTS_DEPTH {
            return false;
        }
        match (target, source) {
            (ResolvedType::Named(t), _) => match &self.get(*t).kind {
                TypeKind::Anything => true,
                TypeKind::AnySignal => source.as_named().is_some_and(|s| self.is_signal(s)),
                TypeKind::Option { members } => members
                    .iter()
                    .any(|m| self.accepts_at(m, source, depth + 1)),
                _ => false,
            },
            (ResolvedType::Function(expected), ResolvedType::Function(actual)) => {
                self.function_compatible_at(expected, actual, depth + 1)
            }
            (ResolvedType::Function(_), ResolvedType::Named(_)) => false,
        }
    }

    /// A function of type `actual` can stand in for `expected`: same arity,
    /// every parameter of `actual` accepts what callers of `expected` pass,
    /// and `expected`'s return type accepts `actual`'s.
    pub fn function_compatible(&self, expected: &FunctionType, actual: &FunctionType) -> bool {
        self.function_compatible_at(expected, actual, 0)
    }

    fn function_compatible_at(
        &self,
        expected: &FunctionType,
        actual: &FunctionType,
        depth: usize,
    ) -> bool {
        expected.arity() == actual.arity()
            && expected
                .params
                .iter()
                .zip(&actual.params)
                .all(|(e, a)| self.accepts_at(a, e, depth))
            && self.accepts_at(&expected.ret, &actual.ret, depth)
    }

    /// Source-like rendering, e.g. `Function(Number, String): Action`.
    pub fn display(&self, ty: &ResolvedType, interner: &StringInterner) -> String {
        match ty {
            ResolvedType::Named(TypeId::UNKNOWN) => "<unknown>".to_owned(),
            ResolvedType::Named(id) => interner.lookup(self.get(*id).name).to_owned(),
            ResolvedType::Function(f) => {
                let params: Vec<String> =
                    f.params.iter().map(|p| self.display(p, interner)).collect();
                format!(
                    "Function({}): {}",
                    params.join(", "),
                    self.display(&f.ret, interner)
                )
            }
        }
    }
}
