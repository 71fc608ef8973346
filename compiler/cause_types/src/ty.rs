//! Resolved types.

use std::fmt;
use std::rc::Rc;

/// Index of a nominal or builtin type in a [`TypeTable`](crate::TypeTable).
///
/// Builtins occupy the first slots of every table, so their ids are the same
/// constants everywhere and native functions can name them directly.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const NUMBER: TypeId = TypeId(0);
    pub const STRING: TypeId = TypeId(1);
    /// The unit type.
    pub const ACTION: TypeId = TypeId(2);
    pub const ANYTHING: TypeId = TypeId(3);
    pub const ANY_SIGNAL: TypeId = TypeId(4);
    pub const TRUE: TypeId = TypeId(5);
    pub const FALSE: TypeId = TypeId(6);
    pub const BINARY_ANSWER: TypeId = TypeId(7);
    pub const DEBUG: TypeId = TypeId(8);
    pub const ASSUMPTION_BROKEN: TypeId = TypeId(9);
    /// Unwritten or unresolvable type. Compatible with everything in both
    /// directions, so one bad reference does not cascade.
    pub const UNKNOWN: TypeId = TypeId(10);

    /// Number of builtin slots.
    pub const BUILTIN_COUNT: usize = 11;

    #[inline]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        (self.0 as usize) < Self::BUILTIN_COUNT
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// What a type reference resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// Builtin, object, signal or option type.
    Named(TypeId),
    /// Structural function type.
    Function(Rc<FunctionType>),
}

impl ResolvedType {
    pub const NUMBER: ResolvedType = ResolvedType::Named(TypeId::NUMBER);
    pub const STRING: ResolvedType = ResolvedType::Named(TypeId::STRING);
    pub const ACTION: ResolvedType = ResolvedType::Named(TypeId::ACTION);
    pub const ANYTHING: ResolvedType = ResolvedType::Named(TypeId::ANYTHING);
    pub const BINARY_ANSWER: ResolvedType = ResolvedType::Named(TypeId::BINARY_ANSWER);
    pub const UNKNOWN: ResolvedType = ResolvedType::Named(TypeId::UNKNOWN);

    pub fn function(params: Vec<ResolvedType>, ret: ResolvedType) -> Self {
        ResolvedType::Function(Rc::new(FunctionType { params, ret }))
    }

    pub fn as_named(&self) -> Option<TypeId> {
        match self {
            ResolvedType::Named(id) => Some(*id),
            ResolvedType::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            ResolvedType::Function(f) => Some(f),
            ResolvedType::Named(_) => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedType::Named(TypeId::UNKNOWN))
    }
}

/// `Function(params): ret`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<ResolvedType>,
    pub ret: ResolvedType,
}

impl FunctionType {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
