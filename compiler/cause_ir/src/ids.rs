//! Arena indices.
//!
//! The AST is flat: expressions, declarations and type references live in
//! [`ExprArena`](crate::ExprArena) vectors and refer to each other through
//! these `u32` handles. Resolver tables key their side data by the same
//! handles, so nothing in the tree points back at an owner.

use std::fmt;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Index into the owning arena vector.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_index!(
    /// Index of an expression in [`ExprArena`](crate::ExprArena).
    ExprId
);

define_index!(
    /// Index of a declaration in [`ExprArena`](crate::ExprArena).
    DeclId
);

define_index!(
    /// Index of a type reference occurrence in [`ExprArena`](crate::ExprArena).
    TypeRefId
);
