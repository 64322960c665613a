//! Arena indices and list ranges for the flat AST.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

macro_rules! define_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn len(self) -> usize {
                self.len as usize
            }

            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }

            #[inline]
            pub fn to_range(self) -> std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({}..{})"),
                    self.start,
                    self.start + self.len
                )
            }
        }
    };
}

define_id!(
    /// Index of an expression in the arena.
    ExprId
);
define_id!(
    /// Index of a statement in the arena.
    StmtId
);

define_range!(
    /// Range of expressions (call arguments, assignment sides, return results).
    ExprRange
);
define_range!(
    /// Range of statements (block bodies).
    StmtRange
);
define_range!(
    /// Range of composite-literal elements.
    ElementRange
);
define_range!(
    /// Range of struct field declarations.
    FieldRange
);
define_range!(
    /// Range of declared names (`var a, b int`).
    NameRange
);
