//! Stable integer handles into the compiler's arenas.
//!
//! Nodes, lines, symbol tables, tags, modes and messages live in growable
//! tables owned by the compilation; everything else refers to them by
//! these 32-bit handles. Nothing is freed individually.

use std::fmt;

/// Define an arena handle: a `u32` newtype with index conversions.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Create from an arena length.
            ///
            /// # Panics
            /// Panics if the arena holds more than `u32::MAX` entries.
            #[inline]
            pub fn from_usize(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!("{} arena overflow: {}", stringify!($name), index),
                }
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Index into the syntax tree arena.
    NodeId
);

define_id!(
    /// Index into the source line store.
    LineId
);

define_id!(
    /// Index into the symbol table arena.
    TableId
);

define_id!(
    /// Index into the tag arena.
    TagId
);

define_id!(
    /// Index into the global mode list.
    MoidId
);

define_id!(
    /// Index into the accumulated diagnostics.
    MessageId
);

impl TableId {
    /// The standard environment table, outermost of every chain.
    pub const STANDARD: TableId = TableId(0);
}

/// Standard modes are pre-interned at fixed indices so that every pass can
/// name them without a lookup.
impl MoidId {
    pub const VOID: MoidId = MoidId(0);
    pub const INT: MoidId = MoidId(1);
    pub const LONG_INT: MoidId = MoidId(2);
    pub const REAL: MoidId = MoidId(3);
    pub const LONG_REAL: MoidId = MoidId(4);
    pub const BOOL: MoidId = MoidId(5);
    pub const CHAR: MoidId = MoidId(6);
    pub const BITS: MoidId = MoidId(7);
    /// `[] CHAR`
    pub const ROW_CHAR: MoidId = MoidId(8);
    /// `FLEX [] CHAR`
    pub const STRING: MoidId = MoidId(9);
    /// `[] BOOL`, the widened form of BITS.
    pub const ROW_BOOL: MoidId = MoidId(10);
    /// Mode of SKIP, NIL and jumps: coercible to anything in strong contexts.
    pub const HIP: MoidId = MoidId(11);
    /// Mode of erroneous constructs; coercible everywhere.
    pub const ERROR: MoidId = MoidId(12);
    pub const UNDEFINED: MoidId = MoidId(13);
    /// Mode of the empty collateral clause `()`.
    pub const VACUUM: MoidId = MoidId(14);
    /// Any row; operand mode of UPB and LWB.
    pub const ROWS: MoidId = MoidId(15);

    /// Number of pre-interned modes.
    pub const PRIMITIVE_COUNT: usize = 16;

    /// Whether this is one of the pre-interned modes.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self.0 as usize) < Self::PRIMITIVE_COUNT
    }
}
