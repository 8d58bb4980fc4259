//! Mode descriptors.

use a68_ir::{MoidId, Name, NodeId};
use bitflags::bitflags;
use smallvec::SmallVec;

/// Structural kind of a mode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ModeKind {
    /// INT, REAL, BOOL, CHAR, BITS and their LONG variants.
    Standard,
    Ref,
    Row,
    Flex,
    Proc,
    Struct,
    Union,
    /// A mode indicant; `equivalent` points at its declared mode once known.
    Indicant,
    Void,
    /// Mode of SKIP, NIL and jumps: coercible to anything in a strong context.
    Hip,
    Error,
    Undefined,
    /// Mode of the empty row display `()`.
    Vacuum,
    /// Any row, as accepted by UPB and LWB.
    Rows,
}

/// Field of a structure, parameter of a procedure or member of a union.
///
/// `text` is the field selector for structures and empty otherwise.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Pack {
    pub mode: MoidId,
    pub text: Name,
}

impl Pack {
    pub const fn new(mode: MoidId, text: Name) -> Self {
        Pack { mode, text }
    }

    pub const fn unnamed(mode: MoidId) -> Self {
        Pack {
            mode,
            text: Name::EMPTY,
        }
    }
}

pub type Packs = SmallVec<[Pack; 4]>;

bitflags! {
    /// Cached structural properties of a mode.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MoidFlags: u8 {
        /// Contains a REF somewhere in its structure.
        const HAS_REF = 1 << 0;
        /// Contains a FLEX somewhere in its structure.
        const HAS_FLEX = 1 << 1;
        /// Contains a row somewhere in its structure.
        const HAS_ROWS = 1 << 2;
        /// Passed the well-formedness check (or needs none).
        const WELL_FORMED = 1 << 3;
    }
}

/// Derived modes, computed on first use.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Derived {
    pub slice: Option<MoidId>,
    /// Indexed by `Deflexing::Safe`, `Alias` and `Force`.
    pub deflexed: [Option<MoidId>; 3],
    pub ref_to: Option<MoidId>,
    pub multiple: Option<MoidId>,
    pub name_of: Option<MoidId>,
}

/// One mode.
///
/// `dim` is the number of dimensions of a row, the number of parameters of
/// a procedure, the number of fields of a structure or the number of
/// members of a union. `sub` is the referenced mode, the row element, the
/// flexed row or the procedure result.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Moid {
    pub kind: ModeKind,
    pub dim: u32,
    pub sub: Option<MoidId>,
    pub pack: Packs,
    /// Name of a standard mode or mode indicant.
    pub name: Name,
    /// Defining indicant of an indicant mode.
    pub node: Option<NodeId>,
    /// A mode this one was found equal to; the canonical mode has none.
    pub equivalent: Option<MoidId>,
    pub derived: Derived,
    pub flags: MoidFlags,
}

impl Moid {
    pub fn new(kind: ModeKind) -> Self {
        Moid {
            kind,
            dim: 0,
            sub: None,
            pack: Packs::new(),
            name: Name::EMPTY,
            node: None,
            equivalent: None,
            derived: Derived::default(),
            flags: MoidFlags::empty(),
        }
    }

    pub fn standard(name: Name) -> Self {
        Moid {
            name,
            ..Moid::new(ModeKind::Standard)
        }
    }

    pub fn with_sub(kind: ModeKind, sub: MoidId) -> Self {
        Moid {
            sub: Some(sub),
            ..Moid::new(kind)
        }
    }

    pub fn row(dim: u32, element: MoidId) -> Self {
        Moid {
            dim,
            ..Moid::with_sub(ModeKind::Row, element)
        }
    }

    pub fn with_pack(kind: ModeKind, pack: Packs, sub: Option<MoidId>) -> Self {
        Moid {
            dim: u32::try_from(pack.len()).unwrap_or(u32::MAX),
            sub,
            pack,
            ..Moid::new(kind)
        }
    }

    #[inline]
    pub fn is(&self, kind: ModeKind) -> bool {
        self.kind == kind
    }

    /// Whether the descriptor is a composite whose identity is structural.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            ModeKind::Ref
                | ModeKind::Row
                | ModeKind::Flex
                | ModeKind::Proc
                | ModeKind::Struct
                | ModeKind::Union
        )
    }

    /// Component modes: the sub-mode followed by the pack.
    pub fn components(&self) -> impl Iterator<Item = MoidId> + '_ {
        self.sub
            .into_iter()
            .chain(self.pack.iter().map(|p| p.mode))
    }
}

/// Exact structural identity of a descriptor, used to share identical
/// descriptors without an equivalence test.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct MoidKey {
    kind: ModeKind,
    dim: u32,
    sub: Option<MoidId>,
    pack: Packs,
    name: Name,
    node: Option<NodeId>,
}

impl MoidKey {
    pub(crate) fn of(moid: &Moid) -> Self {
        MoidKey {
            kind: moid.kind,
            dim: moid.dim,
            sub: moid.sub,
            pack: moid.pack.clone(),
            name: moid.name,
            node: moid.node,
        }
    }
}
