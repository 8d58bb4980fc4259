//! Core data structures of the Algol 68 front-end.
//!
//! - [`Name`] and the [`StringInterner`] for identifiers and bold words
//! - [`Tree`] of threaded [`Node`]s, allocated from an index arena
//! - [`SourceLines`], one record per physical input line
//! - [`Tables`] of [`SymbolTable`]s and [`Tag`]s
//! - [`Options`] read by the lexer and parser
//! - [`Module`], the compilation-unit record threaded through every pass
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings become `Name(u32)`, modes `MoidId(u32)`
//! - **Flatten Everything**: no pointers between nodes, only arena handles
//! - **Never Free Early**: arenas live as long as the compilation

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod attribute;
mod ids;
mod interner;
mod module;
mod name;
mod node;
mod options;
mod refinement;
mod source;
mod table;

pub use attribute::Attribute;
pub use ids::{LineId, MessageId, MoidId, NodeId, TableId, TagId};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use module::Module;
pub use name::Name;
pub use node::{Children, Node, NodeInfo, Tree};
pub use options::{Options, Stropping};
pub use refinement::Refinement;
pub use source::{Position, SourceLine, SourceLines};
pub use table::{Access, Namespace, Scopes, SymbolTable, Tag, TagKind, Tables, PRIMAL_SCOPE};

static_assert_size!(Name, 4);
static_assert_size!(NodeId, 4);
static_assert_size!(Position, 8);
