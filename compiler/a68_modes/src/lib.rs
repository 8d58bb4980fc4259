//! The Algol 68 mode system.
//!
//! - [`ModeTable`]: interned mode descriptors with the standard modes at
//!   fixed ids
//! - structural [`equivalence`](ModeTable::equivalent) under postulates,
//!   so recursive modes compare in finite time
//! - [`Deflexing`], uniting and the derived slice/row/name modes
//! - the coercion ladder ([`Sort`], [`ModeTable::coercion_path`]) and
//!   balancing
//! - well-formedness of recursive declarations
//! - [`describe`](ModeTable::describe) for diagnostics

mod coerce;
mod deflex;
mod describe;
mod equivalence;
mod moid;
mod table;
mod wellformed;

pub use coerce::{Coercion, Sort, Step};
pub use deflex::Deflexing;
pub use moid::{Derived, ModeKind, Moid, MoidFlags, Pack, Packs};
pub use table::ModeTable;

#[cfg(test)]
mod tests;
