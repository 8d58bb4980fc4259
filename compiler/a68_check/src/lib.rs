//! Mode checking, coercion insertion and scope checking.
//!
//! Runs after binding, once the mode table is finalised:
//!
//! 1. [`mode_check`] works out the a priori mode of every unit, identifies
//!    operators from their operand modes and records, for every unit that
//!    stands in a context, the [`Soid`] that context requires.
//! 2. [`insert_coercions`] makes each implicit conversion explicit as a
//!    node spliced between a unit and its context.
//! 3. [`scope_check`] looks for names that could outlive the range that
//!    declares them.
//! 4. [`check_unused`] warns about program tags that are never applied.
//!
//! A unit whose mode cannot be made to fit its context is reported once
//! and then carries mode ERROR, which every context accepts.

mod coercions;
mod mode_check;
mod scope;
mod unused;

use a68_diagnostic::{Diagnostics, Fatal};
use a68_ir::{MoidId, Module, NodeId};
use a68_modes::{Deflexing, ModeTable, Sort};
use rustc_hash::FxHashMap;

pub use coercions::insert_coercions;
pub use scope::scope_check;
pub use unused::check_unused;

/// What a context asks of the unit in it: a mode and how hard it may be
/// coerced to get there.
///
/// A soid with mode UNDEFINED asks for nothing in particular; the unit
/// keeps its a priori mode and the context decides later, as operands of
/// formulas do.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Soid {
    pub sort: Sort,
    pub mode: MoidId,
    /// FLEX stripped before comparing: `Safe` everywhere except operands,
    /// which match their operator's parameters under `Force`.
    pub deflexing: Deflexing,
}

impl Soid {
    pub const fn new(sort: Sort, mode: MoidId) -> Self {
        Soid {
            sort,
            mode,
            deflexing: Deflexing::Safe,
        }
    }

    /// The firm context of an operand of an operator with parameter `mode`.
    pub const fn operand(mode: MoidId) -> Self {
        Soid {
            sort: Sort::Firm,
            mode,
            deflexing: Deflexing::Force,
        }
    }

    pub const fn strong(mode: MoidId) -> Self {
        Soid::new(Sort::Strong, mode)
    }

    /// Any mode, in a context of strength `sort`.
    pub const fn open(sort: Sort) -> Self {
        Soid::new(sort, MoidId::UNDEFINED)
    }

    #[inline]
    pub fn is_open(self) -> bool {
        self.mode == MoidId::UNDEFINED
    }
}

/// Required soid of each unit whose context constrains it.
#[derive(Clone, Debug, Default)]
pub struct Expectations {
    required: FxHashMap<NodeId, Soid>,
}

impl Expectations {
    pub fn get(&self, id: NodeId) -> Option<Soid> {
        self.required.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Entries ordered by node.
    pub fn sorted(&self) -> Vec<(NodeId, Soid)> {
        let mut entries: Vec<(NodeId, Soid)> =
            self.required.iter().map(|(&id, &soid)| (id, soid)).collect();
        entries.sort_unstable_by_key(|&(id, _)| id);
        entries
    }

    pub(crate) fn insert(&mut self, id: NodeId, soid: Soid) {
        self.required.insert(id, soid);
    }
}

/// Check the mode of every unit of the program and identify its operators.
#[tracing::instrument(level = "debug", skip_all)]
pub fn mode_check(
    module: &mut Module,
    modes: &mut ModeTable,
    diagnostics: &mut Diagnostics,
) -> Result<Expectations, Fatal> {
    let top = top_of(module)?;
    let expectations = mode_check::Checker::new(module, modes, diagnostics).run(top)?;
    tracing::debug!(expectations = expectations.len(), "checked modes");
    Ok(expectations)
}

fn top_of(module: &Module) -> Result<NodeId, Fatal> {
    module
        .top
        .ok_or_else(|| Diagnostics::internal("module has no syntax tree"))
}
