//! The compilation-unit record.

use crate::{NodeId, Options, Refinement, SharedInterner, SourceLines, Tables, Tree};

/// Everything one compilation owns: its lines, tree, tables and options.
///
/// Passes receive the module explicitly; there is no global compiler state.
#[derive(Clone, Debug)]
pub struct Module {
    pub interner: SharedInterner,
    pub options: Options,
    pub lines: SourceLines,
    pub tree: Tree,
    pub tables: Tables,
    pub refinements: Vec<Refinement>,
    /// Root of the syntax tree, once parsed.
    pub top: Option<NodeId>,
}

impl Module {
    /// A module over `lines`, seeded with a copy of the standard tables.
    pub fn new(
        interner: SharedInterner,
        options: Options,
        lines: SourceLines,
        tables: Tables,
    ) -> Self {
        Module {
            interner,
            options,
            lines,
            tree: Tree::new(),
            tables,
            refinements: Vec::new(),
            top: None,
        }
    }

    /// Text of an interned name.
    pub fn text(&self, name: crate::Name) -> &'static str {
        self.interner.lookup(name)
    }
}
