//! Symbol tables, tag binding and declarer modes.
//!
//! Runs after parsing, in this order:
//!
//! 1. [`collect_tags`] enters every defining occurrence into the chain of
//!    its range. Mode indicants and priorities were already entered while
//!    parsing, since the parser needs them to tell modes from operators.
//! 2. [`bind_tags`] resolves every applied identifier, indicant and label
//!    by searching outward from its range to the standard environment.
//! 3. [`collect_modes`] computes the mode of every declarer and routine
//!    text, gives each tag its mode, checks recursive mode declarations and
//!    finalises the mode table.
//! 4. [`set_levels`] records the lexical level bounds of each source line.
//!
//! Operators are identified later, by the mode checker, because the choice
//! depends on operand modes.

mod collect;
mod declarer;
mod levels;
mod resolve;
mod standard;

use a68_diagnostic::{Diagnostic, Diagnostics, ErrorCode, Fatal};
use a68_ir::{Attribute, Module, Name, NodeId, Position, SourceLines, StringInterner, Tables, Tree};
use a68_modes::ModeTable;

pub use levels::set_levels;
pub use standard::StandardEnvironment;

/// Enter a tag for every defining occurrence of the program.
#[tracing::instrument(level = "debug", skip_all)]
pub fn collect_tags(module: &mut Module, diagnostics: &mut Diagnostics) -> Result<(), Fatal> {
    let top = top_of(module)?;
    Binder::new(module, diagnostics).collect_tags(top)
}

/// Bind every applied occurrence to its declaration.
#[tracing::instrument(level = "debug", skip_all)]
pub fn bind_tags(module: &mut Module, diagnostics: &mut Diagnostics) -> Result<(), Fatal> {
    let top = top_of(module)?;
    Binder::new(module, diagnostics).bind_tags(top)
}

/// Compute declarer modes and tag modes, then finalise `modes`.
#[tracing::instrument(level = "debug", skip_all, fields(modes = modes.len()))]
pub fn collect_modes(
    module: &mut Module,
    modes: &mut ModeTable,
    diagnostics: &mut Diagnostics,
) -> Result<(), Fatal> {
    let top = top_of(module)?;
    Binder::new(module, diagnostics).collect_modes(top, modes)
}

fn top_of(module: &Module) -> Result<NodeId, Fatal> {
    module
        .top
        .ok_or_else(|| Diagnostics::internal("module has no syntax tree"))
}

/// The parts of a module the binding passes work on.
pub(crate) struct Binder<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) tables: &'a mut Tables,
    pub(crate) lines: &'a mut SourceLines,
    pub(crate) interner: &'a StringInterner,
    pub(crate) diagnostics: &'a mut Diagnostics,
}

impl<'a> Binder<'a> {
    fn new(module: &'a mut Module, diagnostics: &'a mut Diagnostics) -> Self {
        let Module {
            interner,
            lines,
            tree,
            tables,
            ..
        } = module;
        Binder {
            tree,
            tables,
            lines,
            interner,
            diagnostics,
        }
    }

    pub(crate) fn error(
        &mut self,
        code: ErrorCode,
        position: Position,
        message: impl Into<String>,
    ) -> Result<(), Fatal> {
        self.diagnostics
            .report(self.lines, Diagnostic::error(code, position, message))?;
        Ok(())
    }

    /// `tag "x" is declared more than once in this range`.
    pub(crate) fn multiply_declared(&mut self, position: Position, name: Name) -> Result<(), Fatal> {
        let text = self.interner.lookup(name);
        self.error(
            ErrorCode::E2002,
            position,
            format!("tag \"{text}\" is declared more than once in this range"),
        )
    }

    /// `tag "x" has not been declared in this range`.
    pub(crate) fn undeclared(
        &mut self,
        code: ErrorCode,
        position: Position,
        name: Name,
    ) -> Result<(), Fatal> {
        let text = self.interner.lookup(name);
        self.error(
            code,
            position,
            format!("tag \"{text}\" has not been declared in this range"),
        )
    }

    #[inline]
    pub(crate) fn attribute(&self, id: NodeId) -> Attribute {
        self.tree[id].attribute
    }

    /// Attribute of the parent of `id`, if it has one.
    pub(crate) fn parent_attribute(&self, id: NodeId) -> Option<Attribute> {
        self.tree[id].parent.map(|p| self.tree[p].attribute)
    }
}

#[cfg(test)]
mod tests;
