//! Parser for Algol 68.
//!
//! Parsing runs in stages over the token list of one module:
//!
//! 1. [`brackets`]: every opening bracket must be matched before anything
//!    else is attempted; a mismatch stops the parse.
//! 2. [`refinement`]: refinement definitions after the outermost `.` are
//!    substituted into the main text.
//! 3. [`structure`]: tokens become leaf nodes and each bracket pair is
//!    reduced, with its contents, to one region node.
//! 4. [`grammar`]: regions are classified top-down into phrases, with a
//!    prescan of each range so bold tags can be told apart.
//! 5. Formulas are reduced by operator priority while units are parsed.
//!
//! Ranges open symbol tables as they are parsed; every node records the
//! table of the range it belongs to.

mod brackets;
mod grammar;
mod recovery;
mod refinement;
mod seq;
mod structure;

use a68_diagnostic::{Diagnostic, Diagnostics, ErrorCode, Fatal};
use a68_ir::{
    Attribute, Module, Name, NodeId, Options, Position, SourceLines, StringInterner, TableId,
    Tables, Tree,
};
use a68_lexer::Token;
use rustc_hash::FxHashMap;

/// Parse `tokens` into the tree of `module`, returning the particular
/// program node.
///
/// Syntax errors are reported to `diagnostics`; the returned tree is then
/// partial and should not be checked further.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(
    module: &mut Module,
    tokens: &[Token],
    diagnostics: &mut Diagnostics,
) -> Result<NodeId, Fatal> {
    let position = tokens
        .first()
        .map_or_else(|| Position::new(a68_ir::LineId::new(0), 0), |t| t.position);
    let interner = module.interner.clone();
    let mut parser = Parser {
        tree: &mut module.tree,
        tables: &mut module.tables,
        lines: &mut module.lines,
        interner: &interner,
        diagnostics,
        options: &module.options,
        bold_operators: FxHashMap::default(),
        phrase_failed: None,
    };

    let program_table = parser.tables.open(TableId::STANDARD, None, false);
    let top = parser.tree.new_node(
        Attribute::ParticularProgram,
        Name::EMPTY,
        position,
        program_table,
    );
    parser.tables[program_table].node = Some(top);

    if !brackets::check(&mut parser, tokens)? {
        let erroneous = parser.erroneous(position, TableId::STANDARD, &[]);
        parser.tree.set_children(top, &[erroneous]);
        module.top = Some(top);
        return Ok(top);
    }

    let (tokens, refinements) = refinement::substitute(&mut parser, tokens)?;
    module.refinements = refinements;

    let items = structure::reduce_brackets(&mut parser, &tokens);
    let serial = parser.serial_clause(items, program_table, position)?;
    parser.tree.set_children(top, &[serial]);
    module.top = Some(top);
    tracing::debug!(nodes = module.tree.len(), tables = module.tables.table_count(), "parsed");
    Ok(top)
}

/// State shared by the parsing stages.
pub(crate) struct Parser<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) tables: &'a mut Tables,
    pub(crate) lines: &'a mut SourceLines,
    pub(crate) interner: &'a StringInterner,
    pub(crate) diagnostics: &'a mut Diagnostics,
    pub(crate) options: &'a Options,
    /// Bold words declared as operators by `OP` in each range.
    pub(crate) bold_operators: FxHashMap<TableId, Vec<Name>>,
    /// Whether the phrase being parsed already has a syntax error; `None`
    /// outside phrases.
    pub(crate) phrase_failed: Option<bool>,
}

impl Parser<'_> {
    pub(crate) fn error(
        &mut self,
        code: ErrorCode,
        position: Position,
        message: impl Into<String>,
    ) -> Result<(), Fatal> {
        let syntax = matches!(code, ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1007);
        if syntax {
            match self.phrase_failed {
                // Later syntax errors in the phrase follow from the first.
                Some(true) => return Ok(()),
                Some(false) => self.phrase_failed = Some(true),
                None => {}
            }
        }
        self.diagnostics
            .report(self.lines, Diagnostic::error(code, position, message))?;
        Ok(())
    }

    pub(crate) fn warning(
        &mut self,
        code: ErrorCode,
        position: Position,
        message: impl Into<String>,
    ) -> Result<(), Fatal> {
        self.diagnostics
            .report(self.lines, Diagnostic::warning(code, position, message))?;
        Ok(())
    }

    /// "syntax error: expected X" at `position`.
    pub(crate) fn expected(&mut self, position: Position, what: &str) -> Result<(), Fatal> {
        self.error(
            ErrorCode::E1002,
            position,
            format!("syntax error: expected {what}"),
        )
    }

    pub(crate) fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    #[inline]
    pub(crate) fn attribute(&self, id: NodeId) -> Attribute {
        self.tree[id].attribute
    }

    #[inline]
    pub(crate) fn symbol(&self, id: NodeId) -> Name {
        self.tree[id].symbol
    }

    #[inline]
    pub(crate) fn position(&self, id: NodeId) -> Position {
        self.tree[id].position
    }

    /// Reclassify an existing node in place and move it into `table`.
    ///
    /// Names, operators and denotations keep their text; keywords and
    /// brackets lose it, since the new attribute says everything.
    pub(crate) fn convert(&mut self, id: NodeId, attribute: Attribute, table: TableId) -> NodeId {
        let node = &mut self.tree[id];
        let keeps_symbol = matches!(
            node.attribute,
            Attribute::Identifier | Attribute::BoldTag | Attribute::Operator | Attribute::EqualsSymbol
        ) || node.attribute.is_denotation()
            || attribute == Attribute::BoolDenotation;
        if !keeps_symbol {
            node.symbol = Name::EMPTY;
        }
        node.attribute = attribute;
        node.table = table;
        id
    }

    /// Allocate a node over `children`.
    pub(crate) fn reduce(
        &mut self,
        attribute: Attribute,
        position: Position,
        table: TableId,
        children: &[NodeId],
    ) -> NodeId {
        if self.options.reductions {
            tracing::info!(
                line = position.line.index() + 1,
                column = position.column,
                children = children.len(),
                "reduced {attribute}"
            );
        }
        self.tree.reduce(attribute, position, table, children)
    }

    /// Replace the children of `id`, logging the reduction.
    pub(crate) fn reduce_into(
        &mut self,
        id: NodeId,
        attribute: Attribute,
        table: TableId,
        children: &[NodeId],
    ) {
        if self.options.reductions {
            let position = self.position(id);
            tracing::info!(
                line = position.line.index() + 1,
                column = position.column,
                children = children.len(),
                "reduced {attribute}"
            );
        }
        self.convert(id, attribute, table);
        self.tree.set_children(id, children);
    }

    /// A node standing for a construct that failed to parse.
    pub(crate) fn erroneous(
        &mut self,
        position: Position,
        table: TableId,
        children: &[NodeId],
    ) -> NodeId {
        let id = self.tree.reduce(Attribute::Erroneous, position, table, children);
        self.tree[id].info.erroneous = true;
        id
    }
}

#[cfg(test)]
mod tests;
