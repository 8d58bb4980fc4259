//! Enclosed clauses: closed, collateral, choice and loop clauses.

use a68_diagnostic::Fatal;
use a68_ir::{Attribute, NodeId, Position, TableId};

use crate::recovery::{BRIEF_PARTS, CASE_PARTS, IF_PARTS};
use crate::seq::Seq;
use crate::Parser;

/// Parts of a choice clause: each chunk with the separator that opened it.
type Chunks = [(Option<NodeId>, Vec<NodeId>)];

impl Parser<'_> {
    /// Classify a `( )` or `BEGIN END` region.
    pub(crate) fn enclosed_clause(&mut self, region: NodeId, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.position(region);
        let items = self.tree.child_vec(region);
        let is_open = self.attribute(region) == Attribute::OpenSymbol;
        if is_open && items.iter().any(|&id| BRIEF_PARTS.contains(self.attribute(id))) {
            return self.brief_choice(region, &items, table);
        }
        if items.is_empty() {
            self.reduce_into(region, Attribute::CollateralClause, table, &[]);
            return Ok(region);
        }
        if self.is_collateral(&items, table) {
            let mut units = Vec::new();
            for part in self.split_commas(&items) {
                let at = self.end_of(&part, position);
                units.push(self.lone_unit(part, table, at)?);
            }
            self.reduce_into(region, Attribute::CollateralClause, table, &units);
            return Ok(region);
        }
        let range = self.tables.open(table, Some(region), false);
        let serial = self.serial_clause(items, range, position)?;
        self.reduce_into(region, Attribute::ClosedClause, table, &[serial]);
        Ok(region)
    }

    /// Commas at this level without phrase separators or declarations.
    fn is_collateral(&self, items: &[NodeId], table: TableId) -> bool {
        let mut commas = false;
        for &id in items {
            match self.attribute(id) {
                Attribute::SemiSymbol
                | Attribute::ExitSymbol
                | Attribute::ColonSymbol
                | Attribute::WhileSymbol => return false,
                Attribute::CommaSymbol => commas = true,
                _ => {}
            }
        }
        commas && !self.is_declaration_start(items, table)
    }

    /// `IF ... THEN ... ELIF ... ELSE ... FI`.
    pub(crate) fn conditional_clause(&mut self, region: NodeId, table: TableId) -> Result<NodeId, Fatal> {
        let items = self.tree.child_vec(region);
        let chunks = self.split_at(&items, IF_PARTS);
        let parts = self.conditional_parts(&chunks, table, self.position(region))?;
        self.reduce_into(region, Attribute::ConditionalClause, table, &parts);
        Ok(region)
    }

    /// `CASE ... IN ... OUSE ... OUT ... ESAC`, or a conformity clause.
    pub(crate) fn case_clause(&mut self, region: NodeId, table: TableId) -> Result<NodeId, Fatal> {
        let items = self.tree.child_vec(region);
        let chunks = self.split_at(&items, CASE_PARTS);
        let (attribute, parts) = self.case_parts(&chunks, table, self.position(region))?;
        self.reduce_into(region, attribute, table, &parts);
        Ok(region)
    }

    /// `(a | b | c)` with `|:` for a nested choice.
    ///
    /// It is a case or conformity clause when its second part is a list of
    /// units or specified units, otherwise a conditional clause.
    fn brief_choice(&mut self, region: NodeId, items: &[NodeId], table: TableId) -> Result<NodeId, Fatal> {
        let position = self.position(region);
        let chunks = self.split_at(items, BRIEF_PARTS);
        let (attribute, parts) = if chunks.get(1).is_some_and(|(_, chunk)| self.is_case_in_part(chunk)) {
            self.case_parts(&chunks, table, position)?
        } else {
            (
                Attribute::ConditionalClause,
                self.conditional_parts(&chunks, table, position)?,
            )
        };
        self.reduce_into(region, attribute, table, &parts);
        Ok(region)
    }

    fn is_case_in_part(&self, items: &[NodeId]) -> bool {
        self.is_specified(items)
            || items
                .iter()
                .any(|&id| self.attribute(id) == Attribute::CommaSymbol)
    }

    /// `(INT i): ...` starts a specified unit.
    fn is_specified(&self, items: &[NodeId]) -> bool {
        self.is(items, 0, Attribute::OpenSymbol) && self.is(items, 1, Attribute::ColonSymbol)
    }

    /// The enquiry clause in its own range, nested in `table`.
    fn enquiry(
        &mut self,
        items: Vec<NodeId>,
        table: TableId,
        position: Position,
    ) -> Result<(NodeId, TableId), Fatal> {
        let range = self.tables.open(table, None, false);
        let serial = self.serial_clause(items, range, position)?;
        let node = self.reduce(Attribute::EnquiryClause, position, table, &[serial]);
        self.tables[range].node = Some(node);
        Ok((node, range))
    }

    /// A part holding a serial clause in a fresh range nested in `table`.
    fn serial_part(
        &mut self,
        attribute: Attribute,
        items: Vec<NodeId>,
        table: TableId,
        position: Position,
    ) -> Result<NodeId, Fatal> {
        let range = self.tables.open(table, None, false);
        let serial = self.serial_clause(items, range, position)?;
        let node = self.reduce(attribute, position, table, &[serial]);
        self.tables[range].node = Some(node);
        Ok(node)
    }

    fn separator_position(&self, chunk: &(Option<NodeId>, Vec<NodeId>), fallback: Position) -> Position {
        chunk.0.map_or(fallback, |id| self.position(id))
    }

    /// Report a choice part that is missing or opened by the wrong word.
    fn check_separator(
        &mut self,
        chunks: &Chunks,
        index: usize,
        allowed: &[Attribute],
        position: Position,
    ) -> Result<bool, Fatal> {
        match chunks.get(index) {
            Some((Some(separator), _)) if allowed.contains(&self.attribute(*separator)) => Ok(true),
            Some(chunk) => {
                let at = self.separator_position(chunk, position);
                self.expected(at, allowed[0].name())?;
                Ok(false)
            }
            None => {
                self.expected(position, allowed[0].name())?;
                Ok(false)
            }
        }
    }

    fn conditional_parts(
        &mut self,
        chunks: &Chunks,
        table: TableId,
        position: Position,
    ) -> Result<Vec<NodeId>, Fatal> {
        let enquiry_position = self.separator_position(&chunks[0], position);
        let (enquiry, range) = self.enquiry(chunks[0].1.clone(), table, enquiry_position)?;
        let mut parts = vec![enquiry];
        if !self.check_separator(chunks, 1, &[Attribute::ThenSymbol, Attribute::BarSymbol], position)? {
            return Ok(parts);
        }
        let then_position = self.separator_position(&chunks[1], position);
        parts.push(self.serial_part(Attribute::ThenPart, chunks[1].1.clone(), range, then_position)?);

        let Some(chunk) = chunks.get(2) else {
            return Ok(parts);
        };
        let else_position = self.separator_position(chunk, position);
        let separator = chunk.0.map(|id| self.attribute(id));
        match separator {
            Some(Attribute::ElseSymbol | Attribute::BarSymbol) => {
                parts.push(self.serial_part(Attribute::ElsePart, chunk.1.clone(), range, else_position)?);
                if let Some(extra) = chunks.get(3) {
                    let at = self.separator_position(extra, position);
                    self.expected(at, "FI")?;
                }
            }
            _ => {
                // ELIF or |: opens a conditional clause nested in the else part.
                let nested_parts = a68_stack::ensure_sufficient_stack(|| {
                    self.conditional_parts(&chunks[2..], range, else_position)
                })?;
                let nested = self.reduce(Attribute::ConditionalClause, else_position, range, &nested_parts);
                parts.push(self.reduce(Attribute::ElsePart, else_position, range, &[nested]));
            }
        }
        Ok(parts)
    }

    fn case_parts(
        &mut self,
        chunks: &Chunks,
        table: TableId,
        position: Position,
    ) -> Result<(Attribute, Vec<NodeId>), Fatal> {
        let enquiry_position = self.separator_position(&chunks[0], position);
        let (enquiry, range) = self.enquiry(chunks[0].1.clone(), table, enquiry_position)?;
        let mut parts = vec![enquiry];
        let mut attribute = Attribute::CaseClause;
        if !self.check_separator(chunks, 1, &[Attribute::InSymbol, Attribute::BarSymbol], position)? {
            return Ok((attribute, parts));
        }
        let in_position = self.separator_position(&chunks[1], position);
        let in_items = &chunks[1].1;
        let mut units = Vec::new();
        if self.is_specified(in_items) {
            attribute = Attribute::ConformityClause;
            for part in self.split_commas(in_items) {
                let at = self.end_of(&part, in_position);
                units.push(self.specified_unit(part, range, at)?);
            }
        } else {
            for part in self.split_commas(in_items) {
                let at = self.end_of(&part, in_position);
                units.push(self.lone_unit(part, range, at)?);
            }
        }
        parts.push(self.reduce(Attribute::InPart, in_position, range, &units));

        let Some(chunk) = chunks.get(2) else {
            return Ok((attribute, parts));
        };
        let out_position = self.separator_position(chunk, position);
        let separator = chunk.0.map(|id| self.attribute(id));
        match separator {
            Some(Attribute::OutSymbol | Attribute::BarSymbol) => {
                parts.push(self.serial_part(Attribute::OutPart, chunk.1.clone(), range, out_position)?);
                if let Some(extra) = chunks.get(3) {
                    let at = self.separator_position(extra, position);
                    self.expected(at, "ESAC")?;
                }
            }
            _ => {
                // OUSE or |: opens a case clause nested in the out part.
                let (nested_attribute, nested_parts) = a68_stack::ensure_sufficient_stack(|| {
                    self.case_parts(&chunks[2..], range, out_position)
                })?;
                let nested = self.reduce(nested_attribute, out_position, range, &nested_parts);
                parts.push(self.reduce(Attribute::OutPart, out_position, range, &[nested]));
            }
        }
        Ok((attribute, parts))
    }

    /// `(REAL r): unit`, opening a range for the specifier's identifier.
    fn specified_unit(&mut self, items: Vec<NodeId>, table: TableId, end: Position) -> Result<NodeId, Fatal> {
        let mut seq = Seq::new(items, end);
        let position = self.next_position(&seq);
        let range = self.tables.open(table, None, false);
        let mut children = Vec::new();
        if let Some(region) = self.expect(&mut seq, Attribute::OpenSymbol)? {
            let inner = self.tree.child_vec(region);
            let mut inner = Seq::new(inner, self.position(region));
            let mut specifier = vec![self.declarer(&mut inner, range)?];
            if let Some(name) = self.eat(&mut inner, Attribute::Identifier) {
                specifier.push(self.convert(name, Attribute::DefiningIdentifier, range));
            }
            self.finish(&mut inner, ")")?;
            self.reduce_into(region, Attribute::Specifier, range, &specifier);
            children.push(region);
        }
        self.expect(&mut seq, Attribute::ColonSymbol)?;
        children.push(self.unit(&mut seq, range)?);
        self.finish(&mut seq, ",")?;
        let node = self.reduce(Attribute::SpecifiedUnit, position, table, &children);
        self.tables[range].node = Some(node);
        Ok(node)
    }

    /// `FOR i FROM a BY b TO c WHILE cond DO ... OD`; every part but the
    /// `DO` part is optional.
    pub(crate) fn loop_clause(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.next_position(seq);
        let range = self.tables.open(table, None, false);
        let mut parts = Vec::new();
        if let Some(keyword) = self.eat(seq, Attribute::ForSymbol) {
            let mut names = Vec::new();
            if let Some(name) = self.expect(seq, Attribute::Identifier)? {
                names.push(self.convert(name, Attribute::DefiningIdentifier, range));
            }
            self.reduce_into(keyword, Attribute::ForPart, range, &names);
            parts.push(keyword);
        }
        for (keyword, attribute) in [
            (Attribute::FromSymbol, Attribute::FromPart),
            (Attribute::BySymbol, Attribute::ByPart),
            (Attribute::ToSymbol, Attribute::ToPart),
        ] {
            if let Some(leaf) = self.eat(seq, keyword) {
                let unit = self.unit(seq, table)?;
                self.reduce_into(leaf, attribute, table, &[unit]);
                parts.push(leaf);
            }
        }
        let mut body_table = range;
        if let Some(keyword) = self.eat(seq, Attribute::WhileSymbol) {
            let mut items = Vec::new();
            while let Some(id) = seq.peek().filter(|&id| self.attribute(id) != Attribute::DoSymbol) {
                seq.skip(1);
                items.push(id);
            }
            body_table = self.tables.open(range, Some(keyword), false);
            let serial = self.serial_clause(items, body_table, self.position(keyword))?;
            self.reduce_into(keyword, Attribute::WhilePart, range, &[serial]);
            parts.push(keyword);
        }
        if let Some(region) = self.expect(seq, Attribute::DoSymbol)? {
            let items = self.tree.child_vec(region);
            let body = self.tables.open(body_table, Some(region), false);
            let serial = self.serial_clause(items, body, self.position(region))?;
            self.reduce_into(region, Attribute::DoPart, range, &[serial]);
            parts.push(region);
        }
        let node = self.reduce(Attribute::LoopClause, position, table, &parts);
        self.tables[range].node = Some(node);
        Ok(node)
    }
}
