//! Declarers.

use a68_diagnostic::Fatal;
use a68_ir::{Attribute, NodeId, TableId};

use crate::seq::Seq;
use crate::Parser;

impl Parser<'_> {
    /// Parse one declarer from `seq`.
    pub(crate) fn declarer(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        a68_stack::ensure_sufficient_stack(|| self.declarer_inner(seq, table))
    }

    fn declarer_inner(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.next_position(seq);
        let Some(first) = seq.peek() else {
            self.expected(position, "declarer")?;
            return Ok(self.erroneous(position, table, &[]));
        };
        match self.attribute(first) {
            Attribute::LongSymbol => {
                let mut text = String::new();
                while self.eat(seq, Attribute::LongSymbol).is_some() {
                    text.push_str("LONG ");
                }
                match seq.peek() {
                    Some(word) if self.is_mode_word(word, table) => {
                        seq.skip(1);
                        text.push_str(self.text(self.symbol(word)));
                        let symbol = self.interner.intern(&text);
                        self.tree[word].symbol = symbol;
                        self.tree[word].position = position;
                        Ok(self.convert(word, Attribute::Indicant, table))
                    }
                    _ => {
                        let at = self.next_position(seq);
                        self.expected(at, "mode indicant")?;
                        Ok(self.erroneous(position, table, &[]))
                    }
                }
            }
            Attribute::BoldTag if self.is_mode_word(first, table) => {
                seq.skip(1);
                Ok(self.convert(first, Attribute::Indicant, table))
            }
            Attribute::RefSymbol | Attribute::FlexSymbol => {
                seq.skip(1);
                let sub = self.declarer(seq, table)?;
                let attribute = if self.attribute(first) == Attribute::RefSymbol {
                    Attribute::RefDeclarer
                } else {
                    Attribute::FlexDeclarer
                };
                self.reduce_into(first, attribute, table, &[sub]);
                Ok(first)
            }
            Attribute::SubSymbol => {
                seq.skip(1);
                let bounds = self.bounds(first, table)?;
                let element = self.declarer(seq, table)?;
                self.reduce_into(first, Attribute::RowDeclarer, table, &[bounds, element]);
                Ok(first)
            }
            Attribute::StructSymbol => {
                seq.skip(1);
                let fields = match self.expect(seq, Attribute::OpenSymbol)? {
                    Some(region) => self.declared_names(region, Attribute::Field, table)?,
                    None => Vec::new(),
                };
                self.reduce_into(first, Attribute::StructDeclarer, table, &fields);
                Ok(first)
            }
            Attribute::UnionSymbol => {
                seq.skip(1);
                let members = match self.expect(seq, Attribute::OpenSymbol)? {
                    Some(region) => self.declarer_list(region, table)?,
                    None => Vec::new(),
                };
                self.reduce_into(first, Attribute::UnionDeclarer, table, &members);
                Ok(first)
            }
            Attribute::ProcSymbol => {
                seq.skip(1);
                let mut children = Vec::new();
                if let Some(region) = self.eat(seq, Attribute::OpenSymbol) {
                    let parameters = self.declarer_list(region, table)?;
                    self.reduce_into(region, Attribute::ParameterPack, table, &parameters);
                    children.push(region);
                }
                children.push(self.declarer(seq, table)?);
                self.reduce_into(first, Attribute::ProcDeclarer, table, &children);
                Ok(first)
            }
            _ => {
                self.expected(position, "declarer")?;
                Ok(self.erroneous(position, table, &[]))
            }
        }
    }

    /// Comma-separated declarers inside `region`, as in `UNION (INT, REAL)`.
    pub(crate) fn declarer_list(
        &mut self,
        region: NodeId,
        table: TableId,
    ) -> Result<Vec<NodeId>, Fatal> {
        let end = self.position(region);
        let items = self.tree.child_vec(region);
        let mut declarers = Vec::new();
        for part in self.split_commas(&items) {
            let at = self.end_of(&part, end);
            let mut seq = Seq::new(part, at);
            declarers.push(self.declarer(&mut seq, table)?);
            self.finish(&mut seq, ",")?;
        }
        Ok(declarers)
    }

    /// Groups of `declarer name, name` inside `region`, as in
    /// `STRUCT (REAL re, im)` or `(INT a, b, REAL x)`.
    ///
    /// Each group becomes an `attribute` node holding the declarer and the
    /// defining identifiers.
    pub(crate) fn declared_names(
        &mut self,
        region: NodeId,
        attribute: Attribute,
        table: TableId,
    ) -> Result<Vec<NodeId>, Fatal> {
        let end = self.position(region);
        let items = self.tree.child_vec(region);
        let mut groups: Vec<(NodeId, Vec<NodeId>)> = Vec::new();
        for part in self.split_commas(&items) {
            let at = self.end_of(&part, end);
            let starts_group = self.declarer_len(&part, table).is_some();
            let mut seq = Seq::new(part, at);
            if starts_group {
                let declarer = self.declarer(&mut seq, table)?;
                groups.push((declarer, Vec::new()));
            } else if groups.is_empty() {
                self.expected(at, "declarer")?;
                seq.take_rest();
                continue;
            }
            if let Some(name) = self.expect(&mut seq, Attribute::Identifier)? {
                let defining = self.convert(name, Attribute::DefiningIdentifier, table);
                if let Some((_, names)) = groups.last_mut() {
                    names.push(defining);
                }
            }
            self.finish(&mut seq, ",")?;
        }
        let mut nodes = Vec::with_capacity(groups.len());
        for (declarer, names) in groups {
            let mut children = vec![declarer];
            children.extend(names);
            nodes.push(self.reduce(attribute, self.position(declarer), table, &children));
        }
        Ok(nodes)
    }

    /// `[1:n, m]` or `[,]`: one bound per comma-separated part.
    ///
    /// A bound has no children when formal, one for an upper bound, and two
    /// for a lower and an upper bound.
    fn bounds(&mut self, region: NodeId, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.position(region);
        let items = self.tree.child_vec(region);
        let mut bounds = Vec::new();
        for part in self.split_commas(&items) {
            let at = part.first().map_or(position, |&id| self.position(id));
            let mut units = Vec::new();
            if !part.is_empty() {
                let (lower, upper) = self.split_colon(&part);
                match upper {
                    Some(upper) => {
                        units.push(self.lone_unit(lower, table, at)?);
                        units.push(self.lone_unit(upper, table, at)?);
                    }
                    None => units.push(self.lone_unit(lower, table, at)?),
                }
            }
            bounds.push(self.reduce(Attribute::Bound, at, table, &units));
        }
        Ok(self.reduce(Attribute::Bounds, position, table, &bounds))
    }

    /// Split at the first `:`, as in `1 : n`.
    pub(crate) fn split_colon(&self, items: &[NodeId]) -> (Vec<NodeId>, Option<Vec<NodeId>>) {
        match items
            .iter()
            .position(|&id| self.attribute(id) == Attribute::ColonSymbol)
        {
            Some(i) => (items[..i].to_vec(), Some(items[i + 1..].to_vec())),
            None => (items.to_vec(), None),
        }
    }
}
