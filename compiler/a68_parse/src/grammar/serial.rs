//! Serial clauses, phrases and declarations.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, NodeId, Position, TableId};

use crate::seq::Seq;
use crate::Parser;

impl Parser<'_> {
    /// Parse `items` as the serial clause of the range `table`.
    #[tracing::instrument(level = "trace", skip_all, fields(table = table.raw()))]
    pub(crate) fn serial_clause(
        &mut self,
        items: Vec<NodeId>,
        table: TableId,
        position: Position,
    ) -> Result<NodeId, Fatal> {
        a68_stack::ensure_sufficient_stack(|| self.serial_clause_inner(items, table, position))
    }

    fn serial_clause_inner(
        &mut self,
        items: Vec<NodeId>,
        table: TableId,
        position: Position,
    ) -> Result<NodeId, Fatal> {
        self.prescan(&items, table)?;
        let start = items.first().map_or(position, |&id| self.position(id));
        let mut children = Vec::new();
        for (phrase, separator) in self.split_phrases(&items) {
            let end = separator.map_or_else(|| self.end_of(&phrase, position), |id| self.position(id));
            if phrase.is_empty() {
                self.expected(end, "unit")?;
            } else {
                let nodes = self.phrase(phrase, table, end)?;
                children.extend(nodes);
            }
            if let Some(exit) = separator.filter(|&id| self.attribute(id) == Attribute::ExitSymbol) {
                children.push(self.convert(exit, Attribute::Completer, table));
            }
        }
        if let Some(&last) = children.last() {
            if self.attribute(last).is_declaration() {
                self.error(
                    ErrorCode::E1004,
                    self.position(last),
                    "clause cannot end with a declaration",
                )?;
            }
        }
        Ok(self.reduce(Attribute::SerialClause, start, table, &children))
    }

    /// Split at `;` and `EXIT`, keeping `WHILE ... DO` together.
    ///
    /// Each phrase carries the separator that ends it; the last has none.
    fn split_phrases(&self, items: &[NodeId]) -> Vec<(Vec<NodeId>, Option<NodeId>)> {
        let mut phrases = Vec::new();
        let mut current = Vec::new();
        let mut in_while = false;
        for &id in items {
            match self.attribute(id) {
                Attribute::WhileSymbol => in_while = true,
                Attribute::DoSymbol => in_while = false,
                Attribute::SemiSymbol | Attribute::ExitSymbol if !in_while => {
                    phrases.push((std::mem::take(&mut current), Some(id)));
                    continue;
                }
                _ => {}
            }
            current.push(id);
        }
        phrases.push((current, None));
        phrases
    }

    /// Labels followed by a unit, or a list of joined declarations.
    ///
    /// Only the first syntax error of a phrase is reported.
    fn phrase(
        &mut self,
        items: Vec<NodeId>,
        table: TableId,
        end: Position,
    ) -> Result<Vec<NodeId>, Fatal> {
        let outer = self.phrase_failed.replace(false);
        let nodes = self.phrase_inner(items, table, end);
        self.phrase_failed = outer;
        nodes
    }

    fn phrase_inner(
        &mut self,
        items: Vec<NodeId>,
        table: TableId,
        end: Position,
    ) -> Result<Vec<NodeId>, Fatal> {
        let mut seq = Seq::new(items, end);
        let mut labels = Vec::new();
        while self.at(&seq, Attribute::Identifier)
            && seq
                .peek_at(1)
                .is_some_and(|id| self.attribute(id) == Attribute::ColonSymbol)
        {
            if let Some(label) = seq.bump() {
                labels.push(self.convert(label, Attribute::Label, table));
            }
            seq.skip(1);
        }

        let mut nodes = Vec::new();
        if self.is_declaration_start(seq.rest(), table) {
            if let Some(&label) = labels.first() {
                self.expected(self.position(label), "unit")?;
            }
            loop {
                nodes.push(self.declaration(&mut seq, table)?);
                let joined = self.at(&seq, Attribute::CommaSymbol)
                    && self.is_declaration_start(&seq.rest()[1..], table);
                if !joined {
                    break;
                }
                seq.skip(1);
            }
        } else {
            let mut unit = self.unit(&mut seq, table)?;
            for &label in labels.iter().rev() {
                unit = self.reduce(
                    Attribute::LabeledUnit,
                    self.position(label),
                    table,
                    &[label, unit],
                );
            }
            nodes.push(unit);
        }
        self.finish(&mut seq, ";")?;
        Ok(nodes)
    }

    fn declaration(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let Some(first) = seq.peek() else {
            return Ok(self.erroneous(seq.end(), table, &[]));
        };
        match self.attribute(first) {
            Attribute::ModeSymbol => self.mode_declaration(seq, table),
            Attribute::PrioSymbol => self.priority_declaration(seq, table),
            Attribute::OpSymbol => self.operator_declaration(seq, table),
            Attribute::ProcSymbol
                if seq
                    .peek_at(1)
                    .is_some_and(|id| self.attribute(id) == Attribute::Identifier) =>
            {
                self.procedure_declaration(seq, table)
            }
            _ => self.identity_or_variable_declaration(seq, table),
        }
    }

    /// `, name` continuing a declaration with the same declarer.
    fn continues(&self, seq: &Seq, attribute: Attribute) -> bool {
        self.at(seq, Attribute::CommaSymbol)
            && seq
                .peek_at(1)
                .is_some_and(|id| self.attribute(id) == attribute)
    }

    fn mixed(&mut self, position: Position) -> Result<(), Fatal> {
        self.error(
            ErrorCode::E1003,
            position,
            "probably mixed identity and variable declaration",
        )
    }

    fn identity_or_variable_declaration(
        &mut self,
        seq: &mut Seq,
        table: TableId,
    ) -> Result<NodeId, Fatal> {
        let start = self.next_position(seq);
        let heap = self.eat(seq, Attribute::HeapSymbol).is_some();
        let local = self.eat(seq, Attribute::LocSymbol).is_some();
        let declarer = self.declarer(seq, table)?;
        let mut kind = (heap || local).then_some(Attribute::VariableDeclaration);
        let mut children = vec![declarer];
        let mut reported = false;
        loop {
            let Some(name) = self.expect(seq, Attribute::Identifier)? else {
                break;
            };
            let defining = self.convert(name, Attribute::DefiningIdentifier, table);
            let this = if self.eat(seq, Attribute::EqualsSymbol).is_some() {
                let source = self.unit(seq, table)?;
                self.tree.set_children(defining, &[source]);
                Attribute::IdentityDeclaration
            } else {
                if self.eat(seq, Attribute::AssignSymbol).is_some() {
                    let source = self.unit(seq, table)?;
                    self.tree.set_children(defining, &[source]);
                }
                Attribute::VariableDeclaration
            };
            match kind {
                Some(previous) if previous != this && !reported => {
                    self.mixed(self.position(name))?;
                    reported = true;
                }
                Some(_) => {}
                None => kind = Some(this),
            }
            children.push(defining);
            if !self.continues(seq, Attribute::Identifier) {
                break;
            }
            seq.skip(1);
        }
        let kind = kind.unwrap_or(Attribute::VariableDeclaration);
        let node = self.reduce(kind, start, table, &children);
        self.tree[node].info.heap = heap;
        Ok(node)
    }

    fn procedure_declaration(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let start = self.next_position(seq);
        seq.skip(1);
        let mut kind = None;
        let mut children = Vec::new();
        let mut reported = false;
        loop {
            let Some(name) = self.expect(seq, Attribute::Identifier)? else {
                break;
            };
            let defining = self.convert(name, Attribute::DefiningIdentifier, table);
            let this = if self.eat(seq, Attribute::AssignSymbol).is_some() {
                Attribute::ProcedureVariableDeclaration
            } else {
                self.expect(seq, Attribute::EqualsSymbol)?;
                Attribute::ProcedureDeclaration
            };
            let source = self.unit(seq, table)?;
            self.tree.set_children(defining, &[source]);
            match kind {
                Some(previous) if previous != this && !reported => {
                    self.mixed(self.position(name))?;
                    reported = true;
                }
                Some(_) => {}
                None => kind = Some(this),
            }
            children.push(defining);
            if !self.continues(seq, Attribute::Identifier) {
                break;
            }
            seq.skip(1);
        }
        let kind = kind.unwrap_or(Attribute::ProcedureDeclaration);
        Ok(self.reduce(kind, start, table, &children))
    }

    fn mode_declaration(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let start = self.next_position(seq);
        seq.skip(1);
        let mut children = Vec::new();
        loop {
            let Some(word) = self.expect(seq, Attribute::BoldTag)? else {
                break;
            };
            self.expect(seq, Attribute::EqualsSymbol)?;
            let declarer = self.declarer(seq, table)?;
            self.reduce_into(word, Attribute::DefiningIndicant, table, &[declarer]);
            children.push(word);
            if !self.continues(seq, Attribute::BoldTag) {
                break;
            }
            seq.skip(1);
        }
        Ok(self.reduce(Attribute::ModeDeclaration, start, table, &children))
    }

    fn priority_declaration(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let start = self.next_position(seq);
        seq.skip(1);
        let mut children = Vec::new();
        loop {
            let Some(word) = self.operator_symbol(seq)? else {
                break;
            };
            self.expect(seq, Attribute::EqualsSymbol)?;
            let mut priority = Vec::new();
            if let Some(digit) = self.expect(seq, Attribute::IntDenotation)? {
                priority.push(self.convert(digit, Attribute::Priority, table));
            }
            self.reduce_into(word, Attribute::DefiningOperator, table, &priority);
            children.push(word);
            if !(self.at(seq, Attribute::CommaSymbol)
                && seq.peek_at(1).is_some_and(|id| self.is_operator_symbol(id)))
            {
                break;
            }
            seq.skip(1);
        }
        Ok(self.reduce(Attribute::PriorityDeclaration, start, table, &children))
    }

    fn operator_declaration(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let start = self.next_position(seq);
        seq.skip(1);
        let mut children = Vec::new();
        if self.at(seq, Attribute::OpenSymbol) {
            children.push(self.operator_plan(seq, table)?);
        }
        loop {
            let Some(word) = self.operator_symbol(seq)? else {
                break;
            };
            self.expect(seq, Attribute::EqualsSymbol)?;
            let source = self.unit(seq, table)?;
            self.reduce_into(word, Attribute::DefiningOperator, table, &[source]);
            children.push(word);
            if !(self.at(seq, Attribute::CommaSymbol)
                && seq.peek_at(1).is_some_and(|id| self.is_operator_symbol(id)))
            {
                break;
            }
            seq.skip(1);
        }
        Ok(self.reduce(Attribute::OperatorDeclaration, start, table, &children))
    }

    /// `(INT, INT) BOOL` before the operators of an operator declaration.
    fn operator_plan(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.next_position(seq);
        let mut children = Vec::new();
        if let Some(region) = seq.bump() {
            let members = self.declarer_list(region, table)?;
            self.reduce_into(region, Attribute::ParameterPack, table, &members);
            children.push(region);
        }
        children.push(self.declarer(seq, table)?);
        Ok(self.reduce(Attribute::ProcDeclarer, position, table, &children))
    }

    fn is_operator_symbol(&self, id: NodeId) -> bool {
        matches!(
            self.attribute(id),
            Attribute::Operator | Attribute::BoldTag | Attribute::EqualsSymbol
        )
    }

    /// The operator being declared; `=` is itself an operator symbol, so
    /// `OP = = ...` is accepted.
    fn operator_symbol(&mut self, seq: &mut Seq) -> Result<Option<NodeId>, Fatal> {
        match seq.peek() {
            Some(id) if self.is_operator_symbol(id) => {
                seq.skip(1);
                Ok(Some(id))
            }
            _ => {
                let position = self.next_position(seq);
                self.expected(position, "operator")?;
                Ok(None)
            }
        }
    }
}
