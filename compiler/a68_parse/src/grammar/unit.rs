//! Units, formulas, secondaries and primaries.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, NodeId, Position, TableId};

use crate::recovery::{DENOTATIONS, LOOP_START};
use crate::seq::Seq;
use crate::Parser;

/// Priority assumed for a dyadic operator that has none, so parsing can
/// go on after the error.
const FALLBACK_PRIORITY: u8 = 1;

impl Parser<'_> {
    /// Parse one unit from `seq`, stopping at the first item that cannot
    /// continue it.
    pub(crate) fn unit(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        a68_stack::ensure_sufficient_stack(|| self.unit_inner(seq, table))
    }

    /// Parse `items` as exactly one unit.
    pub(crate) fn lone_unit(
        &mut self,
        items: Vec<NodeId>,
        table: TableId,
        end: Position,
    ) -> Result<NodeId, Fatal> {
        if items.is_empty() {
            self.expected(end, "unit")?;
            return Ok(self.erroneous(end, table, &[]));
        }
        let mut seq = Seq::new(items, end);
        let unit = self.unit(&mut seq, table)?;
        self.finish(&mut seq, ",")?;
        Ok(unit)
    }

    fn unit_inner(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        if self.is_routine_text(seq.rest(), table) {
            return self.routine_text(seq, table);
        }
        if let Some(goto) = self.eat(seq, Attribute::GotoSymbol) {
            return self.jump(goto, seq, table);
        }
        let mut left = self.tertiary(seq, table)?;
        let Some(next) = seq.peek() else {
            return Ok(left);
        };
        match self.attribute(next) {
            Attribute::AssignSymbol => {
                seq.skip(1);
                let source = self.unit(seq, table)?;
                Ok(self.reduce(
                    Attribute::Assignation,
                    self.position(left),
                    table,
                    &[left, source],
                ))
            }
            Attribute::IsSymbol | Attribute::IsntSymbol => {
                seq.skip(1);
                let right = self.tertiary(seq, table)?;
                let text = if self.attribute(next) == Attribute::IsSymbol {
                    ":=:"
                } else {
                    ":/=:"
                };
                let node = self.reduce(
                    Attribute::IdentityRelation,
                    self.position(left),
                    table,
                    &[left, right],
                );
                self.tree[node].symbol = self.interner.intern(text);
                Ok(node)
            }
            Attribute::AndfSymbol | Attribute::OrfSymbol => {
                while let Some(op) = seq.peek() {
                    let attribute = match self.attribute(op) {
                        Attribute::AndfSymbol => Attribute::AndFunction,
                        Attribute::OrfSymbol => Attribute::OrFunction,
                        _ => break,
                    };
                    seq.skip(1);
                    let right = self.tertiary(seq, table)?;
                    left = self.reduce(attribute, self.position(left), table, &[left, right]);
                }
                Ok(left)
            }
            _ => Ok(left),
        }
    }

    /// `GOTO label`; the label name becomes the jump's symbol.
    fn jump(&mut self, goto: NodeId, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        self.convert(goto, Attribute::Jump, table);
        if let Some(label) = self.expect(seq, Attribute::Identifier)? {
            self.tree[goto].symbol = self.symbol(label);
        }
        Ok(goto)
    }

    /// `(INT a) INT: ...` or `VOID: ...`.
    fn is_routine_text(&self, items: &[NodeId], table: TableId) -> bool {
        let start = usize::from(self.is(items, 0, Attribute::OpenSymbol));
        items.get(start..).is_some_and(|rest| {
            self.declarer_len(rest, table)
                .is_some_and(|n| self.is(rest, n, Attribute::ColonSymbol))
        })
    }

    fn routine_text(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.next_position(seq);
        let routine = self.tables.open(table, None, true);
        let mut children = Vec::new();
        if let Some(region) = self.eat(seq, Attribute::OpenSymbol) {
            let parameters = self.declared_names(region, Attribute::Parameter, routine)?;
            self.reduce_into(region, Attribute::ParameterPack, routine, &parameters);
            children.push(region);
        }
        children.push(self.declarer(seq, routine)?);
        self.expect(seq, Attribute::ColonSymbol)?;
        children.push(self.unit(seq, routine)?);
        let node = self.reduce(Attribute::RoutineText, position, table, &children);
        self.tables[routine].node = Some(node);
        Ok(node)
    }

    /// A formula or a secondary.
    ///
    /// Operands and dyadic operators are collected first and then reduced
    /// by priority; equal priorities associate to the left.
    fn tertiary(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let first = self.operand(seq, table)?;
        let mut operands = vec![first];
        let mut operators: Vec<(NodeId, u8)> = Vec::new();
        while let Some(op) = seq.peek().filter(|&id| self.is_dyadic(id, table)) {
            seq.skip(1);
            let priority = self.dyadic_priority(op, table)?;
            // Reduce everything on the stack that binds at least as tightly.
            while let Some(&(top, top_priority)) = operators.last() {
                if top_priority < priority {
                    break;
                }
                operators.pop();
                self.combine(&mut operands, top, table);
            }
            operators.push((op, priority));
            operands.push(self.operand(seq, table)?);
        }
        while let Some((top, _)) = operators.pop() {
            self.combine(&mut operands, top, table);
        }
        Ok(operands.pop().unwrap_or(first))
    }

    fn combine(&mut self, operands: &mut Vec<NodeId>, op: NodeId, table: TableId) {
        let (Some(right), Some(left)) = (operands.pop(), operands.pop()) else {
            return;
        };
        let node = self.reduce(Attribute::Formula, self.position(left), table, &[left, op, right]);
        operands.push(node);
    }

    fn is_dyadic(&self, id: NodeId, table: TableId) -> bool {
        match self.attribute(id) {
            Attribute::Operator | Attribute::EqualsSymbol => true,
            Attribute::BoldTag => !self.is_indicant(self.symbol(id), table),
            _ => false,
        }
    }

    fn is_monadic(&self, id: NodeId, table: TableId) -> bool {
        match self.attribute(id) {
            Attribute::Operator => true,
            Attribute::BoldTag => !self.is_indicant(self.symbol(id), table),
            _ => false,
        }
    }

    /// Turn `op` into an operator node and look up its priority.
    fn dyadic_priority(&mut self, op: NodeId, table: TableId) -> Result<u8, Fatal> {
        self.convert(op, Attribute::Operator, table);
        let name = self.symbol(op);
        let priority = match self.tables.priority_of(table, name) {
            Some(priority) => priority,
            None => {
                self.error(
                    ErrorCode::E1007,
                    self.position(op),
                    format!("dyadic operator \"{}\" has no priority", self.text(name)),
                )?;
                self.tree[op].info.erroneous = true;
                FALLBACK_PRIORITY
            }
        };
        self.tree[op].info.priority = priority;
        Ok(priority)
    }

    /// A secondary preceded by any number of monadic operators.
    fn operand(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        match seq.peek() {
            Some(op) if self.is_monadic(op, table) => {
                seq.skip(1);
                self.convert(op, Attribute::Operator, table);
                let operand = a68_stack::ensure_sufficient_stack(|| self.operand(seq, table))?;
                Ok(self.reduce(
                    Attribute::MonadicFormula,
                    self.position(op),
                    table,
                    &[op, operand],
                ))
            }
            _ => self.secondary(seq, table),
        }
    }

    fn secondary(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let Some(first) = seq.peek() else {
            let end = seq.end();
            self.expected(end, "unit")?;
            return Ok(self.erroneous(end, table, &[]));
        };
        match self.attribute(first) {
            Attribute::Identifier
                if seq
                    .peek_at(1)
                    .is_some_and(|id| self.attribute(id) == Attribute::OfSymbol) =>
            {
                seq.skip(2);
                let structure = a68_stack::ensure_sufficient_stack(|| self.secondary(seq, table))?;
                self.reduce_into(first, Attribute::Selection, table, &[structure]);
                Ok(first)
            }
            Attribute::LocSymbol | Attribute::HeapSymbol => {
                seq.skip(1);
                let declarer = self.declarer(seq, table)?;
                let heap = self.attribute(first) == Attribute::HeapSymbol;
                self.reduce_into(first, Attribute::Generator, table, &[declarer]);
                self.tree[first].info.heap = heap;
                Ok(first)
            }
            _ => {
                let mut primary = self.primary(seq, table)?;
                loop {
                    if let Some(region) = self.eat(seq, Attribute::OpenSymbol) {
                        let arguments = self.argument_units(region, table)?;
                        self.reduce_into(region, Attribute::ArgumentList, table, &arguments);
                        primary = self.reduce(
                            Attribute::Call,
                            self.position(primary),
                            table,
                            &[primary, region],
                        );
                    } else if let Some(region) = self.eat(seq, Attribute::SubSymbol) {
                        let indexer = self.indexer(region, table)?;
                        primary = self.reduce(
                            Attribute::Slice,
                            self.position(primary),
                            table,
                            &[primary, indexer],
                        );
                    } else {
                        break;
                    }
                }
                Ok(primary)
            }
        }
    }

    fn primary(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.next_position(seq);
        let Some(first) = seq.peek() else {
            self.expected(position, "unit")?;
            return Ok(self.erroneous(position, table, &[]));
        };
        let attribute = self.attribute(first);
        let leaf = match attribute {
            Attribute::Identifier => Some(Attribute::Identifier),
            Attribute::TrueSymbol | Attribute::FalseSymbol => Some(Attribute::BoolDenotation),
            Attribute::EmptySymbol => Some(Attribute::EmptyDenotation),
            Attribute::SkipSymbol => Some(Attribute::Skip),
            Attribute::NilSymbol => Some(Attribute::Nihil),
            _ if DENOTATIONS.contains(attribute) => Some(attribute),
            _ => None,
        };
        if let Some(leaf) = leaf {
            seq.skip(1);
            return Ok(self.convert(first, leaf, table));
        }
        match attribute {
            Attribute::OpenSymbol | Attribute::BeginSymbol => {
                seq.skip(1);
                self.enclosed_clause(first, table)
            }
            Attribute::IfSymbol => {
                seq.skip(1);
                self.conditional_clause(first, table)
            }
            Attribute::CaseSymbol => {
                seq.skip(1);
                self.case_clause(first, table)
            }
            _ if LOOP_START.contains(attribute) => self.loop_clause(seq, table),
            _ if self.declarer_len(seq.rest(), table).is_some() => self.cast(seq, table),
            _ => {
                self.expected(position, "unit")?;
                seq.skip(1);
                Ok(self.erroneous(position, table, &[]))
            }
        }
    }

    /// `REAL (x)`: a declarer followed by an enclosed clause.
    fn cast(&mut self, seq: &mut Seq, table: TableId) -> Result<NodeId, Fatal> {
        let position = self.next_position(seq);
        let declarer = self.declarer(seq, table)?;
        let enclosed = match seq.peek() {
            Some(region)
                if matches!(
                    self.attribute(region),
                    Attribute::OpenSymbol | Attribute::BeginSymbol
                ) =>
            {
                seq.skip(1);
                self.enclosed_clause(region, table)?
            }
            _ => {
                let at = self.next_position(seq);
                self.expected(at, "enclosed clause")?;
                return Ok(self.erroneous(position, table, &[declarer]));
            }
        };
        Ok(self.reduce(Attribute::Cast, position, table, &[declarer, enclosed]))
    }

    fn argument_units(&mut self, region: NodeId, table: TableId) -> Result<Vec<NodeId>, Fatal> {
        let items = self.tree.child_vec(region);
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let end = self.position(region);
        let mut units = Vec::new();
        for part in self.split_commas(&items) {
            let at = self.end_of(&part, end);
            units.push(self.lone_unit(part, table, at)?);
        }
        Ok(units)
    }

    /// `[i, j]` or `[2:n]`: subscripts and trimmers.
    fn indexer(&mut self, region: NodeId, table: TableId) -> Result<NodeId, Fatal> {
        let end = self.position(region);
        let items = self.tree.child_vec(region);
        let mut indices = Vec::new();
        for part in self.split_commas(&items) {
            let at = part.first().map_or(end, |&id| self.position(id));
            let (lower, upper) = self.split_colon(&part);
            let Some(upper) = upper else {
                indices.push(self.lone_unit(lower, table, at)?);
                continue;
            };
            let mut bounds = Vec::with_capacity(2);
            for half in [lower, upper] {
                let units = if half.is_empty() {
                    Vec::new()
                } else {
                    vec![self.lone_unit(half, table, at)?]
                };
                bounds.push(self.reduce(Attribute::Bound, at, table, &units));
            }
            indices.push(self.reduce(Attribute::Trimmer, at, table, &bounds));
        }
        self.reduce_into(region, Attribute::Indexer, table, &indices);
        Ok(region)
    }
}
