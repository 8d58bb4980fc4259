//! Top-down classification of reduced regions.
//!
//! Every function here works on one bracket level at a time: the items of
//! a region are leaves and nested region nodes. Lookahead is over sibling
//! attributes, and bold tags are classified against the tables filled by
//! [`Parser::prescan`].

mod declarer;
mod enclosed;
mod serial;
mod unit;

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, Name, Namespace, NodeId, Position, Tag, TagKind, TableId};

use crate::recovery::{AttributeSet, PHRASE_END};
use crate::seq::Seq;
use crate::Parser;

impl Parser<'_> {
    pub(crate) fn at(&self, seq: &Seq, attribute: Attribute) -> bool {
        seq.peek().is_some_and(|id| self.attribute(id) == attribute)
    }

    pub(crate) fn eat(&self, seq: &mut Seq, attribute: Attribute) -> Option<NodeId> {
        if self.at(seq, attribute) {
            seq.bump()
        } else {
            None
        }
    }

    /// Consume `attribute` or report that it was expected.
    pub(crate) fn expect(
        &mut self,
        seq: &mut Seq,
        attribute: Attribute,
    ) -> Result<Option<NodeId>, Fatal> {
        if let Some(id) = self.eat(seq, attribute) {
            return Ok(Some(id));
        }
        let position = self.next_position(seq);
        self.expected(position, attribute.name())?;
        Ok(None)
    }

    pub(crate) fn next_position(&self, seq: &Seq) -> Position {
        seq.peek().map_or(seq.end(), |id| self.position(id))
    }

    /// Report anything left in `seq` and drop it.
    pub(crate) fn finish(&mut self, seq: &mut Seq, what: &str) -> Result<(), Fatal> {
        if let Some(id) = seq.peek() {
            let position = self.position(id);
            self.expected(position, what)?;
            seq.take_rest();
        }
        Ok(())
    }

    /// Position just past `items`, for diagnostics about missing parts.
    pub(crate) fn end_of(&self, items: &[NodeId], fallback: Position) -> Position {
        items.last().map_or(fallback, |&id| self.position(id))
    }

    pub(crate) fn is(&self, items: &[NodeId], index: usize, attribute: Attribute) -> bool {
        items
            .get(index)
            .is_some_and(|&id| self.attribute(id) == attribute)
    }

    /// Whether the bold word `name` denotes a mode as seen from `table`.
    ///
    /// The nearest table that mentions the word decides: an indicant there
    /// makes it a declarer, an operator or priority there makes it an
    /// operator.
    pub(crate) fn is_indicant(&self, name: Name, table: TableId) -> bool {
        for scope in self.tables.scopes(table) {
            if self
                .tables
                .find_local(scope, Namespace::Indicant, name)
                .is_some()
            {
                return true;
            }
            let local_operator = self
                .bold_operators
                .get(&scope)
                .is_some_and(|names| names.contains(&name))
                || !self.tables.operators_in(scope, name).is_empty()
                || self
                    .tables
                    .find_local(scope, Namespace::Priority, name)
                    .is_some();
            if local_operator {
                return false;
            }
        }
        false
    }

    pub(crate) fn is_mode_word(&self, id: NodeId, table: TableId) -> bool {
        self.attribute(id) == Attribute::BoldTag && self.is_indicant(self.symbol(id), table)
    }

    /// Length of the declarer at the start of `items`, if there is one.
    pub(crate) fn declarer_len(&self, items: &[NodeId], table: TableId) -> Option<usize> {
        let &first = items.first()?;
        match self.attribute(first) {
            Attribute::LongSymbol => {
                let longs = items
                    .iter()
                    .take_while(|&&id| self.attribute(id) == Attribute::LongSymbol)
                    .count();
                let &word = items.get(longs)?;
                self.is_mode_word(word, table).then_some(longs + 1)
            }
            Attribute::BoldTag => self.is_mode_word(first, table).then_some(1),
            Attribute::RefSymbol | Attribute::FlexSymbol | Attribute::SubSymbol => {
                self.declarer_len(&items[1..], table).map(|n| n + 1)
            }
            Attribute::StructSymbol | Attribute::UnionSymbol => {
                self.is(items, 1, Attribute::OpenSymbol).then_some(2)
            }
            Attribute::ProcSymbol => {
                let skip = if self.is(items, 1, Attribute::OpenSymbol) { 2 } else { 1 };
                self.declarer_len(items.get(skip..)?, table)
                    .map(|n| n + skip)
            }
            _ => None,
        }
    }

    /// Whether `items` starts with a declaration rather than a unit.
    pub(crate) fn is_declaration_start(&self, items: &[NodeId], table: TableId) -> bool {
        let Some(&first) = items.first() else {
            return false;
        };
        match self.attribute(first) {
            Attribute::ModeSymbol | Attribute::PrioSymbol | Attribute::OpSymbol => true,
            Attribute::ProcSymbol if self.is(items, 1, Attribute::Identifier) => true,
            Attribute::LocSymbol | Attribute::HeapSymbol => self
                .declarer_len(&items[1..], table)
                .is_some_and(|n| self.is(items, n + 1, Attribute::Identifier)),
            _ => self
                .declarer_len(items, table)
                .is_some_and(|n| self.is(items, n, Attribute::Identifier)),
        }
    }

    /// Split `items` at every member of `separators`.
    ///
    /// The first chunk has no separator; each later chunk carries the
    /// separator that opened it.
    pub(crate) fn split_at(
        &self,
        items: &[NodeId],
        separators: AttributeSet,
    ) -> Vec<(Option<NodeId>, Vec<NodeId>)> {
        let mut chunks = vec![(None, Vec::new())];
        for &id in items {
            if separators.contains(self.attribute(id)) {
                chunks.push((Some(id), Vec::new()));
            } else if let Some((_, chunk)) = chunks.last_mut() {
                chunk.push(id);
            }
        }
        chunks
    }

    /// Split `items` at commas.
    pub(crate) fn split_commas(&self, items: &[NodeId]) -> Vec<Vec<NodeId>> {
        self.split_at(items, AttributeSet::new().with(Attribute::CommaSymbol))
            .into_iter()
            .map(|(_, chunk)| chunk)
            .collect()
    }

    /// Enter the indicants, priorities and bold operators declared by the
    /// phrases of one range, so that bold tags can be classified before the
    /// phrases are parsed.
    pub(crate) fn prescan(&mut self, items: &[NodeId], table: TableId) -> Result<(), Fatal> {
        for (_, phrase) in self.split_at(items, PHRASE_END) {
            let Some(&keyword) = phrase.first() else {
                continue;
            };
            match self.attribute(keyword) {
                Attribute::ModeSymbol => self.prescan_modes(&phrase, table)?,
                Attribute::PrioSymbol => self.prescan_priorities(&phrase, table)?,
                Attribute::OpSymbol => self.prescan_operators(&phrase, table),
                _ => {}
            }
        }
        Ok(())
    }

    /// Defining occurrences in a declaration: a word directly after the
    /// keyword or a comma and directly before `=`.
    fn defined_words(&self, phrase: &[NodeId]) -> Vec<NodeId> {
        (1..phrase.len())
            .filter(|&i| {
                let previous = self.attribute(phrase[i - 1]);
                (i == 1 || previous == Attribute::CommaSymbol)
                    && self.is(phrase, i + 1, Attribute::EqualsSymbol)
            })
            .map(|i| phrase[i])
            .collect()
    }

    fn prescan_modes(&mut self, phrase: &[NodeId], table: TableId) -> Result<(), Fatal> {
        for word in self.defined_words(phrase) {
            if self.attribute(word) != Attribute::BoldTag {
                continue;
            }
            let mut tag = Tag::new(table, TagKind::Indicant, self.symbol(word));
            tag.node = Some(word);
            if self.tables.add_tag(tag).is_err() {
                let text = self.text(self.symbol(word));
                self.error(
                    ErrorCode::E2002,
                    self.position(word),
                    format!("tag \"{text}\" is declared more than once in this range"),
                )?;
            }
        }
        Ok(())
    }

    fn prescan_priorities(&mut self, phrase: &[NodeId], table: TableId) -> Result<(), Fatal> {
        let defined = self.defined_words(phrase);
        for (i, word) in phrase.iter().copied().enumerate() {
            if !defined.contains(&word) {
                continue;
            }
            let name = self.symbol(word);
            let value = phrase
                .get(i + 2)
                .filter(|&&id| self.attribute(id) == Attribute::IntDenotation)
                .and_then(|&id| self.text(self.symbol(id)).parse::<u32>().ok());
            let priority = match value {
                Some(p @ 1..=9) => p,
                _ => {
                    let position = phrase
                        .get(i + 2)
                        .map_or(self.position(word), |&id| self.position(id));
                    self.error(
                        ErrorCode::E1008,
                        position,
                        format!("priority of \"{}\" must be a digit from 1 to 9", self.text(name)),
                    )?;
                    9
                }
            };
            let mut tag = Tag::new(table, TagKind::Priority, name);
            tag.node = Some(word);
            tag.priority = u8::try_from(priority).unwrap_or(9);
            if self.tables.add_tag(tag).is_err() {
                self.error(
                    ErrorCode::E2002,
                    self.position(word),
                    format!(
                        "tag \"{}\" is declared more than once in this range",
                        self.text(name)
                    ),
                )?;
            }
            if self.attribute(word) == Attribute::BoldTag {
                self.bold_operators.entry(table).or_default().push(name);
            }
        }
        Ok(())
    }

    fn prescan_operators(&mut self, phrase: &[NodeId], table: TableId) {
        for i in 1..phrase.len() {
            let word = phrase[i];
            if self.attribute(word) != Attribute::BoldTag
                || !self.is(phrase, i + 1, Attribute::EqualsSymbol)
            {
                continue;
            }
            // After a plan `OP (INT, INT) BOOL MAX = ...` the word follows
            // the result declarer.
            let previous = phrase[i - 1];
            let defines = matches!(
                self.attribute(previous),
                Attribute::OpSymbol | Attribute::CommaSymbol
            ) || self.is_mode_word(previous, table);
            if defines {
                let name = self.symbol(word);
                self.bold_operators.entry(table).or_default().push(name);
            }
        }
    }
}
