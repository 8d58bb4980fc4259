//! Cursor over a sibling sequence of nodes.

use a68_ir::{NodeId, Position};

/// The items of one region level, consumed left to right.
#[derive(Clone, Debug)]
pub(crate) struct Seq {
    items: Vec<NodeId>,
    index: usize,
    /// Reported when the sequence runs out.
    end: Position,
}

impl Seq {
    pub(crate) fn new(items: Vec<NodeId>, end: Position) -> Self {
        Seq {
            items,
            index: 0,
            end,
        }
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<NodeId> {
        self.items.get(self.index).copied()
    }

    #[inline]
    pub(crate) fn peek_at(&self, ahead: usize) -> Option<NodeId> {
        self.items.get(self.index + ahead).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<NodeId> {
        let item = self.peek()?;
        self.index += 1;
        Some(item)
    }

    pub(crate) fn skip(&mut self, count: usize) {
        self.index = (self.index + count).min(self.items.len());
    }

    /// Items not yet consumed.
    pub(crate) fn rest(&self) -> &[NodeId] {
        &self.items[self.index.min(self.items.len())..]
    }

    /// Consume everything that is left.
    pub(crate) fn take_rest(&mut self) -> Vec<NodeId> {
        let rest = self.rest().to_vec();
        self.index = self.items.len();
        rest
    }

    pub(crate) fn end(&self) -> Position {
        self.end
    }
}
