//! Binding applied occurrences.
//!
//! Each applied identifier, indicant and label is looked up in its own
//! range first and then outward, so the nearest declaration wins. A failed
//! lookup is reported once per occurrence and the node is marked erroneous;
//! binding carries on with the rest of the tree.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, Namespace, NodeId, TagId};

use crate::Binder;

impl Binder<'_> {
    pub(crate) fn bind_tags(&mut self, top: NodeId) -> Result<(), Fatal> {
        let mut unresolved = 0usize;
        for id in self.tree.descendants(top) {
            let bound = match self.attribute(id) {
                Attribute::Identifier => self.bind_identifier(id)?,
                Attribute::Indicant => self.bind(id, Namespace::Indicant, ErrorCode::E2003)?,
                Attribute::Jump if !self.tree[id].symbol.is_empty() => {
                    self.bind(id, Namespace::Label, ErrorCode::E2004)?
                }
                _ => true,
            };
            if !bound {
                unresolved += 1;
            }
        }
        tracing::debug!(unresolved, "bound tags");
        Ok(())
    }

    /// An identifier that only a label answers to is a jump to that label.
    fn bind_identifier(&mut self, id: NodeId) -> Result<bool, Fatal> {
        let node = &self.tree[id];
        let (table, name) = (node.table, node.symbol);
        if let Some(tag) = self.tables.lookup(table, Namespace::Identifier, name) {
            self.link(id, tag);
            return Ok(true);
        }
        if let Some(tag) = self.tables.lookup(table, Namespace::Label, name) {
            self.tree[id].attribute = Attribute::Jump;
            self.link(id, tag);
            return Ok(true);
        }
        self.unresolved(id, ErrorCode::E2001)
    }

    fn bind(&mut self, id: NodeId, namespace: Namespace, code: ErrorCode) -> Result<bool, Fatal> {
        let node = &self.tree[id];
        match self.tables.lookup(node.table, namespace, node.symbol) {
            Some(tag) => {
                self.link(id, tag);
                Ok(true)
            }
            None => self.unresolved(id, code),
        }
    }

    fn link(&mut self, id: NodeId, tag: TagId) {
        self.tree[id].tag = Some(tag);
        self.tables.tag_mut(tag).used = true;
    }

    fn unresolved(&mut self, id: NodeId, code: ErrorCode) -> Result<bool, Fatal> {
        let node = &mut self.tree[id];
        node.info.erroneous = true;
        let (position, name) = (node.position, node.symbol);
        self.undeclared(code, position, name)?;
        Ok(false)
    }
}
