//! Entering defining occurrences into their ranges.

use a68_diagnostic::Fatal;
use a68_ir::{Attribute, Namespace, NodeId, Tag, TagKind};

use crate::Binder;

impl Binder<'_> {
    pub(crate) fn collect_tags(&mut self, top: NodeId) -> Result<(), Fatal> {
        for id in self.tree.descendants(top) {
            match self.attribute(id) {
                Attribute::DefiningIdentifier => self.defining_identifier(id)?,
                Attribute::Label => self.enter(id, TagKind::Label)?,
                Attribute::DefiningOperator => self.defining_operator(id)?,
                Attribute::DefiningIndicant => self.attach(id, Namespace::Indicant),
                _ => {}
            }
        }
        tracing::debug!(tags = self.tables.tag_count(), "collected tags");
        Ok(())
    }

    fn defining_identifier(&mut self, id: NodeId) -> Result<(), Fatal> {
        let kind = match self.parent_attribute(id) {
            // Field selectors live in their structure mode, not in a range.
            Some(Attribute::Field) | None => return Ok(()),
            Some(Attribute::Parameter) => TagKind::ParameterIdentifier,
            Some(Attribute::Specifier) => TagKind::SpecifierIdentifier,
            Some(Attribute::ForPart) => TagKind::LoopIdentifier,
            Some(_) => TagKind::NormalIdentifier,
        };
        self.enter(id, kind)
    }

    fn defining_operator(&mut self, id: NodeId) -> Result<(), Fatal> {
        match self.parent_attribute(id) {
            Some(Attribute::OperatorDeclaration) => self.enter(id, TagKind::Operator),
            Some(Attribute::PriorityDeclaration) => {
                self.attach(id, Namespace::Priority);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Enter a new tag of `kind` for defining occurrence `id`.
    fn enter(&mut self, id: NodeId, kind: TagKind) -> Result<(), Fatal> {
        let node = &self.tree[id];
        let (name, position) = (node.symbol, node.position);
        let heap = node
            .parent
            .is_some_and(|p| self.tree[p].info.heap);
        let tag = Tag {
            node: Some(id),
            heap,
            ..Tag::new(node.table, kind, name)
        };
        match self.tables.add_tag(tag) {
            Ok(tag) => {
                self.tree[id].tag = Some(tag);
                Ok(())
            }
            Err(_) => {
                self.tree[id].info.erroneous = true;
                self.multiply_declared(position, name)
            }
        }
    }

    /// Link a defining occurrence to the tag the parser entered for it.
    fn attach(&mut self, id: NodeId, namespace: Namespace) {
        let node = &self.tree[id];
        let tag = self
            .tables
            .find_local(node.table, namespace, node.symbol)
            .filter(|&tag| self.tables.tag(tag).node == Some(id));
        self.tree[id].tag = tag;
    }
}
