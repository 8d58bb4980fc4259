//! Syntax tree nodes and the node arena.
//!
//! The tree is threaded: each node has a `sub` link to its first child and
//! `next`/`previous` links to its siblings, plus a `parent` back-link.
//! Sibling lists have arbitrary arity. Nodes are allocated from a
//! [`Tree`] arena, referred to by [`NodeId`], and never freed individually;
//! later passes fill in `mode`, `tag` and `info` in place.

use std::ops::{Index, IndexMut};

mod format;

use crate::{Attribute, MoidId, Name, NodeId, Position, TableId, TagId};

/// Property slot filled by passes after parsing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeInfo {
    /// The construct failed to bind or check; downstream passes stay quiet.
    pub erroneous: bool,
    /// Generator or variable declaration allocates on the heap.
    pub heap: bool,
    /// Operator priority, for dyadic operator tokens.
    pub priority: u8,
    /// Scope level computed by the scope checker.
    pub scope: Option<u32>,
}

/// A syntax tree element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub attribute: Attribute,
    /// Token text: identifier, bold word, operator symbol or denotation.
    pub symbol: Name,
    pub position: Position,
    pub sub: Option<NodeId>,
    pub next: Option<NodeId>,
    pub previous: Option<NodeId>,
    pub parent: Option<NodeId>,
    /// Resolved mode; `None` until mode collection or checking reaches it.
    pub mode: Option<MoidId>,
    /// Symbol table of the range this node belongs to.
    pub table: TableId,
    /// Bound declaration, for applied and defining occurrences.
    pub tag: Option<TagId>,
    pub info: NodeInfo,
}

impl Node {
    pub fn new(attribute: Attribute, symbol: Name, position: Position, table: TableId) -> Self {
        Node {
            attribute,
            symbol,
            position,
            sub: None,
            next: None,
            previous: None,
            parent: None,
            mode: None,
            table,
            tag: None,
            info: NodeInfo::default(),
        }
    }
}

/// Arena of syntax tree nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Tree { nodes: Vec::new() }
    }

    /// Allocate a node, returning its handle.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocate an unlinked node.
    pub fn new_node(
        &mut self,
        attribute: Attribute,
        symbol: Name,
        position: Position,
        table: TableId,
    ) -> NodeId {
        self.push(Node::new(attribute, symbol, position, table))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Make `children` the complete, ordered child list of `parent`.
    ///
    /// Existing sibling links of the children are overwritten.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) {
        self[parent].sub = children.first().copied();
        let mut previous = None;
        for &child in children {
            let node = &mut self[child];
            node.parent = Some(parent);
            node.previous = previous;
            node.next = None;
            if let Some(prev) = previous {
                self[prev].next = Some(child);
            }
            previous = Some(child);
        }
    }

    /// Allocate a node and give it `children` in one step.
    pub fn reduce(
        &mut self,
        attribute: Attribute,
        position: Position,
        table: TableId,
        children: &[NodeId],
    ) -> NodeId {
        let id = self.new_node(attribute, Name::EMPTY, position, table);
        self.set_children(id, children);
        id
    }

    /// Iterate over the children of `id` in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self[id].sub,
        }
    }

    /// Children of `id` collected into a vector.
    pub fn child_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    /// The `n`th child of `id`, if present.
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.children(id).nth(n)
    }

    /// First child of `id` with the given attribute.
    pub fn find_child(&self, id: NodeId, attribute: Attribute) -> Option<NodeId> {
        self.children(id).find(|&c| self[c].attribute == attribute)
    }

    /// Splice a new node with `attribute` and `mode` between `child` and
    /// its parent, taking `child`'s place in the sibling chain.
    pub fn wrap(&mut self, child: NodeId, attribute: Attribute, mode: MoidId) -> NodeId {
        let (position, table, parent, previous, next) = {
            let node = &self[child];
            (
                node.position,
                node.table,
                node.parent,
                node.previous,
                node.next,
            )
        };
        let wrapper = self.new_node(attribute, Name::EMPTY, position, table);
        {
            let node = &mut self[wrapper];
            node.mode = Some(mode);
            node.parent = parent;
            node.previous = previous;
            node.next = next;
            node.sub = Some(child);
        }
        if let Some(prev) = previous {
            self[prev].next = Some(wrapper);
        }
        if let Some(next) = next {
            self[next].previous = Some(wrapper);
        }
        if let Some(parent) = parent {
            if self[parent].sub == Some(child) {
                self[parent].sub = Some(wrapper);
            }
        }
        let node = &mut self[child];
        node.parent = Some(wrapper);
        node.previous = None;
        node.next = None;
        wrapper
    }

    /// All nodes of the subtree rooted at `root`, in pre-order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let start = stack.len();
            stack.extend(self.children(id));
            stack[start..].reverse();
        }
        order
    }

    /// Nearest ancestor of `id` (excluding `id`) with the given attribute.
    pub fn ancestor(&self, id: NodeId, attribute: Attribute) -> Option<NodeId> {
        let mut cursor = self[id].parent;
        while let Some(p) = cursor {
            if self[p].attribute == attribute {
                return Some(p);
            }
            cursor = self[p].parent;
        }
        None
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

/// Iterator over a node's children, following `next` links.
pub struct Children<'a> {
    tree: &'a Tree,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.cursor?;
        self.cursor = self.tree[current].next;
        Some(current)
    }
}
