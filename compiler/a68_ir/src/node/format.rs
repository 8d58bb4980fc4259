//! S-expression rendering of subtrees, for tests and trace output.

use std::fmt::Write;

use crate::{NodeId, StringInterner, Tree};

impl Tree {
    /// Render the subtree at `root` as `(Attribute "symbol" children...)`.
    ///
    /// The symbol is omitted when empty; leaves without a symbol print as
    /// the bare attribute name.
    pub fn format(&self, root: NodeId, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.format_into(root, interner, &mut out);
        out
    }

    fn format_into(&self, id: NodeId, interner: &StringInterner, out: &mut String) {
        let node = &self[id];
        let bare = node.symbol.is_empty() && node.sub.is_none();
        if bare {
            let _ = write!(out, "{:?}", node.attribute);
            return;
        }
        let _ = write!(out, "({:?}", node.attribute);
        if !node.symbol.is_empty() {
            let _ = write!(out, " {:?}", interner.lookup(node.symbol));
        }
        for child in self.children(id) {
            out.push(' ');
            self.format_into(child, interner, out);
        }
        out.push(')');
    }
}
