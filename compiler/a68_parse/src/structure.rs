//! Bottom-up structure reduction.
//!
//! Every token becomes a leaf node. Each innermost bracket pair is then
//! reduced, with its contents, to a single region node that keeps the
//! opener's attribute and position; the closer is dropped. What is left is
//! a tree whose levels are the bracket levels of the program.

use a68_ir::{NodeId, TableId};
use a68_lexer::Token;

use crate::Parser;

/// Build leaves and region nodes, returning the outermost level.
///
/// Brackets are known to be balanced; leftovers of a broken nesting are
/// kept at the level where they were found.
pub(crate) fn reduce_brackets(parser: &mut Parser<'_>, tokens: &[Token]) -> Vec<NodeId> {
    // Each frame holds a region node and the items collected inside it.
    let mut stack: Vec<(Option<NodeId>, Vec<NodeId>)> = vec![(None, Vec::new())];
    for token in tokens {
        if token.attribute.opener_of().is_some() && stack.len() > 1 {
            if let Some((Some(region), items)) = stack.pop() {
                parser.tree.set_children(region, &items);
                if let Some((_, outer)) = stack.last_mut() {
                    outer.push(region);
                }
                continue;
            }
        }
        let leaf = parser.tree.new_node(
            token.attribute,
            token.symbol,
            token.position,
            TableId::STANDARD,
        );
        if token.attribute.closer_of().is_some() {
            stack.push((Some(leaf), Vec::new()));
        } else if let Some((_, items)) = stack.last_mut() {
            items.push(leaf);
        }
    }
    // Close whatever is still open.
    while stack.len() > 1 {
        if let Some((Some(region), items)) = stack.pop() {
            parser.tree.set_children(region, &items);
            if let Some((_, outer)) = stack.last_mut() {
                outer.push(region);
            }
        }
    }
    stack.pop().map(|(_, items)| items).unwrap_or_default()
}
