//! Lexical level bounds per source line.

use a68_ir::Module;

/// Record on each source line the range of lexical and procedure levels of
/// the nodes that start on it, and the first such node.
#[tracing::instrument(level = "debug", skip_all)]
pub fn set_levels(module: &mut Module) {
    let Some(top) = module.top else {
        return;
    };
    for id in module.tree.descendants(top) {
        let node = &module.tree[id];
        let table = &module.tables[node.table];
        let Some(line) = module.lines.get_mut(node.position.line) else {
            continue;
        };
        line.note_level(table.level, table.proc_level);
        line.top_node.get_or_insert(id);
    }
}
