//! Warnings for declarations that are never applied.

use a68_diagnostic::{Diagnostic, Diagnostics, ErrorCode, Fatal};
use a68_ir::{Access, Module, TagKind};

/// Warn about every program tag that no applied occurrence binds to.
///
/// Only runs when the `unused` option is set. Priorities and compiler
/// tags are never reported.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_unused(module: &mut Module, diagnostics: &mut Diagnostics) -> Result<(), Fatal> {
    if !module.options.unused {
        return Ok(());
    }
    let unused: Vec<_> = module
        .tables
        .tags()
        .filter(|(_, tag)| {
            tag.access == Access::Public
                && !tag.used
                && !matches!(tag.kind, TagKind::Priority | TagKind::Anonymous)
        })
        .filter_map(|(_, tag)| Some((tag.node?, tag.name)))
        .collect();
    tracing::debug!(unused = unused.len(), "unused tags");
    for (node, name) in unused {
        let position = module.tree[node].position;
        let message = format!("tag \"{}\" is not used", module.text(name));
        diagnostics.report(
            &mut module.lines,
            Diagnostic::warning(ErrorCode::W0001, position, message),
        )?;
    }
    Ok(())
}
