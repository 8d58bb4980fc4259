//! Making implicit conversions explicit.

use a68_diagnostic::{Diagnostics, Fatal};
use a68_ir::{MoidId, Module};
use a68_modes::ModeTable;

use crate::Expectations;

/// Splice one node per coercion step between each unit and its context.
///
/// The unit keeps its a priori mode; each wrapper carries the mode its
/// step yields, so the outermost wrapper has the mode the context required.
/// Returns the number of nodes inserted.
#[tracing::instrument(level = "debug", skip_all, fields(expectations = expectations.len()))]
pub fn insert_coercions(
    module: &mut Module,
    modes: &mut ModeTable,
    expectations: &Expectations,
) -> Result<usize, Fatal> {
    let mut inserted = 0;
    for (id, required) in expectations.sorted() {
        let Some(yielded) = module.tree[id].mode else {
            continue;
        };
        if yielded == MoidId::ERROR || required.is_open() {
            continue;
        }
        let steps = modes
            .coercion_path(yielded, required.mode, required.sort, required.deflexing)
            .ok_or_else(|| {
                Diagnostics::internal(format!(
                    "no coercion from {} to {} for a checked unit",
                    modes.describe(yielded, &module.interner),
                    modes.describe(required.mode, &module.interner)
                ))
            })?;
        let mut inner = id;
        for step in steps {
            inner = module.tree.wrap(inner, step.coercion.attribute(), step.mode);
            inserted += 1;
        }
    }
    tracing::debug!(inserted, "inserted coercions");
    Ok(inserted)
}
