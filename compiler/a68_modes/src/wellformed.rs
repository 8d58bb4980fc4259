//! Well-formedness of recursive mode declarations.
//!
//! A cycle through an indicant's own definition must pass a REF or PROC
//! (so values have finite size) and a STRUCT or PROC (so the mode is not
//! merely another name for itself).

use a68_ir::MoidId;

use crate::moid::{ModeKind, MoidFlags};
use crate::ModeTable;

impl ModeTable {
    /// Whether indicant `indicant` specifies a well formed mode.
    pub fn is_well_formed(&self, indicant: MoidId) -> bool {
        if self[indicant].kind != ModeKind::Indicant {
            return true;
        }
        let Some(definition) = self[indicant].equivalent else {
            return true;
        };
        let mut visited = Vec::new();
        self.cycle_ok(indicant, definition, false, false, &mut visited)
    }

    fn cycle_ok(
        &self,
        origin: MoidId,
        m: MoidId,
        yin: bool,
        yang: bool,
        visited: &mut Vec<(MoidId, bool, bool)>,
    ) -> bool {
        if m == origin {
            return yin && yang;
        }
        if visited.contains(&(m, yin, yang)) {
            return true;
        }
        visited.push((m, yin, yang));
        let moid = &self[m];
        match moid.kind {
            ModeKind::Indicant => match moid.equivalent {
                Some(next) => self.cycle_ok(origin, next, yin, yang, visited),
                None => true,
            },
            ModeKind::Ref => moid
                .sub
                .map_or(true, |sub| self.cycle_ok(origin, sub, true, yang, visited)),
            ModeKind::Proc => moid
                .components()
                .all(|c| self.cycle_ok(origin, c, true, true, visited)),
            ModeKind::Struct => moid
                .components()
                .all(|c| self.cycle_ok(origin, c, yin, true, visited)),
            ModeKind::Row | ModeKind::Flex | ModeKind::Union => moid
                .components()
                .all(|c| self.cycle_ok(origin, c, yin, yang, visited)),
            _ => true,
        }
    }

    /// Check every indicant. Ill-formed ones are redirected to ERROR and
    /// returned so the caller can report them.
    pub fn check_indicants(&mut self) -> Vec<MoidId> {
        let indicants: Vec<MoidId> = self
            .iter()
            .filter(|(_, m)| m.kind == ModeKind::Indicant)
            .map(|(id, _)| id)
            .collect();
        let bad: Vec<MoidId> = indicants
            .into_iter()
            .filter(|&id| !self.is_well_formed(id))
            .collect();
        for &id in &bad {
            let moid = self.moid_mut(id);
            moid.equivalent = Some(MoidId::ERROR);
            moid.flags.remove(MoidFlags::WELL_FORMED);
        }
        bad
    }
}
