//! Removal of FLEX from modes.

use a68_ir::MoidId;

use crate::moid::{ModeKind, MoidFlags};
use crate::ModeTable;

/// How much FLEX to strip before comparing modes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Deflexing {
    /// Compare modes as they are.
    #[default]
    No,
    /// Strip FLEX everywhere except beneath a REF.
    Safe,
    /// As `Safe`, but also strip FLEX directly beneath an outermost REF.
    Alias,
    /// Strip every FLEX.
    Force,
}

impl Deflexing {
    fn slot(self) -> Option<usize> {
        match self {
            Deflexing::No => None,
            Deflexing::Safe => Some(0),
            Deflexing::Alias => Some(1),
            Deflexing::Force => Some(2),
        }
    }
}

impl ModeTable {
    /// `m` with FLEX removed as `how` prescribes. Memoised on `m`.
    pub fn deflex(&mut self, m: MoidId, how: Deflexing) -> MoidId {
        let mut active = Vec::new();
        self.deflex_under(m, how, &mut active)
    }

    fn deflex_under(&mut self, m: MoidId, how: Deflexing, active: &mut Vec<MoidId>) -> MoidId {
        let m = self.resolve(m);
        let Some(slot) = how.slot() else {
            return m;
        };
        if !self[m].flags.contains(MoidFlags::HAS_FLEX) {
            return m;
        }
        if let Some(d) = self[m].derived.deflexed[slot] {
            return self.resolve(d);
        }
        // A recursive mode is left as it is at the point it recurs.
        if active.contains(&m) {
            return m;
        }
        active.push(m);

        let moid = self[m].clone();
        let inner = if how == Deflexing::Alias {
            Deflexing::Safe
        } else {
            how
        };
        let result = match moid.kind {
            ModeKind::Flex => match moid.sub {
                Some(row) => self.deflex_under(row, inner, active),
                None => m,
            },
            ModeKind::Ref => match (how, moid.sub) {
                (Deflexing::Force, Some(sub)) => {
                    let sub = self.deflex_under(sub, Deflexing::Force, active);
                    self.ref_to(sub)
                }
                (Deflexing::Alias, Some(sub)) => {
                    let mut sub = self.resolve(sub);
                    if self.kind(sub) == ModeKind::Flex {
                        if let Some(row) = self.sub(sub) {
                            sub = row;
                        }
                    }
                    let sub = self.deflex_under(sub, Deflexing::Safe, active);
                    self.ref_to(sub)
                }
                _ => m,
            },
            ModeKind::Row => match moid.sub {
                Some(element) => {
                    let element = self.deflex_under(element, inner, active);
                    self.row_of(element, moid.dim)
                }
                None => m,
            },
            ModeKind::Proc => {
                let params: Vec<MoidId> = moid
                    .pack
                    .iter()
                    .map(|p| self.deflex_under(p.mode, inner, active))
                    .collect();
                match moid.sub {
                    Some(result) => {
                        let result = self.deflex_under(result, inner, active);
                        self.proc_of(&params, result)
                    }
                    None => m,
                }
            }
            ModeKind::Struct => {
                let fields: Vec<_> = moid
                    .pack
                    .iter()
                    .map(|p| (self.deflex_under(p.mode, inner, active), p.text))
                    .collect();
                self.struct_of(&fields)
            }
            ModeKind::Union => {
                let members: Vec<MoidId> = moid
                    .pack
                    .iter()
                    .map(|p| self.deflex_under(p.mode, inner, active))
                    .collect();
                self.unite(&members)
            }
            _ => m,
        };

        active.pop();
        self.moid_mut(m).derived.deflexed[slot] = Some(result);
        result
    }
}
