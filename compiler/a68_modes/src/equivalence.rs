//! Structural equivalence of modes.
//!
//! Two modes are equivalent when they have the same shape. Recursive modes
//! are compared under postulates: while `(a, b)` is being compared it is
//! assumed to hold, so comparing a cycle against itself terminates.

use a68_ir::MoidId;

use crate::moid::ModeKind;
use crate::ModeTable;

/// Assumptions made while comparing recursive modes.
type Postulates = Vec<(MoidId, MoidId)>;

impl ModeTable {
    /// Whether `a` and `b` denote the same mode.
    pub fn equivalent(&self, a: MoidId, b: MoidId) -> bool {
        let mut postulates = Postulates::new();
        self.equivalent_under(a, b, &mut postulates)
    }

    fn equivalent_under(&self, a: MoidId, b: MoidId, postulates: &mut Postulates) -> bool {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if a == b {
            return true;
        }
        if postulates
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
        {
            return true;
        }
        let (ma, mb) = (&self[a], &self[b]);
        if ma.kind != mb.kind || (ma.kind != ModeKind::Union && ma.dim != mb.dim) {
            return false;
        }
        if !ma.is_structural() {
            // Standard modes, indicants and the special modes are unique.
            return false;
        }

        let mark = postulates.len();
        postulates.push((a, b));
        let same = match ma.kind {
            ModeKind::Ref | ModeKind::Row | ModeKind::Flex => {
                self.same_sub(ma.sub, mb.sub, postulates)
            }
            ModeKind::Proc => {
                ma.pack
                    .iter()
                    .zip(&mb.pack)
                    .all(|(x, y)| self.equivalent_under(x.mode, y.mode, postulates))
                    && self.same_sub(ma.sub, mb.sub, postulates)
            }
            ModeKind::Struct => ma.pack.iter().zip(&mb.pack).all(|(x, y)| {
                x.text == y.text && self.equivalent_under(x.mode, y.mode, postulates)
            }),
            ModeKind::Union => {
                self.covers(a, b, postulates) && self.covers(b, a, postulates)
            }
            _ => false,
        };
        if !same {
            postulates.truncate(mark);
        }
        same
    }

    fn same_sub(
        &self,
        a: Option<MoidId>,
        b: Option<MoidId>,
        postulates: &mut Postulates,
    ) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.equivalent_under(a, b, postulates),
            (None, None) => true,
            _ => false,
        }
    }

    /// Every member of union `a` has an equivalent member in union `b`.
    fn covers(&self, a: MoidId, b: MoidId, postulates: &mut Postulates) -> bool {
        self[a].pack.iter().all(|x| {
            self[b].pack.iter().any(|y| {
                let mark = postulates.len();
                let found = self.equivalent_under(x.mode, y.mode, postulates);
                if !found {
                    postulates.truncate(mark);
                }
                found
            })
        })
    }

    /// Whether union `inner` is a subset of union `outer`, member by member.
    pub fn is_subset(&self, inner: MoidId, outer: MoidId) -> bool {
        let inner = self.resolve(inner);
        let outer = self.resolve(outer);
        self.kind(inner) == ModeKind::Union
            && self.kind(outer) == ModeKind::Union
            && self
                .members(inner)
                .into_iter()
                .all(|m| self.members(outer).into_iter().any(|o| self.equivalent(m, o)))
    }
}
