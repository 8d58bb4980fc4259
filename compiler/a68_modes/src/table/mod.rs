//! The mode table: an append-only arena of [`Moid`]s.
//!
//! Standard modes occupy the fixed ids named by the `MoidId` constants.
//! Identical descriptors are always shared. Structural merging by
//! equivalence happens in [`ModeTable::finalise`], once every indicant has
//! been given its declared mode; after that, [`ModeTable::intern`] merges
//! new descriptors on the spot.

mod construct;

use std::ops::Index;

use a68_ir::{MoidId, StringInterner};
use rustc_hash::FxHashMap;

use crate::moid::{ModeKind, Moid, MoidFlags, MoidKey};

/// Longest `equivalent` chain followed before giving up.
const MAX_CHAIN: usize = 1024;

#[derive(Clone, Debug)]
pub struct ModeTable {
    moids: Vec<Moid>,
    keys: FxHashMap<MoidKey, MoidId>,
    finalised: bool,
}

impl ModeTable {
    /// Create a table holding the standard modes.
    pub fn new(interner: &StringInterner) -> Self {
        let mut table = ModeTable {
            moids: Vec::with_capacity(128),
            keys: FxHashMap::default(),
            finalised: false,
        };
        let named = |kind: ModeKind, name: &str| Moid {
            name: interner.intern(name),
            ..Moid::new(kind)
        };
        let standard = |name: &str| Moid::standard(interner.intern(name));

        // Order matches the `MoidId` constants.
        table.push(named(ModeKind::Void, "VOID"));
        table.push(standard("INT"));
        table.push(standard("LONG INT"));
        table.push(standard("REAL"));
        table.push(standard("LONG REAL"));
        table.push(standard("BOOL"));
        table.push(standard("CHAR"));
        table.push(standard("BITS"));
        table.push(Moid::row(1, MoidId::CHAR));
        table.push(Moid {
            name: interner.intern("STRING"),
            ..Moid::with_sub(ModeKind::Flex, MoidId::ROW_CHAR)
        });
        table.push(Moid::row(1, MoidId::BOOL));
        table.push(named(ModeKind::Hip, "HIP"));
        table.push(named(ModeKind::Error, "ERROR"));
        table.push(named(ModeKind::Undefined, "UNDEFINED"));
        table.push(named(ModeKind::Vacuum, "VACUUM"));
        table.push(named(ModeKind::Rows, "ROWS"));
        debug_assert_eq!(table.moids.len(), MoidId::PRIMITIVE_COUNT);
        table
    }

    fn push(&mut self, mut moid: Moid) -> MoidId {
        let id = MoidId::from_usize(self.moids.len());
        moid.flags = self.own_flags(&moid) | MoidFlags::WELL_FORMED;
        let components: Vec<MoidId> = moid.components().collect();
        for component in components {
            if let Some(c) = self.moids.get(component.index()) {
                moid.flags |= c.flags - MoidFlags::WELL_FORMED;
            }
        }
        self.keys.entry(MoidKey::of(&moid)).or_insert(id);
        self.moids.push(moid);
        id
    }

    fn own_flags(&self, moid: &Moid) -> MoidFlags {
        match moid.kind {
            ModeKind::Ref => MoidFlags::HAS_REF,
            ModeKind::Flex => MoidFlags::HAS_FLEX | MoidFlags::HAS_ROWS,
            ModeKind::Row | ModeKind::Rows | ModeKind::Vacuum => MoidFlags::HAS_ROWS,
            _ => MoidFlags::empty(),
        }
    }

    /// Enter a descriptor, returning an existing mode if one is identical
    /// (or, after finalising, equivalent).
    pub fn intern(&mut self, moid: Moid) -> MoidId {
        if let Some(&id) = self.keys.get(&MoidKey::of(&moid)) {
            return self.resolve(id);
        }
        let structural = moid.is_structural();
        let id = self.push(moid);
        if self.finalised && structural {
            if let Some(existing) = self.find_equivalent(id) {
                self.moids[id.index()].equivalent = Some(existing);
                let key = MoidKey::of(&self.moids[id.index()]);
                self.keys.insert(key, existing);
                return existing;
            }
        }
        id
    }

    /// An earlier canonical mode equivalent to `id`.
    fn find_equivalent(&self, id: MoidId) -> Option<MoidId> {
        let kind = self.moids[id.index()].kind;
        (0..id.index())
            .map(MoidId::from_usize)
            .filter(|&other| {
                let m = &self.moids[other.index()];
                m.kind == kind && m.equivalent.is_none()
            })
            .find(|&other| self.equivalent(id, other))
    }

    /// Follow `equivalent` links to the canonical mode.
    pub fn resolve(&self, mut id: MoidId) -> MoidId {
        for _ in 0..MAX_CHAIN {
            match self.moids.get(id.index()).and_then(|m| m.equivalent) {
                Some(next) if next != id => id = next,
                _ => return id,
            }
        }
        id
    }

    /// The canonical descriptor of `id`.
    pub fn moid(&self, id: MoidId) -> &Moid {
        &self.moids[self.resolve(id).index()]
    }

    pub(crate) fn moid_mut(&mut self, id: MoidId) -> &mut Moid {
        &mut self.moids[id.index()]
    }

    pub fn kind(&self, id: MoidId) -> ModeKind {
        self.moid(id).kind
    }

    /// Canonical sub-mode of `id`, if it has one.
    pub fn sub(&self, id: MoidId) -> Option<MoidId> {
        self.moid(id).sub.map(|s| self.resolve(s))
    }

    pub fn len(&self) -> usize {
        self.moids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moids.is_empty()
    }

    pub fn is_finalised(&self) -> bool {
        self.finalised
    }

    /// All descriptors, canonical or not, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (MoidId, &Moid)> {
        self.moids
            .iter()
            .enumerate()
            .map(|(i, m)| (MoidId::from_usize(i), m))
    }

    /// Merge equivalent modes and rewrite every component to its canonical
    /// id. Run once all indicants have been defined and checked.
    #[tracing::instrument(level = "debug", skip_all, fields(modes = self.moids.len()))]
    pub fn finalise(&mut self) {
        let count = self.moids.len();
        for i in MoidId::PRIMITIVE_COUNT..count {
            let id = MoidId::from_usize(i);
            let moid = &self.moids[i];
            if moid.kind == ModeKind::Indicant || moid.equivalent.is_some() {
                continue;
            }
            let kind = moid.kind;
            let earlier = (0..i).map(MoidId::from_usize).find(|&other| {
                let m = &self.moids[other.index()];
                m.kind == kind && m.equivalent.is_none() && self.equivalent(id, other)
            });
            if let Some(earlier) = earlier {
                tracing::trace!(?id, ?earlier, "merged equivalent modes");
                self.moids[i].equivalent = Some(earlier);
            }
        }

        for i in 0..count {
            let sub = self.moids[i].sub.map(|s| self.resolve(s));
            let pack: Vec<MoidId> = self.moids[i]
                .pack
                .iter()
                .map(|p| self.resolve(p.mode))
                .collect();
            let moid = &mut self.moids[i];
            moid.sub = sub;
            for (p, mode) in moid.pack.iter_mut().zip(pack) {
                p.mode = mode;
            }
        }

        // Recursive modes are shown by the name of their indicant.
        for i in 0..count {
            if self.moids[i].kind != ModeKind::Indicant {
                continue;
            }
            let target = self.resolve(MoidId::from_usize(i));
            let name = self.moids[i].name;
            let moid = &mut self.moids[target.index()];
            if !target.is_primitive() && moid.name.is_empty() && moid.kind != ModeKind::Indicant {
                moid.name = name;
            }
        }

        self.propagate_flags();

        self.keys.clear();
        for i in 0..count {
            let id = MoidId::from_usize(i);
            let canonical = self.resolve(id);
            let key = MoidKey::of(&self.moids[i]);
            if canonical == id {
                self.keys.insert(key, id);
            } else {
                self.keys.entry(key).or_insert(canonical);
            }
        }
        self.finalised = true;
    }

    /// Recompute presence flags to a fixed point; recursive modes need more
    /// than one sweep.
    fn propagate_flags(&mut self) {
        const PRESENCE: MoidFlags = MoidFlags::HAS_REF
            .union(MoidFlags::HAS_FLEX)
            .union(MoidFlags::HAS_ROWS);
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.moids.len() {
                let moid = &self.moids[i];
                let mut flags = self.own_flags(moid);
                if let Some(target) = moid.equivalent {
                    flags |= self.moids[target.index()].flags & PRESENCE;
                }
                for component in moid.components() {
                    flags |= self.moids[component.index()].flags & PRESENCE;
                }
                let old = self.moids[i].flags;
                let new = (old - PRESENCE) | flags;
                if new != old {
                    self.moids[i].flags = new;
                    changed = true;
                }
            }
        }
    }
}

impl Index<MoidId> for ModeTable {
    type Output = Moid;

    fn index(&self, id: MoidId) -> &Moid {
        &self.moids[id.index()]
    }
}

#[cfg(test)]
mod tests;
