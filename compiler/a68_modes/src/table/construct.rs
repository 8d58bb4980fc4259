//! Constructors and derived modes.

use a68_ir::{MoidId, Name, NodeId};

use crate::moid::{ModeKind, Moid, Pack, Packs};
use crate::ModeTable;

impl ModeTable {
    // === Constructors ===

    /// `REF m`.
    pub fn ref_to(&mut self, m: MoidId) -> MoidId {
        let m = self.resolve(m);
        if let Some(r) = self[m].derived.ref_to {
            return self.resolve(r);
        }
        let r = self.intern(Moid::with_sub(ModeKind::Ref, m));
        self.moid_mut(m).derived.ref_to = Some(r);
        r
    }

    /// A row of `dim` dimensions with elements of mode `element`.
    pub fn row_of(&mut self, element: MoidId, dim: u32) -> MoidId {
        let element = self.resolve(element);
        self.intern(Moid::row(dim.max(1), element))
    }

    /// `FLEX row`.
    pub fn flex_of(&mut self, row: MoidId) -> MoidId {
        let row = self.resolve(row);
        self.intern(Moid::with_sub(ModeKind::Flex, row))
    }

    /// `PROC (params) result`.
    pub fn proc_of(&mut self, params: &[MoidId], result: MoidId) -> MoidId {
        let pack: Packs = params
            .iter()
            .map(|&p| Pack::unnamed(self.resolve(p)))
            .collect();
        let result = self.resolve(result);
        self.intern(Moid::with_pack(ModeKind::Proc, pack, Some(result)))
    }

    /// `STRUCT (fields)`; field names are kept in order.
    pub fn struct_of(&mut self, fields: &[(MoidId, Name)]) -> MoidId {
        let pack: Packs = fields
            .iter()
            .map(|&(m, text)| Pack::new(self.resolve(m), text))
            .collect();
        self.intern(Moid::with_pack(ModeKind::Struct, pack, None))
    }

    /// A union exactly as written, without absorbing or removing
    /// duplicates. Declarers use this so that indicants may still be
    /// unresolved; [`ModeTable::unite`] is the normalising form.
    pub fn union_of(&mut self, members: &[MoidId]) -> MoidId {
        let pack: Packs = members
            .iter()
            .map(|&m| Pack::unnamed(self.resolve(m)))
            .collect();
        self.intern(Moid::with_pack(ModeKind::Union, pack, None))
    }

    /// A new, unresolved mode indicant declared at `node`.
    pub fn indicant(&mut self, name: Name, node: NodeId) -> MoidId {
        self.intern(Moid {
            name,
            node: Some(node),
            ..Moid::new(ModeKind::Indicant)
        })
    }

    /// Give indicant `indicant` its declared mode.
    pub fn define_indicant(&mut self, indicant: MoidId, mode: MoidId) {
        let moid = self.moid_mut(indicant);
        if moid.kind == ModeKind::Indicant {
            moid.equivalent = Some(mode);
        }
    }

    /// Unite `members`: nested unions are absorbed and duplicates removed
    /// by equivalence. A single survivor is returned as itself.
    pub fn unite(&mut self, members: &[MoidId]) -> MoidId {
        let mut flat: Vec<MoidId> = Vec::with_capacity(members.len());
        let mut pending: Vec<MoidId> = members.iter().rev().copied().collect();
        let mut guard = 0usize;
        while let Some(m) = pending.pop() {
            guard += 1;
            if guard > self.len() + members.len() {
                break;
            }
            let m = self.resolve(m);
            if self.kind(m) == ModeKind::Union {
                pending.extend(self[m].pack.iter().rev().map(|p| p.mode));
                continue;
            }
            if !flat.iter().any(|&f| self.equivalent(f, m)) {
                flat.push(m);
            }
        }
        match flat.as_slice() {
            [] => MoidId::VOID,
            [single] => *single,
            _ => self.union_of(&flat),
        }
    }

    // === Derived modes ===

    /// The mode of one element of a row, or of a row of one dimension less.
    pub fn slice(&mut self, m: MoidId) -> Option<MoidId> {
        let m = self.resolve(m);
        if let Some(s) = self[m].derived.slice {
            return Some(self.resolve(s));
        }
        let moid = self[m].clone();
        let slice = match moid.kind {
            ModeKind::Flex => self.slice(moid.sub?)?,
            ModeKind::Row if moid.dim > 1 => self.row_of(moid.sub?, moid.dim - 1),
            ModeKind::Row => self.resolve(moid.sub?),
            _ => return None,
        };
        self.moid_mut(m).derived.slice = Some(slice);
        Some(slice)
    }

    /// `[]m`.
    pub fn multiple(&mut self, m: MoidId) -> MoidId {
        let m = self.resolve(m);
        if let Some(r) = self[m].derived.multiple {
            return self.resolve(r);
        }
        let r = self.row_of(m, 1);
        self.moid_mut(m).derived.multiple = Some(r);
        r
    }

    /// For a name of a row, the name of one of its elements:
    /// `REF [] x` gives `REF x`, `REF FLEX [,] x` gives `REF [] x`.
    pub fn name_of(&mut self, m: MoidId) -> Option<MoidId> {
        let m = self.resolve(m);
        if let Some(n) = self[m].derived.name_of {
            return Some(self.resolve(n));
        }
        if self.kind(m) != ModeKind::Ref {
            return None;
        }
        let row = self.sub(m)?;
        let element = self.slice(row)?;
        let name = self.ref_to(element);
        self.moid_mut(m).derived.name_of = Some(name);
        Some(name)
    }

    /// Mode of field `text` of a structure.
    pub fn field(&self, m: MoidId, text: Name) -> Option<MoidId> {
        let moid = self.moid(m);
        if moid.kind != ModeKind::Struct {
            return None;
        }
        moid.pack
            .iter()
            .find(|p| p.text == text)
            .map(|p| self.resolve(p.mode))
    }

    /// Canonical parameter modes of a procedure.
    pub fn parameters(&self, m: MoidId) -> Vec<MoidId> {
        let moid = self.moid(m);
        if moid.kind != ModeKind::Proc {
            return Vec::new();
        }
        moid.pack.iter().map(|p| self.resolve(p.mode)).collect()
    }

    /// Canonical members of a union, or of a union's equivalent.
    pub fn members(&self, m: MoidId) -> Vec<MoidId> {
        let moid = self.moid(m);
        if moid.kind != ModeKind::Union {
            return Vec::new();
        }
        moid.pack.iter().map(|p| self.resolve(p.mode)).collect()
    }
}
