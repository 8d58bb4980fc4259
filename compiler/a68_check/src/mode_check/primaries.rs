//! Assignations, relations, calls, slices, selections, casts and
//! generators.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, MoidId, NodeId};
use a68_modes::{Deflexing, ModeKind, Sort};

use super::Checker;
use crate::Soid;

/// Bound on the deproceduring and dereferencing done to reach a mode.
const MAX_UNWRAP: usize = 32;

impl Checker<'_> {
    /// `[destination, source]`: the destination is a soft name, the source
    /// a strong value of the mode it refers to.
    pub(super) fn assignation(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[destination, source] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let yielded = self.unit(destination, Soid::open(Sort::Soft))?;
        let name = match self.soft_name(yielded) {
            Some(name) => name,
            None => {
                if yielded != MoidId::ERROR {
                    let message = format!("{} is not a name", self.describe(yielded));
                    self.error(ErrorCode::E3007, destination, message)?;
                }
                self.unit(source, Soid::open(Sort::Strong))?;
                return Ok(MoidId::ERROR);
            }
        };
        self.coerce(destination, yielded, Soid::new(Sort::Soft, name))?;
        let value = self.modes.sub(name).unwrap_or(MoidId::ERROR);
        self.unit(source, Soid::strong(value))?;
        Ok(name)
    }

    /// `a :=: b`: both sides are names of one mode once the side with the
    /// extra REF is dereferenced. NIL takes the mode of the other side.
    pub(super) fn identity_relation(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[left, right] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let a = self.unit(left, Soid::open(Sort::Soft))?;
        let b = self.unit(right, Soid::open(Sort::Soft))?;
        if a == MoidId::ERROR || b == MoidId::ERROR {
            return Ok(MoidId::BOOL);
        }
        match (a == MoidId::HIP, b == MoidId::HIP) {
            (true, true) => {}
            (true, false) => self.relate_to_nil(right, b, left)?,
            (false, true) => self.relate_to_nil(left, a, right)?,
            (false, false) => self.relate_names(left, a, right, b)?,
        }
        Ok(MoidId::BOOL)
    }

    fn relate_to_nil(&mut self, side: NodeId, mode: MoidId, nil: NodeId) -> Result<(), Fatal> {
        let Some(name) = self.soft_name(mode) else {
            let message = format!("{} is not a name", self.describe(mode));
            return self.error(ErrorCode::E3007, side, message);
        };
        self.coerce(side, mode, Soid::new(Sort::Soft, name))?;
        self.coerce(nil, MoidId::HIP, Soid::strong(name))?;
        Ok(())
    }

    fn relate_names(&mut self, left: NodeId, a: MoidId, right: NodeId, b: MoidId) -> Result<(), Fatal> {
        let (Some(x), Some(y)) = (self.soft_name(a), self.soft_name(b)) else {
            let (side, mode) = if self.soft_name(a).is_none() { (left, a) } else { (right, b) };
            let message = format!("{} is not a name", self.describe(mode));
            return self.error(ErrorCode::E3007, side, message);
        };
        if self.modes.equivalent(x, y) {
            self.coerce(left, a, Soid::new(Sort::Soft, x))?;
            self.coerce(right, b, Soid::new(Sort::Soft, y))?;
        } else if self.modes.is_coercible(x, y, Sort::Meek, Deflexing::Safe) {
            self.coerce(left, a, Soid::new(Sort::Meek, y))?;
            self.coerce(right, b, Soid::new(Sort::Soft, y))?;
        } else {
            self.coerce(left, a, Soid::new(Sort::Soft, x))?;
            self.coerce(right, b, Soid::new(Sort::Meek, x))?;
        }
        Ok(())
    }

    /// `ANDF` and `ORF`: two meek booleans.
    pub(super) fn boolean_function(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        for operand in self.tree.child_vec(id) {
            self.unit(operand, Soid::new(Sort::Meek, MoidId::BOOL))?;
        }
        Ok(MoidId::BOOL)
    }

    /// `[primary, ArgumentList]`: a meek procedure and strong arguments.
    pub(super) fn call(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[primary, list] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let arguments = self.tree.child_vec(list);
        let yielded = self.unit(primary, Soid::open(Sort::Meek))?;
        let procedure = match self.meek_procedure(yielded, arguments.is_empty()) {
            Some(procedure) => procedure,
            None => {
                if yielded != MoidId::ERROR {
                    let message = format!("{} cannot be called", self.describe(yielded));
                    self.error(ErrorCode::E3005, primary, message)?;
                }
                self.open_units(&arguments)?;
                return Ok(MoidId::ERROR);
            }
        };
        self.coerce(primary, yielded, Soid::new(Sort::Meek, procedure))?;
        let parameters = self.modes.parameters(procedure);
        let result = self.modes.sub(procedure).unwrap_or(MoidId::ERROR);
        if parameters.len() != arguments.len() {
            let message = format!(
                "{} takes {} arguments but is given {}",
                self.describe(procedure),
                parameters.len(),
                arguments.len()
            );
            self.error(ErrorCode::E3005, list, message)?;
            self.open_units(&arguments)?;
            return Ok(result);
        }
        for (&argument, &parameter) in arguments.iter().zip(&parameters) {
            self.unit(argument, Soid::strong(parameter))?;
        }
        Ok(result)
    }

    /// `[primary, Indexer]`: a weak row or name of a row, with one
    /// subscript or trimmer per dimension.
    pub(super) fn slice(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[primary, indexer] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let yielded = self.unit(primary, Soid::open(Sort::Weak))?;
        let indices = self.tree.child_vec(indexer);
        let mut trimmers = 0u32;
        for &index in &indices {
            if self.attribute(index) == Attribute::Trimmer {
                trimmers += 1;
                for bound in self.tree.child_vec(index) {
                    for unit in self.tree.child_vec(bound) {
                        self.unit(unit, Soid::new(Sort::Meek, MoidId::INT))?;
                    }
                }
            } else {
                self.unit(index, Soid::new(Sort::Meek, MoidId::INT))?;
            }
        }
        if yielded == MoidId::ERROR {
            return Ok(MoidId::ERROR);
        }
        let Some(target) = self.weak_towards(yielded, &[ModeKind::Row, ModeKind::Flex]) else {
            let message = format!("{} cannot be sliced", self.describe(yielded));
            self.error(ErrorCode::E3001, primary, message)?;
            return Ok(MoidId::ERROR);
        };
        self.coerce(primary, yielded, Soid::new(Sort::Weak, target))?;

        let is_name = self.modes.kind(target) == ModeKind::Ref;
        let mut row = if is_name {
            self.modes.sub(target).unwrap_or(MoidId::ERROR)
        } else {
            target
        };
        if self.modes.kind(row) == ModeKind::Flex {
            row = self.modes.sub(row).unwrap_or(MoidId::ERROR);
        }
        let (dim, element) = {
            let moid = self.modes.moid(row);
            (moid.dim, moid.sub.unwrap_or(MoidId::ERROR))
        };
        if usize::try_from(dim).ok() != Some(indices.len()) {
            let message = format!("wrong number of indices for {}", self.describe(row));
            self.error(ErrorCode::E3010, indexer, message)?;
            return Ok(MoidId::ERROR);
        }
        let element = self.modes.resolve(element);
        let mode = if trimmers == 0 {
            element
        } else {
            self.modes.row_of(element, trimmers)
        };
        Ok(if is_name { self.modes.ref_to(mode) } else { mode })
    }

    /// `field OF secondary`: selecting from a weak structure or name of a
    /// structure.
    pub(super) fn selection(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let field = self.tree[id].symbol;
        let Some(secondary) = self.tree.child(id, 0) else {
            return Ok(MoidId::ERROR);
        };
        let yielded = self.unit(secondary, Soid::open(Sort::Weak))?;
        if yielded == MoidId::ERROR {
            return Ok(MoidId::ERROR);
        }
        let target = self.weak_towards(yielded, &[ModeKind::Struct]);
        let is_name = target.is_some_and(|t| self.modes.kind(t) == ModeKind::Ref);
        let structure = match target {
            Some(t) if is_name => self.modes.sub(t),
            other => other,
        };
        let Some((target, mode)) = target.zip(structure.and_then(|s| self.modes.field(s, field)))
        else {
            let message = format!(
                "{} has no field \"{}\"",
                self.describe(yielded),
                self.interner.lookup(field)
            );
            self.error(ErrorCode::E3004, id, message)?;
            return Ok(MoidId::ERROR);
        };
        self.coerce(secondary, yielded, Soid::new(Sort::Weak, target))?;
        Ok(if is_name { self.modes.ref_to(mode) } else { mode })
    }

    /// `[declarer, enclosed]`: the enclosed clause is strong.
    pub(super) fn cast(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[declarer, enclosed] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let mode = self.declared_mode(declarer);
        self.unit(enclosed, Soid::strong(mode))?;
        Ok(mode)
    }

    /// `LOC` or `HEAP` declarer: a name of the declarer's mode.
    pub(super) fn generator(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let Some(declarer) = self.tree.child(id, 0) else {
            return Ok(MoidId::ERROR);
        };
        self.actual_bounds(declarer)?;
        let mode = self.declared_mode(declarer);
        if mode == MoidId::ERROR {
            return Ok(MoidId::ERROR);
        }
        Ok(self.modes.ref_to(mode))
    }

    fn open_units(&mut self, units: &[NodeId]) -> Result<(), Fatal> {
        for &unit in units {
            self.unit(unit, Soid::open(Sort::Strong))?;
        }
        Ok(())
    }

    /// Deprocedure `mode` until it is a name.
    fn soft_name(&self, mode: MoidId) -> Option<MoidId> {
        let mut current = mode;
        for _ in 0..MAX_UNWRAP {
            let moid = self.modes.moid(current);
            match moid.kind {
                ModeKind::Ref => return Some(self.modes.resolve(current)),
                ModeKind::Proc if moid.dim == 0 => current = self.modes.sub(current)?,
                _ => return None,
            }
        }
        None
    }

    /// Deprocedure and dereference `mode` until it is a procedure that
    /// takes parameters, or any procedure when no arguments are given.
    fn meek_procedure(&self, mode: MoidId, no_arguments: bool) -> Option<MoidId> {
        let mut current = mode;
        for _ in 0..MAX_UNWRAP {
            let moid = self.modes.moid(current);
            match moid.kind {
                ModeKind::Proc if moid.dim > 0 || no_arguments => {
                    return Some(self.modes.resolve(current));
                }
                ModeKind::Proc | ModeKind::Ref => current = self.modes.sub(current)?,
                _ => return None,
            }
        }
        None
    }

    /// Weakly coerce `mode` to a mode of one of `kinds`, or to a name of
    /// one.
    fn weak_towards(&self, mode: MoidId, kinds: &[ModeKind]) -> Option<MoidId> {
        let mut current = mode;
        for _ in 0..MAX_UNWRAP {
            let moid = self.modes.moid(current);
            match moid.kind {
                kind if kinds.contains(&kind) => return Some(self.modes.resolve(current)),
                ModeKind::Ref => {
                    let sub = self.modes.sub(current)?;
                    if kinds.contains(&self.modes.kind(sub)) {
                        return Some(self.modes.resolve(current));
                    }
                    current = sub;
                }
                ModeKind::Proc if moid.dim == 0 => current = self.modes.sub(current)?,
                _ => return None,
            }
        }
        None
    }
}
