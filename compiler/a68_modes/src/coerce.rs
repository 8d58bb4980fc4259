//! The coercion ladder.
//!
//! A context of strength [`Sort`] allows a fixed set of implicit
//! conversions. Each stronger sort allows everything the weaker ones do:
//!
//! | sort     | adds                                              |
//! |----------|---------------------------------------------------|
//! | `NoSort` | equality (after deflexing)                        |
//! | `Soft`   | deproceduring                                     |
//! | `Weak`   | dereferencing that still leaves a name            |
//! | `Meek`   | dereferencing                                     |
//! | `Firm`   | uniting                                           |
//! | `Strong` | widening, rowing, voiding; HIP and VACUUM anywhere |

use a68_ir::{Attribute, MoidId};

use crate::moid::ModeKind;
use crate::{Deflexing, ModeTable};

/// Bound on deproceduring and dereferencing steps in one path.
const MAX_UNWRAP: usize = 32;

/// Strength of a syntactic context.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Sort {
    NoSort,
    Soft,
    Weak,
    Meek,
    Firm,
    Strong,
}

impl Sort {
    /// Every sort, weakest first.
    pub const LADDER: [Sort; 6] = [
        Sort::NoSort,
        Sort::Soft,
        Sort::Weak,
        Sort::Meek,
        Sort::Firm,
        Sort::Strong,
    ];

    /// Adjective used in "cannot be coerced to M in a C context".
    pub const fn name(self) -> &'static str {
        match self {
            Sort::NoSort => "no",
            Sort::Soft => "soft",
            Sort::Weak => "weak",
            Sort::Meek => "meek",
            Sort::Firm => "firm",
            Sort::Strong => "strong",
        }
    }
}

/// One implicit conversion.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Coercion {
    Dereference,
    Deprocedure,
    Unite,
    Widen,
    Row,
    Void,
}

impl Coercion {
    /// Attribute of the node that makes this conversion explicit.
    pub const fn attribute(self) -> Attribute {
        match self {
            Coercion::Dereference => Attribute::Dereferencing,
            Coercion::Deprocedure => Attribute::Deproceduring,
            Coercion::Unite => Attribute::Uniting,
            Coercion::Widen => Attribute::Widening,
            Coercion::Row => Attribute::Rowing,
            Coercion::Void => Attribute::Voiding,
        }
    }
}

/// A coercion and the mode it yields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Step {
    pub coercion: Coercion,
    pub mode: MoidId,
}

impl Step {
    const fn new(coercion: Coercion, mode: MoidId) -> Self {
        Step { coercion, mode }
    }
}

impl ModeTable {
    /// Whether `p` and `q` are equal after deflexing both.
    pub fn equal_deflexed(&mut self, p: MoidId, q: MoidId, deflexing: Deflexing) -> bool {
        if self.equivalent(p, q) {
            return true;
        }
        if deflexing == Deflexing::No {
            return false;
        }
        let p = self.deflex(p, deflexing);
        let q = self.deflex(q, deflexing);
        self.equivalent(p, q)
    }

    /// The conversions taking a value of mode `p` to mode `q` in a context
    /// of strength `sort`, trying the weakest sort first.
    pub fn coercion_path(
        &mut self,
        p: MoidId,
        q: MoidId,
        sort: Sort,
        deflexing: Deflexing,
    ) -> Option<Vec<Step>> {
        let p = self.resolve(p);
        let q = self.resolve(q);
        if p == MoidId::ERROR || q == MoidId::ERROR {
            return Some(Vec::new());
        }
        Sort::LADDER
            .into_iter()
            .take_while(|&rung| rung <= sort)
            .find_map(|rung| self.path_at(p, q, rung, deflexing))
    }

    pub fn is_coercible(&mut self, p: MoidId, q: MoidId, sort: Sort, deflexing: Deflexing) -> bool {
        self.coercion_path(p, q, sort, deflexing).is_some()
    }

    /// The path allowed by exactly the conversions of `rung`.
    fn path_at(&mut self, p: MoidId, q: MoidId, rung: Sort, deflexing: Deflexing) -> Option<Vec<Step>> {
        if self.equal_deflexed(p, q, deflexing) {
            return Some(Vec::new());
        }
        if rung == Sort::NoSort {
            return None;
        }
        if rung == Sort::Strong {
            if p == MoidId::HIP {
                return Some(Vec::new());
            }
            if p == MoidId::VACUUM && self.is_row_like(q) {
                return Some(Vec::new());
            }
            if q == MoidId::VOID {
                return Some(self.voiding(p));
            }
        }

        let mut steps = Vec::new();
        let mut current = p;
        for _ in 0..MAX_UNWRAP {
            if !steps.is_empty() && self.equal_deflexed(current, q, deflexing) {
                return Some(steps);
            }
            if rung >= Sort::Firm {
                if let Some(step) = self.uniting(current, q, deflexing) {
                    steps.push(step);
                    return Some(steps);
                }
            }
            if rung == Sort::Strong {
                if let Some(tail) = self.strong_tail(current, q, deflexing) {
                    steps.extend(tail);
                    return Some(steps);
                }
            }
            let moid = self.moid(current);
            let next = match moid.kind {
                ModeKind::Proc if moid.dim == 0 => {
                    Step::new(Coercion::Deprocedure, self.sub(current)?)
                }
                ModeKind::Ref if rung >= Sort::Weak => {
                    let sub = self.sub(current)?;
                    if rung == Sort::Weak && self.kind(sub) != ModeKind::Ref {
                        return None;
                    }
                    Step::new(Coercion::Dereference, sub)
                }
                _ => return None,
            };
            steps.push(next);
            current = next.mode;
        }
        None
    }

    fn is_row_like(&mut self, m: MoidId) -> bool {
        let m = self.deflex(m, Deflexing::Force);
        matches!(self.kind(m), ModeKind::Row | ModeKind::Flex | ModeKind::Rows)
    }

    fn voiding(&self, p: MoidId) -> Vec<Step> {
        let moid = self.moid(p);
        if moid.kind == ModeKind::Proc && moid.dim == 0 {
            let result = self.sub(p).unwrap_or(MoidId::VOID);
            let mut steps = vec![Step::new(Coercion::Deprocedure, result)];
            if result != MoidId::VOID {
                steps.push(Step::new(Coercion::Void, MoidId::VOID));
            }
            return steps;
        }
        vec![Step::new(Coercion::Void, MoidId::VOID)]
    }

    fn uniting(&mut self, p: MoidId, q: MoidId, deflexing: Deflexing) -> Option<Step> {
        match self.kind(q) {
            ModeKind::Union => {
                if self.kind(p) == ModeKind::Union {
                    return self.is_subset(p, q).then_some(Step::new(Coercion::Unite, q));
                }
                let members = self.members(q);
                members
                    .into_iter()
                    .any(|member| self.equal_deflexed(p, member, deflexing))
                    .then_some(Step::new(Coercion::Unite, q))
            }
            ModeKind::Rows => {
                let p = self.deflex(p, Deflexing::Force);
                matches!(self.kind(p), ModeKind::Row)
                    .then_some(Step::new(Coercion::Unite, q))
            }
            _ => None,
        }
    }

    fn widened(&self, p: MoidId) -> Option<MoidId> {
        match p {
            MoidId::INT => Some(MoidId::REAL),
            MoidId::LONG_INT => Some(MoidId::LONG_REAL),
            MoidId::BITS => Some(MoidId::ROW_BOOL),
            _ => None,
        }
    }

    /// Widening then rowing, or rowing alone.
    fn strong_tail(&mut self, p: MoidId, q: MoidId, deflexing: Deflexing) -> Option<Vec<Step>> {
        if let Some(wide) = self.widened(p) {
            let widen = Step::new(Coercion::Widen, wide);
            if self.equal_deflexed(wide, q, deflexing) {
                return Some(vec![widen]);
            }
            if let Some(rest) = self.rowing(wide, q, deflexing) {
                let mut steps = vec![widen];
                steps.extend(rest);
                return Some(steps);
            }
        }
        self.rowing(p, q, deflexing)
    }

    /// `x` to `[]x`, or `REF x` to `REF []x`.
    fn rowing(&mut self, p: MoidId, q: MoidId, deflexing: Deflexing) -> Option<Vec<Step>> {
        let target = self.deflex(q, Deflexing::Force);
        match self.kind(target) {
            ModeKind::Row => {
                let element = self.slice(target)?;
                if self.equivalent(element, target) {
                    return None;
                }
                let mut steps = self.path_at(p, element, Sort::Strong, deflexing)?;
                if steps.iter().any(|s| s.coercion == Coercion::Void) {
                    return None;
                }
                steps.push(Step::new(Coercion::Row, q));
                Some(steps)
            }
            ModeKind::Ref if self.kind(p) == ModeKind::Ref => {
                let row = self.sub(target)?;
                if self.kind(row) != ModeKind::Row {
                    return None;
                }
                let element = self.slice(row)?;
                let referenced = self.sub(p)?;
                self.equal_deflexed(referenced, element, deflexing)
                    .then(|| vec![Step::new(Coercion::Row, q)])
            }
            _ => None,
        }
    }

    /// A mode every alternative in `modes` can be strongly coerced to,
    /// preferring earlier alternatives and their dereferenced forms.
    pub fn balance(&mut self, modes: &[MoidId]) -> Option<MoidId> {
        let alternatives: Vec<MoidId> = modes
            .iter()
            .map(|&m| self.resolve(m))
            .filter(|&m| m != MoidId::HIP)
            .collect();
        if alternatives.is_empty() {
            return (!modes.is_empty()).then_some(MoidId::HIP);
        }
        if alternatives.contains(&MoidId::ERROR) {
            return Some(MoidId::ERROR);
        }

        let mut candidates = Vec::new();
        for &m in &alternatives {
            let mut current = m;
            for _ in 0..MAX_UNWRAP {
                if current == MoidId::VACUUM {
                    break;
                }
                if !candidates.contains(&current) {
                    candidates.push(current);
                }
                let moid = self.moid(current);
                current = match moid.kind {
                    ModeKind::Proc if moid.dim == 0 => match self.sub(current) {
                        Some(r) => r,
                        None => break,
                    },
                    ModeKind::Ref => match self.sub(current) {
                        Some(s) => s,
                        None => break,
                    },
                    _ => break,
                };
            }
        }
        if candidates.is_empty() {
            return Some(MoidId::VACUUM);
        }
        candidates.into_iter().find(|&c| {
            alternatives
                .iter()
                .all(|&m| self.is_coercible(m, c, Sort::Strong, Deflexing::Safe))
        })
    }
}
