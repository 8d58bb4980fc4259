//! Formulas and operator identification.
//!
//! Operands stand in firm contexts. The operator applied is searched for
//! from the formula's range outward: in each range an operator whose
//! operand modes equal the operands' (ignoring FLEX) beats one the operands
//! must be coerced to, and the first range with a fitting operator decides.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, MoidId, NodeId, TableId, TagId};
use a68_modes::{Deflexing, Sort};

use super::Checker;
use crate::Soid;

impl Checker<'_> {
    /// `[lhs, Operator, rhs]`.
    pub(super) fn formula(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[lhs, op, rhs] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let left = self.unit(lhs, Soid::open(Sort::Firm))?;
        let right = self.unit(rhs, Soid::open(Sort::Firm))?;
        self.apply_operator(op, &[(lhs, left), (rhs, right)])
    }

    /// `[Operator, operand]`.
    pub(super) fn monadic_formula(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let children = self.tree.child_vec(id);
        let &[op, operand] = children.as_slice() else {
            return Ok(MoidId::ERROR);
        };
        let mode = self.unit(operand, Soid::open(Sort::Firm))?;
        self.apply_operator(op, &[(operand, mode)])
    }

    /// Identify the operator at `op`, coerce the operands to its operand
    /// modes and yield its result.
    fn apply_operator(&mut self, op: NodeId, operands: &[(NodeId, MoidId)]) -> Result<MoidId, Fatal> {
        if self.tree[op].info.erroneous || operands.iter().any(|&(_, m)| m == MoidId::ERROR) {
            return Ok(MoidId::ERROR);
        }
        let modes: Vec<MoidId> = operands.iter().map(|&(_, m)| m).collect();
        let Some((tag, mode)) = self.identify(op, &modes) else {
            self.undeclared_operator(op, &modes)?;
            return Ok(MoidId::ERROR);
        };
        let parameters = self.modes.parameters(mode);
        for (&(operand, yielded), &parameter) in operands.iter().zip(&parameters) {
            self.coerce(operand, yielded, Soid::operand(parameter))?;
        }
        self.tree[op].tag = Some(tag);
        self.tree[op].mode = Some(mode);
        self.tables.tag_mut(tag).used = true;
        tracing::trace!(op = self.text(op), "identified operator");
        Ok(self.modes.sub(mode).unwrap_or(MoidId::ERROR))
    }

    /// The operator tag applied at `op` to operands of `modes`, with its
    /// mode.
    fn identify(&mut self, op: NodeId, modes: &[MoidId]) -> Option<(TagId, MoidId)> {
        let (table, name) = (self.tree[op].table, self.tree[op].symbol);
        let scopes: Vec<TableId> = self.tables.scopes(table).collect();
        for scope in scopes {
            let candidates: Vec<(TagId, MoidId)> = self
                .tables
                .operators_in(scope, name)
                .into_iter()
                .filter_map(|tag| {
                    let mode = self.modes.resolve(self.tables.tag(tag).mode?);
                    (self.modes.parameters(mode).len() == modes.len()).then_some((tag, mode))
                })
                .collect();
            for sort in [Sort::NoSort, Sort::Firm] {
                for &(tag, mode) in &candidates {
                    if self.operands_fit(mode, modes, sort) {
                        return Some((tag, mode));
                    }
                }
            }
        }
        None
    }

    fn operands_fit(&mut self, mode: MoidId, operands: &[MoidId], sort: Sort) -> bool {
        let parameters = self.modes.parameters(mode);
        for (&operand, &parameter) in operands.iter().zip(&parameters) {
            if !self
                .modes
                .is_coercible(operand, parameter, sort, Deflexing::Force)
            {
                return false;
            }
        }
        true
    }

    fn undeclared_operator(&mut self, op: NodeId, modes: &[MoidId]) -> Result<(), Fatal> {
        let symbol = self.text(op);
        let message = match modes {
            [operand] => format!(
                "monadic operator \"{symbol}\" {} has not been declared in this range",
                self.describe(*operand)
            ),
            [left, right] => format!(
                "dyadic operator {} \"{symbol}\" {} has not been declared in this range",
                self.describe(*left),
                self.describe(*right)
            ),
            _ => format!("operator \"{symbol}\" has not been declared in this range"),
        };
        self.error(ErrorCode::E3003, op, message)
    }

    /// `[ProcDeclarer?, DefiningOperator[source]...]`.
    pub(super) fn operator_declaration(&mut self, id: NodeId) -> Result<(), Fatal> {
        for op in self.tree.child_vec(id) {
            if self.attribute(op) != Attribute::DefiningOperator {
                continue;
            }
            let mode = self.tree[op].mode.unwrap_or(MoidId::ERROR);
            if mode != MoidId::ERROR {
                self.check_operands(op, mode)?;
            }
            if let Some(source) = self.tree.child(op, 0) {
                self.unit(source, Soid::strong(mode))?;
            }
        }
        Ok(())
    }

    fn check_operands(&mut self, op: NodeId, mode: MoidId) -> Result<(), Fatal> {
        let symbol = self.text(op);
        match self.modes.parameters(mode).len() {
            1 => Ok(()),
            2 => {
                let (table, name) = (self.tree[op].table, self.tree[op].symbol);
                if self.tables.priority_of(table, name).is_some() {
                    return Ok(());
                }
                self.error(
                    ErrorCode::E1007,
                    op,
                    format!("dyadic operator \"{symbol}\" has no priority"),
                )
            }
            _ => self.error(
                ErrorCode::E3011,
                op,
                format!("operator \"{symbol}\" must have one or two operands"),
            ),
        }
    }
}
