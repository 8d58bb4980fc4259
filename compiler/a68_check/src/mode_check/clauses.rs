//! Serial, enclosed and choice clauses.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, MoidId, NodeId};
use a68_modes::{Deflexing, ModeKind, Sort};

use super::Checker;
use crate::Soid;

impl Checker<'_> {
    /// Non-final units are voided. The last unit, and each unit ended by
    /// `EXIT`, yields the value of the clause.
    pub(super) fn serial(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let phrases = self.tree.child_vec(id);
        let finals = self.final_units(&phrases);
        let mut yields = Vec::new();
        for &phrase in &phrases {
            let attribute = self.attribute(phrase);
            if attribute.is_declaration() {
                self.declaration(phrase)?;
            } else if finals.contains(&phrase) {
                yields.push((phrase, self.unit(phrase, required)?));
            } else if attribute != Attribute::Completer {
                self.unit(phrase, Soid::strong(MoidId::VOID))?;
            }
        }
        self.balance_alternatives(id, &yields, required)
    }

    /// Units followed by a completer, and the last unit.
    fn final_units(&self, phrases: &[NodeId]) -> Vec<NodeId> {
        let mut finals: Vec<NodeId> = phrases
            .windows(2)
            .filter(|pair| self.attribute(pair[1]) == Attribute::Completer)
            .map(|pair| pair[0])
            .collect();
        if let Some(&last) = phrases.last() {
            if !self.attribute(last).is_declaration() && !finals.contains(&last) {
                finals.push(last);
            }
        }
        finals
    }

    /// With a definite requirement every alternative has already been
    /// coerced to it. Otherwise the alternatives are balanced and each is
    /// strongly coerced to the balanced mode.
    fn balance_alternatives(
        &mut self,
        at: NodeId,
        yields: &[(NodeId, MoidId)],
        required: Soid,
    ) -> Result<MoidId, Fatal> {
        if !required.is_open() {
            return Ok(required.mode);
        }
        match yields {
            [] => return Ok(MoidId::VOID),
            [(_, mode)] => return Ok(*mode),
            _ => {}
        }
        let modes: Vec<MoidId> = yields.iter().map(|&(_, mode)| mode).collect();
        let Some(balanced) = self.modes.balance(&modes) else {
            let message = format!("{} cannot be balanced", self.describe_list(&modes));
            self.error(ErrorCode::E3008, at, message)?;
            return Ok(MoidId::ERROR);
        };
        for &(alternative, mode) in yields {
            self.coerce(alternative, mode, Soid::strong(balanced))?;
        }
        Ok(balanced)
    }

    /// `INT, REAL and BOOL`, without repeats.
    fn describe_list(&self, modes: &[MoidId]) -> String {
        let mut names: Vec<String> = Vec::new();
        for &mode in modes {
            let name = self.describe(mode);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
            _ => names.concat(),
        }
    }

    pub(super) fn closed_clause(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        match self.tree.child(id, 0) {
            Some(serial) => self.unit(serial, required),
            None => Ok(MoidId::ERROR),
        }
    }

    /// Row and structure displays, or a collateral clause whose units are
    /// all voided.
    pub(super) fn collateral_clause(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let units = self.tree.child_vec(id);
        if units.is_empty() {
            return Ok(MoidId::VACUUM);
        }
        if required.sort == Sort::Strong && !required.is_open() {
            let target = self.modes.deflex(required.mode, Deflexing::Force);
            match self.modes.kind(target) {
                ModeKind::Void => {
                    for &unit in &units {
                        self.unit(unit, Soid::strong(MoidId::VOID))?;
                    }
                    return Ok(MoidId::VOID);
                }
                ModeKind::Row => return self.row_display(id, &units, required.mode, target),
                ModeKind::Struct => return self.structure_display(id, &units, required.mode),
                _ => {}
            }
        }
        let mut modes = Vec::new();
        for &unit in &units {
            modes.push(self.unit(unit, Soid::open(Sort::Strong))?);
        }
        let element = self.modes.balance(&modes).unwrap_or(MoidId::ERROR);
        Ok(self.modes.multiple(element))
    }

    fn row_display(
        &mut self,
        id: NodeId,
        units: &[NodeId],
        mode: MoidId,
        row: MoidId,
    ) -> Result<MoidId, Fatal> {
        let element = self.modes.slice(row).unwrap_or(MoidId::ERROR);
        for &unit in units {
            self.unit(unit, Soid::strong(element))?;
        }
        let element_is_row = {
            let element = self.modes.deflex(element, Deflexing::Force);
            self.modes.kind(element) == ModeKind::Row
        };
        if element_is_row {
            let widths: Vec<usize> = units
                .iter()
                .filter(|&&unit| self.attribute(unit) == Attribute::CollateralClause)
                .map(|&unit| self.tree.children(unit).count())
                .collect();
            if widths.windows(2).any(|pair| pair[0] != pair[1]) {
                self.error(
                    ErrorCode::E3006,
                    id,
                    "rows in a display have different bounds".to_string(),
                )?;
            }
        }
        Ok(mode)
    }

    fn structure_display(
        &mut self,
        id: NodeId,
        units: &[NodeId],
        mode: MoidId,
    ) -> Result<MoidId, Fatal> {
        let fields: Vec<MoidId> = {
            let moid = self.modes.moid(mode);
            moid.pack.iter().map(|field| field.mode).collect()
        };
        if fields.len() != units.len() {
            let message = format!(
                "{} fields given for {}",
                units.len(),
                self.describe(mode)
            );
            self.error(ErrorCode::E3001, id, message)?;
            for &unit in units {
                self.unit(unit, Soid::open(Sort::Strong))?;
            }
            return Ok(MoidId::ERROR);
        }
        for (&unit, field) in units.iter().zip(fields) {
            let field = self.modes.resolve(field);
            self.unit(unit, Soid::strong(field))?;
        }
        Ok(mode)
    }

    /// `[EnquiryClause, ThenPart, ElsePart?]`.
    pub(super) fn conditional_clause(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let parts = self.tree.child_vec(id);
        if let Some(&enquiry) = parts.first() {
            self.enquiry(enquiry, Soid::new(Sort::Meek, MoidId::BOOL))?;
        }
        self.choices(id, parts.get(1..).unwrap_or(&[]), required)
    }

    /// `[EnquiryClause, InPart, OutPart?]`, choosing by a meek INT.
    pub(super) fn case_clause(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let parts = self.tree.child_vec(id);
        if let Some(&enquiry) = parts.first() {
            self.enquiry(enquiry, Soid::new(Sort::Meek, MoidId::INT))?;
        }
        self.choices(id, parts.get(1..).unwrap_or(&[]), required)
    }

    /// Each specifier must name a member of the united mode of the
    /// enquiry, or a union of some of its members.
    pub(super) fn conformity_clause(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let parts = self.tree.child_vec(id);
        let Some((&enquiry, rest)) = parts.split_first() else {
            return Ok(MoidId::ERROR);
        };
        let united = self.united_enquiry(enquiry)?;
        if let Some(&in_part) = rest.first() {
            for specified in self.tree.child_vec(in_part) {
                let Some(specifier) = self.tree.find_child(specified, Attribute::Specifier) else {
                    continue;
                };
                let Some(declarer) = self.tree.child(specifier, 0) else {
                    continue;
                };
                let mode = self.declared_mode(declarer);
                self.tree[specifier].mode = Some(mode);
                if let Some(united) = united {
                    self.check_specifier(specifier, mode, united)?;
                }
            }
        }
        self.choices(id, rest, required)
    }

    /// The enquiry of a conformity clause, dereferenced to a union.
    fn united_enquiry(&mut self, enquiry: NodeId) -> Result<Option<MoidId>, Fatal> {
        let yielded = self.enquiry(enquiry, Soid::open(Sort::Meek))?;
        if yielded == MoidId::ERROR {
            return Ok(None);
        }
        let mut united = yielded;
        while self.modes.kind(united) == ModeKind::Ref {
            united = self.modes.sub(united).unwrap_or(MoidId::ERROR);
        }
        if self.modes.kind(united) != ModeKind::Union {
            let message = format!("{} is not a united mode", self.describe(yielded));
            self.error(ErrorCode::E3009, enquiry, message)?;
            return Ok(None);
        }
        if let Some(serial) = self.tree.child(enquiry, 0) {
            self.coerce(serial, yielded, Soid::new(Sort::Meek, united))?;
        }
        self.tree[enquiry].mode = Some(united);
        Ok(Some(united))
    }

    fn check_specifier(&mut self, specifier: NodeId, mode: MoidId, united: MoidId) -> Result<(), Fatal> {
        if mode == MoidId::ERROR {
            return Ok(());
        }
        let member = self
            .modes
            .members(united)
            .into_iter()
            .any(|m| self.modes.equivalent(m, mode));
        let subset = self.modes.kind(mode) == ModeKind::Union && self.modes.is_subset(mode, united);
        if member || subset {
            return Ok(());
        }
        let message = format!(
            "{} is not a component of {}",
            self.describe(mode),
            self.describe(united)
        );
        self.error(ErrorCode::E3009, specifier, message)
    }

    /// `[SerialClause]` wrapped in an enquiry clause node.
    fn enquiry(&mut self, enquiry: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let mode = match self.tree.child(enquiry, 0) {
            Some(serial) => self.unit(serial, required)?,
            None => MoidId::ERROR,
        };
        self.tree[enquiry].mode = Some(mode);
        Ok(mode)
    }

    /// The branches of a choice clause. A missing else or out part yields
    /// SKIP, which balances with anything and so is left out.
    fn choices(&mut self, id: NodeId, parts: &[NodeId], required: Soid) -> Result<MoidId, Fatal> {
        let mut yields = Vec::new();
        for &part in parts {
            match self.attribute(part) {
                Attribute::InPart => {
                    for unit in self.tree.child_vec(part) {
                        let branch = if self.attribute(unit) == Attribute::SpecifiedUnit {
                            self.tree.children(unit).last()
                        } else {
                            Some(unit)
                        };
                        if let Some(branch) = branch {
                            let mode = self.unit(branch, required)?;
                            self.tree[unit].mode = Some(mode);
                            yields.push((branch, mode));
                        }
                    }
                }
                _ => {
                    if let Some(inner) = self.tree.child(part, 0) {
                        let mode = self.unit(inner, required)?;
                        self.tree[part].mode = Some(mode);
                        yields.push((inner, mode));
                    }
                }
            }
        }
        self.balance_alternatives(id, &yields, required)
    }

    /// `FOR`, `FROM`, `BY`, `TO` give meek integers, `WHILE` a meek
    /// boolean; the `DO` part is voided.
    pub(super) fn loop_clause(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        for part in self.tree.child_vec(id) {
            let required = match self.attribute(part) {
                Attribute::FromPart | Attribute::ByPart | Attribute::ToPart => {
                    Soid::new(Sort::Meek, MoidId::INT)
                }
                Attribute::WhilePart => Soid::new(Sort::Meek, MoidId::BOOL),
                Attribute::DoPart => Soid::strong(MoidId::VOID),
                _ => continue,
            };
            if let Some(inner) = self.tree.child(part, 0) {
                let mode = self.unit(inner, required)?;
                self.tree[part].mode = Some(mode);
            }
        }
        Ok(MoidId::VOID)
    }
}
