//! Modes of declarers, routine texts and tags.
//!
//! Indicants declared in the program first get an unresolved indicant mode
//! each, so declarers may refer to modes declared later in the same range,
//! or to themselves. Once every declarer is known the indicants are given
//! their definitions, checked for well-formedness and the mode table is
//! finalised. Every mode recorded on a node or tag is then rewritten to its
//! canonical id.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, MoidId, Name, NodeId, TagId, TagKind};
use a68_modes::{Deflexing, ModeTable};

use crate::Binder;

impl Binder<'_> {
    pub(crate) fn collect_modes(&mut self, top: NodeId, modes: &mut ModeTable) -> Result<(), Fatal> {
        let order = self.tree.descendants(top);

        let mut indicants = Vec::new();
        for &id in &order {
            if self.attribute(id) != Attribute::DefiningIndicant {
                continue;
            }
            if let Some(tag) = self.tree[id].tag {
                let mode = modes.indicant(self.tree[id].symbol, id);
                self.tables.tag_mut(tag).mode = Some(mode);
                indicants.push((id, mode));
            }
        }

        for &(id, indicant) in &indicants {
            let definition = match self.tree.child(id, 0) {
                Some(declarer) => self.declarer_mode(declarer, modes),
                None => MoidId::ERROR,
            };
            modes.define_indicant(indicant, definition);
        }

        for &id in &order {
            match self.attribute(id) {
                Attribute::IdentityDeclaration
                | Attribute::VariableDeclaration
                | Attribute::Parameter
                | Attribute::Specifier => self.declared_identifiers(id, modes),
                Attribute::ProcedureDeclaration | Attribute::ProcedureVariableDeclaration => {
                    self.procedure_identifiers(id, modes);
                }
                Attribute::OperatorDeclaration => self.operators(id, modes),
                Attribute::ForPart => {
                    for name in self.tree.child_vec(id) {
                        self.give_mode(name, MoidId::INT);
                    }
                }
                Attribute::RoutineText => {
                    let mode = self.routine_mode(id, modes);
                    self.tree[id].mode = Some(mode);
                }
                Attribute::Generator | Attribute::Cast => {
                    if let Some(declarer) = self.tree.child(id, 0) {
                        self.declarer_mode(declarer, modes);
                    }
                }
                _ => {}
            }
        }

        self.check_well_formed(&indicants, modes)?;
        modes.finalise();
        self.canonicalise(&order, modes);
        self.duplicate_operators(modes)?;
        tracing::debug!(modes = modes.len(), "collected modes");
        Ok(())
    }

    /// Mode of the declarer at `id`, recorded on the node.
    pub(crate) fn declarer_mode(&mut self, id: NodeId, modes: &mut ModeTable) -> MoidId {
        if let Some(mode) = self.tree[id].mode {
            return mode;
        }
        let mode = a68_stack::ensure_sufficient_stack(|| self.declarer_mode_inner(id, modes));
        self.tree[id].mode = Some(mode);
        mode
    }

    fn declarer_mode_inner(&mut self, id: NodeId, modes: &mut ModeTable) -> MoidId {
        let children = self.tree.child_vec(id);
        match self.attribute(id) {
            Attribute::Indicant => self.tree[id]
                .tag
                .and_then(|tag| self.tables.tag(tag).mode)
                .unwrap_or(MoidId::ERROR),
            Attribute::RefDeclarer => {
                let sub = self.sub_mode(&children, 0, modes);
                modes.ref_to(sub)
            }
            Attribute::FlexDeclarer => {
                let sub = self.sub_mode(&children, 0, modes);
                modes.flex_of(sub)
            }
            Attribute::RowDeclarer => {
                let dim = children
                    .first()
                    .map_or(1, |&bounds| self.tree.children(bounds).count());
                let element = self.sub_mode(&children, 1, modes);
                modes.row_of(element, u32::try_from(dim).unwrap_or(u32::MAX))
            }
            Attribute::StructDeclarer => {
                let mut fields: Vec<(MoidId, Name)> = Vec::new();
                for group in children {
                    let names = self.tree.child_vec(group);
                    let Some((&declarer, names)) = names.split_first() else {
                        continue;
                    };
                    let mode = self.declarer_mode(declarer, modes);
                    for &name in names {
                        self.tree[name].mode = Some(mode);
                        fields.push((mode, self.tree[name].symbol));
                    }
                }
                modes.struct_of(&fields)
            }
            Attribute::UnionDeclarer => {
                let members: Vec<MoidId> = children
                    .into_iter()
                    .map(|member| self.declarer_mode(member, modes))
                    .collect();
                modes.union_of(&members)
            }
            Attribute::ProcDeclarer => {
                let (parameters, result) = match children.as_slice() {
                    [pack, result] => (self.tree.child_vec(*pack), Some(*result)),
                    [result] => (Vec::new(), Some(*result)),
                    _ => (Vec::new(), None),
                };
                let parameters: Vec<MoidId> = parameters
                    .into_iter()
                    .map(|p| self.declarer_mode(p, modes))
                    .collect();
                let result = result.map_or(MoidId::ERROR, |r| self.declarer_mode(r, modes));
                modes.proc_of(&parameters, result)
            }
            _ => MoidId::ERROR,
        }
    }

    fn sub_mode(&mut self, children: &[NodeId], n: usize, modes: &mut ModeTable) -> MoidId {
        children
            .get(n)
            .map_or(MoidId::ERROR, |&c| self.declarer_mode(c, modes))
    }

    /// `PROC (params) result` of the routine text at `id`.
    ///
    /// The parameters' identifiers get their modes on the way.
    fn routine_mode(&mut self, id: NodeId, modes: &mut ModeTable) -> MoidId {
        if let Some(mode) = self.tree[id].mode {
            return mode;
        }
        let children = self.tree.child_vec(id);
        let (pack, result) = match children.as_slice() {
            [pack, result, _body] => (Some(*pack), *result),
            [result, _body] => (None, *result),
            _ => return MoidId::ERROR,
        };
        let mut parameters = Vec::new();
        for group in pack.map(|p| self.tree.child_vec(p)).unwrap_or_default() {
            let names = self.tree.child_vec(group);
            let Some((&declarer, names)) = names.split_first() else {
                continue;
            };
            let mode = self.declarer_mode(declarer, modes);
            for &name in names {
                self.give_mode(name, mode);
                parameters.push(mode);
            }
        }
        let result = self.declarer_mode(result, modes);
        let mode = modes.proc_of(&parameters, result);
        self.tree[id].mode = Some(mode);
        mode
    }

    /// `[declarer, name, name...]`: identity-declared names get the
    /// declarer's mode, variables a name of it.
    fn declared_identifiers(&mut self, id: NodeId, modes: &mut ModeTable) {
        let children = self.tree.child_vec(id);
        let Some((&declarer, names)) = children.split_first() else {
            return;
        };
        let mut mode = self.declarer_mode(declarer, modes);
        if self.attribute(id) == Attribute::VariableDeclaration {
            mode = modes.ref_to(mode);
        }
        for &name in names {
            if self.attribute(name) == Attribute::DefiningIdentifier {
                self.give_mode(name, mode);
            }
        }
    }

    fn procedure_identifiers(&mut self, id: NodeId, modes: &mut ModeTable) {
        let variable = self.attribute(id) == Attribute::ProcedureVariableDeclaration;
        for name in self.tree.child_vec(id) {
            let mut mode = match self.tree.child(name, 0) {
                Some(source) if self.attribute(source) == Attribute::RoutineText => {
                    self.routine_mode(source, modes)
                }
                _ => MoidId::ERROR,
            };
            if variable {
                mode = modes.ref_to(mode);
            }
            self.give_mode(name, mode);
        }
    }

    /// An operator's mode comes from the plan written after `OP`, or else
    /// from its routine text.
    fn operators(&mut self, id: NodeId, modes: &mut ModeTable) {
        let children = self.tree.child_vec(id);
        let plan = children
            .first()
            .copied()
            .filter(|&c| self.attribute(c) == Attribute::ProcDeclarer)
            .map(|c| self.declarer_mode(c, modes));
        for &op in &children {
            if self.attribute(op) != Attribute::DefiningOperator {
                continue;
            }
            let mode = match (plan, self.tree.child(op, 0)) {
                (Some(plan), _) => plan,
                (None, Some(source)) if self.attribute(source) == Attribute::RoutineText => {
                    self.routine_mode(source, modes)
                }
                _ => MoidId::ERROR,
            };
            self.give_mode(op, mode);
        }
    }

    fn give_mode(&mut self, id: NodeId, mode: MoidId) {
        self.tree[id].mode = Some(mode);
        if let Some(tag) = self.tree[id].tag {
            self.tables.tag_mut(tag).mode = Some(mode);
        }
    }

    fn check_well_formed(
        &mut self,
        indicants: &[(NodeId, MoidId)],
        modes: &mut ModeTable,
    ) -> Result<(), Fatal> {
        let bad = modes.check_indicants();
        for &(id, mode) in indicants {
            if bad.contains(&mode) {
                let node = &mut self.tree[id];
                node.info.erroneous = true;
                let (position, name) = (node.position, node.symbol);
                let text = self.interner.lookup(name);
                self.error(
                    ErrorCode::E3002,
                    position,
                    format!("{text} does not specify a well formed mode"),
                )?;
            }
        }
        Ok(())
    }

    /// Rewrite every recorded mode to its canonical id.
    fn canonicalise(&mut self, order: &[NodeId], modes: &ModeTable) {
        for &id in order {
            if let Some(mode) = self.tree[id].mode {
                self.tree[id].mode = Some(modes.resolve(mode));
            }
        }
        let tags: Vec<TagId> = self.tables.tags().map(|(tag, _)| tag).collect();
        for tag in tags {
            let tag = self.tables.tag_mut(tag);
            tag.mode = tag.mode.map(|m| modes.resolve(m));
        }
    }

    /// Two operators of one range with the same symbol and operand modes.
    fn duplicate_operators(&mut self, modes: &mut ModeTable) -> Result<(), Fatal> {
        let operators: Vec<(TagId, Name, Vec<MoidId>)> = self
            .tables
            .tags()
            .filter(|(_, tag)| tag.node.is_some() && tag.kind == TagKind::Operator)
            .map(|(id, tag)| {
                let operands = tag.mode.map(|m| modes.parameters(m)).unwrap_or_default();
                (id, tag.name, operands)
            })
            .collect();
        for (i, (later, name, operands)) in operators.iter().enumerate() {
            let table = self.tables.tag(*later).table;
            let clash = operators[..i].iter().any(|(earlier, other, others)| {
                other == name
                    && self.tables.tag(*earlier).table == table
                    && others.len() == operands.len()
                    && !operands.is_empty()
                    && others
                        .iter()
                        .zip(operands)
                        .all(|(&a, &b)| modes.equal_deflexed(a, b, Deflexing::Force))
            });
            if !clash {
                continue;
            }
            if let Some(node) = self.tables.tag(*later).node {
                self.tree[node].info.erroneous = true;
                let position = self.tree[node].position;
                self.multiply_declared(position, *name)?;
            }
        }
        Ok(())
    }
}
