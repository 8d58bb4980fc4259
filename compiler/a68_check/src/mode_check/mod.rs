//! A priori modes and the soids their contexts require.
//!
//! Every unit is checked against the [`Soid`] of its context. The a priori
//! mode combines the modes of the unit's constituents; enclosed clauses
//! pass a definite requirement on to the units that yield their value, so
//! coercions happen as deep in the tree as possible. When the context asks
//! for no particular mode the alternatives of a clause are balanced.

mod clauses;
mod operators;
mod primaries;

use a68_diagnostic::{Diagnostic, Diagnostics, ErrorCode, Fatal};
use a68_ir::{Attribute, MoidId, Module, NodeId, SourceLines, StringInterner, Tables, Tree};
use a68_modes::{ModeTable, Sort};

use crate::{Expectations, Soid};

pub(crate) struct Checker<'a> {
    tree: &'a mut Tree,
    tables: &'a mut Tables,
    lines: &'a mut SourceLines,
    interner: &'a StringInterner,
    modes: &'a mut ModeTable,
    diagnostics: &'a mut Diagnostics,
    expectations: Expectations,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(
        module: &'a mut Module,
        modes: &'a mut ModeTable,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        let Module {
            interner,
            lines,
            tree,
            tables,
            ..
        } = module;
        Checker {
            tree,
            tables,
            lines,
            interner,
            modes,
            diagnostics,
            expectations: Expectations::default(),
        }
    }

    pub(crate) fn run(mut self, top: NodeId) -> Result<Expectations, Fatal> {
        for serial in self.tree.child_vec(top) {
            self.unit(serial, Soid::strong(MoidId::VOID))?;
        }
        self.tree[top].mode = Some(MoidId::VOID);
        Ok(self.expectations)
    }

    /// Check the unit at `id` against `required`, returning the mode it
    /// has once its context is satisfied.
    fn unit(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        let yielded = a68_stack::ensure_sufficient_stack(|| self.a_priori(id, required))?;
        self.tree[id].mode = Some(yielded);
        self.coerce(id, yielded, required)
    }

    fn a_priori(&mut self, id: NodeId, required: Soid) -> Result<MoidId, Fatal> {
        match self.attribute(id) {
            Attribute::IntDenotation => Ok(MoidId::INT),
            Attribute::RealDenotation => Ok(MoidId::REAL),
            Attribute::BitsDenotation => Ok(MoidId::BITS),
            Attribute::BoolDenotation => Ok(MoidId::BOOL),
            Attribute::RowCharDenotation => Ok(self.string_denotation(id)),
            Attribute::EmptyDenotation => Ok(MoidId::VOID),
            Attribute::Skip | Attribute::Nihil | Attribute::Jump => Ok(MoidId::HIP),
            Attribute::Identifier => Ok(self.identifier(id)),
            Attribute::LabeledUnit => match self.tree.child(id, 1) {
                Some(unit) => self.unit(unit, required),
                None => Ok(MoidId::ERROR),
            },
            Attribute::SerialClause => self.serial(id, required),
            Attribute::ClosedClause => self.closed_clause(id, required),
            Attribute::CollateralClause => self.collateral_clause(id, required),
            Attribute::ConditionalClause => self.conditional_clause(id, required),
            Attribute::CaseClause => self.case_clause(id, required),
            Attribute::ConformityClause => self.conformity_clause(id, required),
            Attribute::LoopClause => self.loop_clause(id),
            Attribute::Assignation => self.assignation(id),
            Attribute::IdentityRelation => self.identity_relation(id),
            Attribute::AndFunction | Attribute::OrFunction => self.boolean_function(id),
            Attribute::Formula => self.formula(id),
            Attribute::MonadicFormula => self.monadic_formula(id),
            Attribute::Call => self.call(id),
            Attribute::Slice => self.slice(id),
            Attribute::Selection => self.selection(id),
            Attribute::Cast => self.cast(id),
            Attribute::Generator => self.generator(id),
            Attribute::RoutineText => self.routine_text(id),
            _ => Ok(MoidId::ERROR),
        }
    }

    /// Require the value of mode `yielded` at `id` to be coercible to
    /// `required`, recording the requirement for coercion insertion.
    fn coerce(&mut self, id: NodeId, yielded: MoidId, required: Soid) -> Result<MoidId, Fatal> {
        if required.is_open() {
            return Ok(yielded);
        }
        if self
            .modes
            .is_coercible(yielded, required.mode, required.sort, required.deflexing)
        {
            self.expectations.insert(id, required);
            return Ok(required.mode);
        }
        self.tree[id].mode = Some(MoidId::ERROR);
        let message = format!(
            "{} cannot be coerced to {} in a {} context",
            self.describe(yielded),
            self.describe(required.mode),
            required.sort.name()
        );
        self.error(ErrorCode::E3001, id, message)?;
        Ok(required.mode)
    }

    /// Declarations yield no value; their sources are strong.
    fn declaration(&mut self, id: NodeId) -> Result<(), Fatal> {
        match self.attribute(id) {
            Attribute::IdentityDeclaration | Attribute::VariableDeclaration => {
                let children = self.tree.child_vec(id);
                let Some((&declarer, names)) = children.split_first() else {
                    return Ok(());
                };
                self.actual_bounds(declarer)?;
                let mode = self.declared_mode(declarer);
                for &name in names {
                    if let Some(source) = self.tree.child(name, 0) {
                        self.unit(source, Soid::strong(mode))?;
                    }
                }
            }
            Attribute::ProcedureDeclaration | Attribute::ProcedureVariableDeclaration => {
                for name in self.tree.child_vec(id) {
                    if let Some(source) = self.tree.child(name, 0) {
                        let mode = self.procedure_mode(name);
                        self.unit(source, Soid::strong(mode))?;
                    }
                }
            }
            Attribute::ModeDeclaration => {
                for indicant in self.tree.child_vec(id) {
                    if let Some(declarer) = self.tree.child(indicant, 0) {
                        self.actual_bounds(declarer)?;
                    }
                }
            }
            Attribute::OperatorDeclaration => self.operator_declaration(id)?,
            _ => {}
        }
        Ok(())
    }

    fn declared_mode(&self, declarer: NodeId) -> MoidId {
        self.tree[declarer].mode.unwrap_or(MoidId::ERROR)
    }

    /// Mode of the value a procedure declaration's routine text must
    /// deliver: the tag's mode, less the REF of a procedure variable.
    fn procedure_mode(&self, name: NodeId) -> MoidId {
        let mode = self.tree[name].mode.unwrap_or(MoidId::ERROR);
        let variable = self.tree[name].parent.is_some_and(|p| {
            self.tree[p].attribute == Attribute::ProcedureVariableDeclaration
        });
        if variable {
            self.modes.sub(mode).unwrap_or(MoidId::ERROR)
        } else {
            mode
        }
    }

    /// Bounds of actual declarers are meek integral units.
    fn actual_bounds(&mut self, declarer: NodeId) -> Result<(), Fatal> {
        match self.attribute(declarer) {
            Attribute::RowDeclarer => {
                let children = self.tree.child_vec(declarer);
                if let Some(&bounds) = children.first() {
                    for bound in self.tree.child_vec(bounds) {
                        for unit in self.tree.child_vec(bound) {
                            self.unit(unit, Soid::new(Sort::Meek, MoidId::INT))?;
                        }
                    }
                }
                if let Some(&element) = children.get(1) {
                    self.actual_bounds(element)?;
                }
            }
            Attribute::FlexDeclarer => {
                if let Some(row) = self.tree.child(declarer, 0) {
                    self.actual_bounds(row)?;
                }
            }
            Attribute::StructDeclarer => {
                for field in self.tree.child_vec(declarer) {
                    if let Some(inner) = self.tree.child(field, 0) {
                        self.actual_bounds(inner)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// A single character between quotes denotes a CHAR.
    fn string_denotation(&self, id: NodeId) -> MoidId {
        let text = self.interner.lookup(self.tree[id].symbol);
        if text.chars().count() == 1 {
            MoidId::CHAR
        } else {
            MoidId::ROW_CHAR
        }
    }

    fn identifier(&self, id: NodeId) -> MoidId {
        let node = &self.tree[id];
        if node.info.erroneous {
            return MoidId::ERROR;
        }
        node.tag
            .and_then(|tag| self.tables.tag(tag).mode)
            .map_or(MoidId::ERROR, |mode| self.modes.resolve(mode))
    }

    fn routine_text(&mut self, id: NodeId) -> Result<MoidId, Fatal> {
        let mode = self.tree[id].mode.unwrap_or(MoidId::ERROR);
        let body = self.tree.children(id).last();
        if let Some(body) = body {
            let result = self.modes.sub(mode).unwrap_or(MoidId::ERROR);
            self.unit(body, Soid::strong(result))?;
        }
        Ok(mode)
    }

    // === Reporting ===

    fn error(&mut self, code: ErrorCode, at: NodeId, message: String) -> Result<(), Fatal> {
        self.tree[at].info.erroneous = true;
        let position = self.tree[at].position;
        self.diagnostics
            .report(self.lines, Diagnostic::error(code, position, message))?;
        Ok(())
    }

    fn describe(&self, mode: MoidId) -> String {
        self.modes.describe(mode, self.interner)
    }

    fn text(&self, id: NodeId) -> &'static str {
        self.interner.lookup(self.tree[id].symbol)
    }

    #[inline]
    fn attribute(&self, id: NodeId) -> Attribute {
        self.tree[id].attribute
    }
}
