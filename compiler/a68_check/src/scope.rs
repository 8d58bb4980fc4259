//! Scope checking.
//!
//! The scope of a value is the level of the youngest range it depends on.
//! Only values holding names can have a scope younger than the primal one:
//! a LOC generator or a local variable belongs to the range that declares
//! it, an identity-declared name shares the scope of its source, and a
//! slice or selection of a name shares the scope of that name. A value may
//! not be assigned to a name that outlives it, nor yielded by a closed
//! clause or routine text out of the range it belongs to.

use a68_diagnostic::{Diagnostic, Diagnostics, ErrorCode, Fatal};
use a68_ir::{
    Attribute, Module, NodeId, SourceLines, StringInterner, Tables, Tree, PRIMAL_SCOPE,
};
use a68_modes::{ModeTable, MoidFlags};

use crate::top_of;

/// Report every value that could be exported out of its scope.
#[tracing::instrument(level = "debug", skip_all)]
pub fn scope_check(
    module: &mut Module,
    modes: &ModeTable,
    diagnostics: &mut Diagnostics,
) -> Result<(), Fatal> {
    let top = top_of(module)?;
    let Module {
        interner,
        lines,
        tree,
        tables,
        ..
    } = module;
    let mut checker = ScopeChecker {
        tree,
        tables,
        lines,
        interner,
        modes,
        diagnostics,
        violations: 0,
    };
    checker.variables(top);
    checker.scope(top)?;
    tracing::debug!(violations = checker.violations, "checked scopes");
    Ok(())
}

struct ScopeChecker<'a> {
    tree: &'a mut Tree,
    tables: &'a mut Tables,
    lines: &'a mut SourceLines,
    interner: &'a StringInterner,
    modes: &'a ModeTable,
    diagnostics: &'a mut Diagnostics,
    violations: usize,
}

impl ScopeChecker<'_> {
    /// Variables belong to their range from the start of it, so uses ahead
    /// of the declaration see the right scope.
    fn variables(&mut self, top: NodeId) {
        for id in self.tree.descendants(top) {
            let declared_by_variable = self.tree[id].parent.is_some_and(|p| {
                matches!(
                    self.tree[p].attribute,
                    Attribute::VariableDeclaration | Attribute::ProcedureVariableDeclaration
                )
            });
            if self.tree[id].attribute != Attribute::DefiningIdentifier || !declared_by_variable {
                continue;
            }
            let level = self.level(id);
            if let Some(tag) = self.tree[id].tag {
                let tag = self.tables.tag_mut(tag);
                tag.scope = if tag.heap { PRIMAL_SCOPE } else { level };
            }
        }
    }

    fn scope(&mut self, id: NodeId) -> Result<u32, Fatal> {
        let scope = a68_stack::ensure_sufficient_stack(|| self.scope_inner(id))?;
        let scope = if self.has_names(id) { scope } else { PRIMAL_SCOPE };
        self.tree[id].info.scope = Some(scope);
        Ok(scope)
    }

    fn scope_inner(&mut self, id: NodeId) -> Result<u32, Fatal> {
        let children = self.tree.child_vec(id);
        match self.tree[id].attribute {
            Attribute::Generator => Ok(if self.tree[id].info.heap {
                PRIMAL_SCOPE
            } else {
                self.level(id)
            }),
            Attribute::Identifier => Ok(self.tree[id]
                .tag
                .map_or(PRIMAL_SCOPE, |tag| self.tables.tag(tag).scope)),
            Attribute::IdentityDeclaration | Attribute::VariableDeclaration => {
                self.declaration(id, &children)?;
                Ok(PRIMAL_SCOPE)
            }
            Attribute::Assignation => self.assignation(&children),
            Attribute::ClosedClause => self.closed_clause(id, &children),
            Attribute::RoutineText => self.routine_text(&children),
            Attribute::Call => {
                let mut scope = PRIMAL_SCOPE;
                for (n, &child) in children.iter().enumerate() {
                    let inner = self.scope(child)?;
                    if n > 0 {
                        scope = scope.max(inner);
                    }
                }
                Ok(scope)
            }
            Attribute::Voiding | Attribute::Widening => {
                self.all(&children)?;
                Ok(PRIMAL_SCOPE)
            }
            _ => self.all(&children),
        }
    }

    /// Youngest scope among `children`, visiting each.
    fn all(&mut self, children: &[NodeId]) -> Result<u32, Fatal> {
        let mut scope = PRIMAL_SCOPE;
        for &child in children {
            scope = scope.max(self.scope(child)?);
        }
        Ok(scope)
    }

    /// Identity-declared names take the scope of their source; initial
    /// values of variables are checked as assignations.
    fn declaration(&mut self, id: NodeId, children: &[NodeId]) -> Result<(), Fatal> {
        let variable = self.tree[id].attribute == Attribute::VariableDeclaration;
        for &name in children {
            if self.tree[name].attribute != Attribute::DefiningIdentifier {
                self.scope(name)?;
                continue;
            }
            let Some(source) = self.tree.child(name, 0) else {
                continue;
            };
            let scope = self.scope(source)?;
            let Some(tag) = self.tree[name].tag else {
                continue;
            };
            if variable {
                if scope > self.tables.tag(tag).scope {
                    self.violation(source, source)?;
                }
            } else {
                self.tables.tag_mut(tag).scope = scope;
            }
        }
        Ok(())
    }

    fn assignation(&mut self, children: &[NodeId]) -> Result<u32, Fatal> {
        let &[destination, source] = children else {
            return self.all(children);
        };
        let destination_scope = self.scope(destination)?;
        let source_scope = self.scope(source)?;
        if source_scope > destination_scope {
            self.violation(source, source)?;
        }
        Ok(destination_scope)
    }

    /// A closed clause may not yield a name declared in its own range.
    fn closed_clause(&mut self, id: NodeId, children: &[NodeId]) -> Result<u32, Fatal> {
        let Some(&serial) = children.first() else {
            return Ok(PRIMAL_SCOPE);
        };
        let scope = self.scope(serial)?;
        if self.has_names(id) && scope >= self.level(serial) {
            self.violation(id, serial)?;
            return Ok(PRIMAL_SCOPE);
        }
        Ok(scope)
    }

    /// A routine text may not yield a name local to itself.
    fn routine_text(&mut self, children: &[NodeId]) -> Result<u32, Fatal> {
        let Some((&body, parts)) = children.split_last() else {
            return Ok(PRIMAL_SCOPE);
        };
        self.all(parts)?;
        let scope = self.scope(body)?;
        if scope >= self.level(body) && scope > PRIMAL_SCOPE {
            self.violation(body, body)?;
        }
        Ok(PRIMAL_SCOPE)
    }

    fn violation(&mut self, at: NodeId, origin: NodeId) -> Result<(), Fatal> {
        self.violations += 1;
        let message = format!(
            "value from {} could be exported out of its scope",
            self.origin(origin)
        );
        let position = self.tree[at].position;
        self.diagnostics
            .report(self.lines, Diagnostic::error(ErrorCode::E4001, position, message))?;
        Ok(())
    }

    /// What a value comes from, looking through coercions and the yields
    /// of enclosed clauses.
    fn origin(&self, id: NodeId) -> String {
        let mut cursor = id;
        loop {
            let node = &self.tree[cursor];
            let next = match node.attribute {
                attribute if attribute.is_coercion() => node.sub,
                Attribute::ClosedClause | Attribute::SerialClause => {
                    self.tree.children(cursor).last()
                }
                _ => None,
            };
            match next {
                Some(next) => cursor = next,
                None => break,
            }
        }
        let node = &self.tree[cursor];
        match node.attribute {
            Attribute::Identifier => format!("\"{}\"", self.interner.lookup(node.symbol)),
            attribute => attribute.name().to_string(),
        }
    }

    fn has_names(&self, id: NodeId) -> bool {
        self.tree[id]
            .mode
            .is_some_and(|m| self.modes.moid(m).flags.contains(MoidFlags::HAS_REF))
    }

    fn level(&self, id: NodeId) -> u32 {
        self.tables[self.tree[id].table].level
    }
}
