#![allow(clippy::unwrap_used)]

use a68_diagnostic::{DiagnosticConfig, Diagnostics, ErrorCode};
use a68_ir::{Attribute, LineId, MoidId, Module, Namespace, NodeId, Options, SourceLines, TableId};
use a68_modes::ModeTable;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

struct Bound {
    module: Module,
    modes: ModeTable,
    diagnostics: Diagnostics,
}

impl Bound {
    fn nodes(&self, attribute: Attribute) -> Vec<NodeId> {
        let Some(top) = self.module.top else {
            return Vec::new();
        };
        self.module
            .tree
            .descendants(top)
            .into_iter()
            .filter(|&id| self.module.tree[id].attribute == attribute)
            .collect()
    }

    /// Rendered mode of the first node named `name` with `attribute` that
    /// has a mode.
    fn mode_of(&self, attribute: Attribute, name: &str) -> String {
        let mode = self
            .nodes(attribute)
            .into_iter()
            .filter(|&id| self.module.text(self.module.tree[id].symbol) == name)
            .find_map(|id| self.module.tree[id].mode)
            .unwrap_or_else(|| panic!("no {attribute} {name} with a mode"));
        self.modes.describe(mode, &self.module.interner)
    }

    /// Level of the table declaring what the last applied `name` binds to.
    fn binding_level(&self, name: &str) -> Option<u32> {
        let applied = self
            .nodes(Attribute::Identifier)
            .into_iter()
            .rev()
            .find(|&id| self.module.text(self.module.tree[id].symbol) == name)?;
        let tag = self.module.tree[applied].tag?;
        Some(self.module.tables[self.module.tables.tag(tag).table].level)
    }

    fn messages(&self) -> Vec<(ErrorCode, String)> {
        self.diagnostics
            .items()
            .iter()
            .map(|d| (d.code, d.message.clone()))
            .collect()
    }
}

fn bind_source(source: &str) -> Bound {
    let env = StandardEnvironment::new();
    let mut lines = SourceLines::from_source("test.a68", source);
    let mut options = Options::default();
    let mut diagnostics = Diagnostics::with_config(DiagnosticConfig::unlimited());
    let tokens = a68_lexer::lex(&mut lines, &mut options, env.interner(), &mut diagnostics)
        .unwrap_or_default();
    let mut module = Module::new(env.interner().clone(), options, lines, env.tables().clone());
    let mut modes = env.modes().clone();
    let passes = a68_parse::parse(&mut module, &tokens, &mut diagnostics)
        .and_then(|_| collect_tags(&mut module, &mut diagnostics))
        .and_then(|()| bind_tags(&mut module, &mut diagnostics))
        .and_then(|()| collect_modes(&mut module, &mut modes, &mut diagnostics));
    if let Err(fatal) = passes {
        panic!("binding {source:?} failed: {fatal}");
    }
    set_levels(&mut module);
    Bound {
        module,
        modes,
        diagnostics,
    }
}

fn bind_clean(source: &str) -> Bound {
    let bound = bind_source(source);
    assert_eq!(bound.messages(), vec![], "diagnostics for {source:?}");
    bound
}

#[test]
fn standard_environment() {
    let env = StandardEnvironment::new();
    let tables = env.tables();
    let name = |text: &str| env.interner().intern(text);

    let int = tables.find_local(TableId::STANDARD, Namespace::Indicant, name("INT"));
    assert_eq!(int.and_then(|t| tables.tag(t).mode), Some(MoidId::INT));
    assert_eq!(tables.priority_of(TableId::STANDARD, name("*")), Some(7));
    assert_eq!(tables.priority_of(TableId::STANDARD, name("+:=")), Some(1));
    assert!(tables.operators_in(TableId::STANDARD, name("+")).len() >= 4);

    let print = tables.find_local(TableId::STANDARD, Namespace::Identifier, name("print"));
    let mode = print.and_then(|t| tables.tag(t).mode).unwrap_or(MoidId::ERROR);
    assert!(env
        .modes()
        .describe(mode, env.interner())
        .starts_with("PROC ([] UNION (INT"));
}

#[test]
fn nearest_declaration_wins() {
    let bound = bind_clean("INT x = 1; BEGIN REAL x = 2.0; x END");
    assert_eq!(bound.binding_level("x"), Some(2));
    let applied = *bound.nodes(Attribute::Identifier).last().unwrap();
    let tag = bound.module.tables.tag(bound.module.tree[applied].tag.unwrap());
    assert_eq!(
        bound.modes.describe(tag.mode.unwrap(), &bound.module.interner),
        "REAL"
    );
}

#[test]
fn standard_identifiers_are_found_last() {
    let bound = bind_clean("REAL pi = 3.0; BEGIN pi END; maxint");
    assert_eq!(bound.binding_level("pi"), Some(1));
    assert_eq!(bound.binding_level("maxint"), Some(0));
}

#[test]
fn undeclared_identifier_is_reported_and_marked() {
    let bound = bind_source("INT a = 1; y + a");
    assert_eq!(
        bound.messages(),
        vec![(
            ErrorCode::E2001,
            "tag \"y\" has not been declared in this range".to_string()
        )]
    );
    let y = bound
        .nodes(Attribute::Identifier)
        .into_iter()
        .find(|&id| bound.module.text(bound.module.tree[id].symbol) == "y");
    assert!(y.is_some_and(|id| bound.module.tree[id].info.erroneous));
    assert_eq!(bound.binding_level("a"), Some(1));
}

#[test]
fn binding_marks_tags_used() {
    let bound = bind_clean("INT a = 1, b = 2; a");
    let used: Vec<(String, bool)> = bound
        .module
        .tables
        .tags()
        .filter(|(_, tag)| tag.node.is_some())
        .map(|(_, tag)| (bound.module.text(tag.name).to_string(), tag.used))
        .collect();
    assert_eq!(
        used,
        vec![("a".to_string(), true), ("b".to_string(), false)]
    );
}

#[test]
fn identifier_naming_a_label_is_a_jump() {
    let bound = bind_clean("again: SKIP; again");
    assert_eq!(bound.nodes(Attribute::Jump).len(), 1);
    let jump = bound.nodes(Attribute::Jump)[0];
    assert!(bound.module.tree[jump].tag.is_some());
}

#[test]
fn multiply_declared_tags() {
    let identifiers = bind_source("INT a = 1, a = 2; a");
    assert_eq!(
        identifiers.messages(),
        vec![(
            ErrorCode::E2002,
            "tag \"a\" is declared more than once in this range".to_string()
        )]
    );

    let labels = bind_source("l: SKIP; l: SKIP");
    assert_eq!(labels.diagnostics.count_of(ErrorCode::E2002), 1);

    let nested = bind_clean("INT a = 1; (INT a = 2; a)");
    assert_eq!(nested.binding_level("a"), Some(2));
}

#[test]
fn operators_clash_only_on_equivalent_operands() {
    let clash = bind_source(
        "PRIO MAX = 9; \
         OP MAX = (INT a, b) INT: a; \
         OP MAX = (INT x, y) INT: y; \
         1 MAX 2",
    );
    assert_eq!(clash.diagnostics.count_of(ErrorCode::E2002), 1);

    bind_clean(
        "PRIO MAX = 9; \
         OP MAX = (INT a, b) INT: a; \
         OP MAX = (REAL a, b) REAL: a; \
         1 MAX 2",
    );
}

#[test]
fn tag_modes() {
    let bound = bind_clean(
        "INT i = 1; REAL r; HEAP [1:3] INT v; \
         PROC p = (INT n, REAL x) BOOL: TRUE; \
         PROC q := VOID: SKIP; \
         FOR k TO 3 DO SKIP OD; \
         p (i, r)",
    );
    let mode = |name| bound.mode_of(Attribute::DefiningIdentifier, name);
    assert_eq!(mode("i"), "INT");
    assert_eq!(mode("r"), "REF REAL");
    assert_eq!(mode("v"), "REF [] INT");
    assert_eq!(mode("p"), "PROC (INT, REAL) BOOL");
    assert_eq!(mode("n"), "INT");
    assert_eq!(mode("x"), "REAL");
    assert_eq!(mode("q"), "REF PROC VOID");
    assert_eq!(mode("k"), "INT");
}

#[test]
fn operator_modes_come_from_plan_or_routine() {
    let bound = bind_clean(
        "PRIO MIN = 9, EQ = 4; \
         OP MIN = (REAL a, b) REAL: a; \
         OP (INT, INT) BOOL EQ = SKIP; \
         1 MIN 2; 1 EQ 2",
    );
    let mode = |name| bound.mode_of(Attribute::DefiningOperator, name);
    assert_eq!(mode("MIN"), "PROC (REAL, REAL) REAL");
    assert_eq!(mode("EQ"), "PROC (INT, INT) BOOL");
}

#[test]
fn long_indicants() {
    let bound = bind_clean("LONG INT a = 1; LONG LONG REAL b = 1.0; a");
    assert_eq!(bound.mode_of(Attribute::DefiningIdentifier, "a"), "LONG INT");
    assert_eq!(bound.mode_of(Attribute::DefiningIdentifier, "b"), "LONG REAL");
}

#[test]
fn recursive_modes() {
    let bound = bind_source(
        "MODE NODE = STRUCT (INT value, REF NODE next); \
         MODE BAD = REF BAD; \
         MODE LOOP = STRUCT (LOOP inner); \
         NODE n; SKIP",
    );
    assert_eq!(
        bound.messages(),
        vec![
            (
                ErrorCode::E3002,
                "BAD does not specify a well formed mode".to_string()
            ),
            (
                ErrorCode::E3002,
                "LOOP does not specify a well formed mode".to_string()
            ),
        ]
    );
    assert_eq!(bound.mode_of(Attribute::DefiningIdentifier, "n"), "REF NODE");
}

#[test]
fn mutually_recursive_modes_are_interned_once() {
    let bound = bind_clean(
        "MODE A = STRUCT (INT i, REF B link), \
              B = STRUCT (INT i, REF A link); \
         A a; B b; STRUCT (INT i, REF A link) c; SKIP",
    );
    let modes: Vec<MoidId> = ["a", "b", "c"]
        .iter()
        .map(|&name| {
            let id = bound
                .nodes(Attribute::DefiningIdentifier)
                .into_iter()
                .find(|&id| bound.module.text(bound.module.tree[id].symbol) == name)
                .unwrap();
            bound.module.tree[id].mode.unwrap()
        })
        .collect();
    assert_eq!(modes[0], modes[1]);
    assert_eq!(modes[1], modes[2]);
    assert!(bound.modes.is_finalised());
}

#[test]
fn line_levels() {
    let bound = bind_clean("INT a = 1;\nBEGIN INT b = 2;\n(b) END");
    let levels: Vec<(u32, u32)> = (0..3)
        .map(|i| {
            let line = &bound.module.lines[LineId::new(i)];
            (line.min_level, line.max_level)
        })
        .collect();
    assert_eq!(levels, vec![(1, 1), (1, 2), (2, 3)]);
    assert!(bound
        .module
        .lines
        .iter()
        .all(|(_, line)| line.top_node.is_some()));
}

/// `INT x = 0; BEGIN INT x = 1; BEGIN ... x END END` with `depth` ranges,
/// leaving out the declaration in the innermost one unless `innermost`.
fn nested_declarations(depth: usize, innermost: bool) -> String {
    let mut source = String::from("INT x = 0; ");
    for level in 1..depth {
        source.push_str("BEGIN ");
        if level + 1 < depth || innermost {
            source.push_str(&format!("INT x = {level}; "));
        }
    }
    source.push('x');
    for _ in 1..depth {
        source.push_str(" END");
    }
    source
}

proptest! {
    #[test]
    fn shadowing_follows_nesting(depth in 2usize..8) {
        let with = bind_clean(&nested_declarations(depth, true));
        prop_assert_eq!(with.binding_level("x"), u32::try_from(depth).ok());

        let without = bind_clean(&nested_declarations(depth, false));
        prop_assert_eq!(without.binding_level("x"), u32::try_from(depth - 1).ok());
    }
}
