use a68_diagnostic::{Diagnostics, ErrorCode};
use a68_ir::{
    Attribute, Module, Namespace, NodeId, Options, SharedInterner, SourceLines, Tag, TagKind,
    TableId, Tables,
};
use pretty_assertions::assert_eq;

use super::parse;

/// A standard environment with just enough in it to parse the tests.
fn standard_tables(interner: &SharedInterner) -> Tables {
    let mut tables = Tables::new();
    for mode in ["INT", "REAL", "BOOL", "CHAR", "BITS", "STRING", "VOID"] {
        let tag = Tag::new(TableId::STANDARD, TagKind::Indicant, interner.intern(mode));
        assert!(tables.add_tag(tag).is_ok());
    }
    let priorities = [
        ("+:=", 1),
        ("OR", 2),
        ("AND", 3),
        ("=", 4),
        ("<", 5),
        (">", 5),
        ("+", 6),
        ("-", 6),
        ("*", 7),
        ("/", 7),
        ("OVER", 7),
        ("**", 8),
    ];
    for (op, priority) in priorities {
        let mut tag = Tag::new(TableId::STANDARD, TagKind::Priority, interner.intern(op));
        tag.priority = priority;
        assert!(tables.add_tag(tag).is_ok());
    }
    for op in ["ABS", "NOT", "-", "+"] {
        let tag = Tag::new(TableId::STANDARD, TagKind::Operator, interner.intern(op));
        assert!(tables.add_tag(tag).is_ok());
    }
    tables
}

struct Parsed {
    module: Module,
    diagnostics: Diagnostics,
    top: NodeId,
}

impl Parsed {
    fn tree(&self) -> String {
        let serial = self.module.tree.child(self.top, 0).unwrap_or(self.top);
        self.module.tree.format(serial, &self.module.interner)
    }

    /// The rendering of every node with `attribute`, in pre-order.
    fn all(&self, attribute: Attribute) -> Vec<String> {
        self.nodes(attribute)
            .into_iter()
            .map(|id| self.module.tree.format(id, &self.module.interner))
            .collect()
    }

    fn nodes(&self, attribute: Attribute) -> Vec<NodeId> {
        self.module
            .tree
            .descendants(self.top)
            .into_iter()
            .filter(|&id| self.module.tree[id].attribute == attribute)
            .collect()
    }

    fn messages(&self) -> Vec<(ErrorCode, String)> {
        self.diagnostics
            .items()
            .iter()
            .map(|d| (d.code, d.message.clone()))
            .collect()
    }
}

fn parse_source(source: &str) -> Parsed {
    let interner = SharedInterner::new();
    let tables = standard_tables(&interner);
    let mut lines = SourceLines::from_source("test.a68", source);
    let mut options = Options::default();
    let mut diagnostics = Diagnostics::new();
    let tokens = a68_lexer::lex(&mut lines, &mut options, &interner, &mut diagnostics)
        .unwrap_or_default();
    assert!(!diagnostics.has_errors(), "lexical errors in {source:?}");
    let mut module = Module::new(interner, options, lines, tables);
    let top = match parse(&mut module, &tokens, &mut diagnostics) {
        Ok(top) => top,
        Err(fatal) => panic!("parse of {source:?} failed: {fatal}"),
    };
    Parsed {
        module,
        diagnostics,
        top,
    }
}

fn parse_clean(source: &str) -> Parsed {
    let parsed = parse_source(source);
    assert_eq!(parsed.messages(), vec![], "diagnostics for {source:?}");
    parsed
}

#[test]
fn identity_declaration_and_formula() {
    let parsed = parse_clean("INT x = 5; x + 2 * 3");
    assert_eq!(
        parsed.tree(),
        "(SerialClause \
         (IdentityDeclaration (Indicant \"INT\") (DefiningIdentifier \"x\" (IntDenotation \"5\"))) \
         (Formula (Identifier \"x\") (Operator \"+\") \
         (Formula (IntDenotation \"2\") (Operator \"*\") (IntDenotation \"3\"))))"
    );
}

#[test]
fn equal_priorities_associate_left() {
    let parsed = parse_clean("1 - 2 - 3");
    assert_eq!(
        parsed.tree(),
        "(SerialClause (Formula \
         (Formula (IntDenotation \"1\") (Operator \"-\") (IntDenotation \"2\")) \
         (Operator \"-\") (IntDenotation \"3\")))"
    );
}

#[test]
fn monadic_operators_bind_tightest() {
    let parsed = parse_clean("- x ** 2");
    assert_eq!(
        parsed.tree(),
        "(SerialClause (Formula \
         (MonadicFormula (Operator \"-\") (Identifier \"x\")) \
         (Operator \"**\") (IntDenotation \"2\")))"
    );
    let formula = parsed.nodes(Attribute::Formula)[0];
    let operator = parsed.module.tree.child(formula, 1).unwrap_or(formula);
    assert_eq!(parsed.module.tree[operator].info.priority, 8);
}

#[test]
fn variable_declarations_with_generators() {
    let parsed = parse_clean("HEAP REAL r := 1.5, s; LOC INT i; i := 2");
    assert_eq!(
        parsed.all(Attribute::VariableDeclaration),
        vec![
            "(VariableDeclaration (Indicant \"REAL\") \
             (DefiningIdentifier \"r\" (RealDenotation \"1.5\")) (DefiningIdentifier \"s\"))",
            "(VariableDeclaration (Indicant \"INT\") (DefiningIdentifier \"i\"))",
        ]
    );
    let heap = parsed.nodes(Attribute::VariableDeclaration);
    assert!(parsed.module.tree[heap[0]].info.heap);
    assert!(!parsed.module.tree[heap[1]].info.heap);
    assert_eq!(
        parsed.all(Attribute::Assignation),
        vec!["(Assignation (Identifier \"i\") (IntDenotation \"2\"))"]
    );
}

#[test]
fn joined_declarations_share_a_phrase() {
    let parsed = parse_clean("INT a = 1, REAL b = 2.0; a");
    let serial = parsed.module.tree.child_vec(parsed.module.tree.child(parsed.top, 0).unwrap_or(parsed.top));
    let kinds: Vec<_> = serial
        .iter()
        .map(|&id| parsed.module.tree[id].attribute)
        .collect();
    assert_eq!(
        kinds,
        vec![
            Attribute::IdentityDeclaration,
            Attribute::IdentityDeclaration,
            Attribute::Identifier
        ]
    );
}

#[test]
fn declarers() {
    let parsed = parse_clean(
        "MODE NODE = STRUCT (INT value, REF NODE next); \
         MODE U = UNION (INT, REAL); \
         [1:10, 5] FLEX [] CHAR table; \
         PROC (INT, REAL) BOOL p; \
         LONG LONG INT big; \
         SKIP",
    );
    assert_eq!(
        parsed.all(Attribute::ModeDeclaration),
        vec![
            "(ModeDeclaration (DefiningIndicant \"NODE\" (StructDeclarer \
             (Field (Indicant \"INT\") (DefiningIdentifier \"value\")) \
             (Field (RefDeclarer (Indicant \"NODE\")) (DefiningIdentifier \"next\")))))",
            "(ModeDeclaration (DefiningIndicant \"U\" \
             (UnionDeclarer (Indicant \"INT\") (Indicant \"REAL\"))))",
        ]
    );
    assert_eq!(
        parsed.all(Attribute::RowDeclarer)[0],
        "(RowDeclarer (Bounds (Bound (IntDenotation \"1\") (IntDenotation \"10\")) \
         (Bound (IntDenotation \"5\"))) \
         (FlexDeclarer (RowDeclarer (Bounds Bound) (Indicant \"CHAR\"))))"
    );
    assert_eq!(
        parsed.all(Attribute::ProcDeclarer),
        vec![
            "(ProcDeclarer (ParameterPack (Indicant \"INT\") (Indicant \"REAL\")) \
             (Indicant \"BOOL\"))"
        ]
    );
    assert!(parsed
        .all(Attribute::Indicant)
        .contains(&"(Indicant \"LONG LONG INT\")".to_string()));
}

#[test]
fn routine_texts_and_procedures() {
    let parsed = parse_clean(
        "PROC max = (INT a, b, REAL c) INT: a; \
         PROC hook := VOID: SKIP; \
         max (1, 2, 3.0)",
    );
    assert_eq!(
        parsed.all(Attribute::ProcedureDeclaration),
        vec![
            "(ProcedureDeclaration (DefiningIdentifier \"max\" (RoutineText \
             (ParameterPack \
             (Parameter (Indicant \"INT\") (DefiningIdentifier \"a\") (DefiningIdentifier \"b\")) \
             (Parameter (Indicant \"REAL\") (DefiningIdentifier \"c\"))) \
             (Indicant \"INT\") (Identifier \"a\"))))"
        ]
    );
    assert_eq!(
        parsed.all(Attribute::ProcedureVariableDeclaration),
        vec![
            "(ProcedureVariableDeclaration (DefiningIdentifier \"hook\" \
             (RoutineText (Indicant \"VOID\") Skip)))"
        ]
    );
    assert_eq!(
        parsed.all(Attribute::Call),
        vec![
            "(Call (Identifier \"max\") (ArgumentList \
             (IntDenotation \"1\") (IntDenotation \"2\") (RealDenotation \"3.0\")))"
        ]
    );

    let routine = parsed.nodes(Attribute::RoutineText)[0];
    let parameter = parsed.nodes(Attribute::Parameter)[0];
    let body_table = parsed.module.tree[parameter].table;
    assert_eq!(parsed.module.tables[body_table].proc_level, 1);
    assert_eq!(parsed.module.tables[body_table].node, Some(routine));
}

#[test]
fn operator_and_priority_declarations() {
    let parsed = parse_clean(
        "PRIO MAX = 9; \
         OP MAX = (INT a, b) INT: a; \
         OP (INT, INT) BOOL EQ = SKIP; \
         1 MAX 2",
    );
    assert_eq!(
        parsed.all(Attribute::PriorityDeclaration),
        vec!["(PriorityDeclaration (DefiningOperator \"MAX\" (Priority \"9\")))"]
    );
    let operators = parsed.all(Attribute::OperatorDeclaration);
    assert_eq!(
        operators[1],
        "(OperatorDeclaration (ProcDeclarer (ParameterPack (Indicant \"INT\") (Indicant \"INT\")) \
         (Indicant \"BOOL\")) (DefiningOperator \"EQ\" Skip))"
    );
    let formula = parsed.nodes(Attribute::Formula)[0];
    let operator = parsed.module.tree.child(formula, 1).unwrap_or(formula);
    assert_eq!(parsed.module.tree[operator].info.priority, 9);
}

#[test]
fn bold_word_is_mode_or_operator_by_nearest_range() {
    let parsed = parse_clean(
        "MODE MAX = INT; \
         BEGIN PRIO MAX = 9; OP MAX = (INT a, b) INT: a; 1 MAX 2 END; \
         MAX m = 1; m",
    );
    assert_eq!(
        parsed.all(Attribute::Formula),
        vec!["(Formula (IntDenotation \"1\") (Operator \"MAX\") (IntDenotation \"2\"))"]
    );
    let declarations = parsed.all(Attribute::IdentityDeclaration);
    assert_eq!(
        declarations,
        vec![
            "(IdentityDeclaration (Indicant \"MAX\") \
             (DefiningIdentifier \"m\" (IntDenotation \"1\")))"
        ]
    );
}

#[test]
fn ranges_nest_tables() {
    let parsed = parse_clean("INT a = 1; BEGIN INT b = 2; (INT c = 3; c) END");
    let levels: Vec<u32> = parsed
        .nodes(Attribute::DefiningIdentifier)
        .into_iter()
        .map(|id| parsed.module.tables[parsed.module.tree[id].table].level)
        .collect();
    assert_eq!(levels, vec![1, 2, 3]);
    let program_table = parsed.module.tree[parsed.top].table;
    assert_eq!(parsed.module.tables[program_table].previous, Some(TableId::STANDARD));
}

#[test]
fn collateral_and_closed_clauses() {
    let parsed = parse_clean("(1, 2, 3); (); (SKIP; SKIP)");
    assert_eq!(
        parsed.tree(),
        "(SerialClause \
         (CollateralClause (IntDenotation \"1\") (IntDenotation \"2\") (IntDenotation \"3\")) \
         CollateralClause \
         (ClosedClause (SerialClause Skip Skip)))"
    );
}

#[test]
fn conditional_clauses() {
    let parsed = parse_clean("IF TRUE THEN 1 ELIF FALSE THEN 2 ELSE 3 FI");
    assert_eq!(
        parsed.tree(),
        "(SerialClause (ConditionalClause \
         (EnquiryClause (SerialClause (BoolDenotation \"TRUE\"))) \
         (ThenPart (SerialClause (IntDenotation \"1\"))) \
         (ElsePart (ConditionalClause \
         (EnquiryClause (SerialClause (BoolDenotation \"FALSE\"))) \
         (ThenPart (SerialClause (IntDenotation \"2\"))) \
         (ElsePart (SerialClause (IntDenotation \"3\")))))))"
    );
    let brief = parse_clean("(TRUE | 1 | 2)");
    assert_eq!(
        brief.tree(),
        "(SerialClause (ConditionalClause \
         (EnquiryClause (SerialClause (BoolDenotation \"TRUE\"))) \
         (ThenPart (SerialClause (IntDenotation \"1\"))) \
         (ElsePart (SerialClause (IntDenotation \"2\")))))"
    );
}

#[test]
fn case_and_conformity_clauses() {
    let parsed = parse_clean("CASE 2 IN 10, 20 OUSE 1 IN 30 OUT 40 ESAC");
    assert_eq!(
        parsed.tree(),
        "(SerialClause (CaseClause \
         (EnquiryClause (SerialClause (IntDenotation \"2\"))) \
         (InPart (IntDenotation \"10\") (IntDenotation \"20\")) \
         (OutPart (CaseClause \
         (EnquiryClause (SerialClause (IntDenotation \"1\"))) \
         (InPart (IntDenotation \"30\")) \
         (OutPart (SerialClause (IntDenotation \"40\")))))))"
    );

    let conformity = parse_clean("(u | (INT i): i, (REAL): 0 | 1)");
    assert_eq!(
        conformity.tree(),
        "(SerialClause (ConformityClause \
         (EnquiryClause (SerialClause (Identifier \"u\"))) \
         (InPart \
         (SpecifiedUnit (Specifier (Indicant \"INT\") (DefiningIdentifier \"i\")) (Identifier \"i\")) \
         (SpecifiedUnit (Specifier (Indicant \"REAL\")) (IntDenotation \"0\"))) \
         (OutPart (SerialClause (IntDenotation \"1\")))))"
    );
}

#[test]
fn loop_clause() {
    let parsed = parse_clean("FOR i FROM 1 BY 2 TO 9 WHILE i < 5 DO SKIP OD");
    assert_eq!(
        parsed.tree(),
        "(SerialClause (LoopClause \
         (ForPart (DefiningIdentifier \"i\")) \
         (FromPart (IntDenotation \"1\")) \
         (ByPart (IntDenotation \"2\")) \
         (ToPart (IntDenotation \"9\")) \
         (WhilePart (SerialClause (Formula (Identifier \"i\") (Operator \"<\") (IntDenotation \"5\")))) \
         (DoPart (SerialClause Skip))))"
    );
    let counter = parsed.nodes(Attribute::DefiningIdentifier)[0];
    let condition = parsed.nodes(Attribute::Formula)[0];
    let tables = &parsed.module.tables;
    assert!(tables.is_within(
        parsed.module.tree[condition].table,
        parsed.module.tree[counter].table
    ));
}

#[test]
fn secondaries() {
    let parsed = parse_clean("re OF z := a[1, 2:3]; b[:n]; REAL (k); LOC INT; GOTO end; x :=: y");
    assert_eq!(
        parsed.tree(),
        "(SerialClause \
         (Assignation (Selection \"re\" (Identifier \"z\")) \
         (Slice (Identifier \"a\") (Indexer (IntDenotation \"1\") \
         (Trimmer (Bound (IntDenotation \"2\")) (Bound (IntDenotation \"3\")))))) \
         (Slice (Identifier \"b\") (Indexer (Trimmer Bound (Bound (Identifier \"n\"))))) \
         (Cast (Indicant \"REAL\") (ClosedClause (SerialClause (Identifier \"k\")))) \
         (Generator (Indicant \"INT\")) \
         (Jump \"end\") \
         (IdentityRelation \":=:\" (Identifier \"x\") (Identifier \"y\")))"
    );
}

#[test]
fn labels_and_completers() {
    let parsed = parse_clean("start: SKIP; IF TRUE THEN 1 EXIT finish: 2 FI");
    assert_eq!(
        parsed.all(Attribute::LabeledUnit),
        vec![
            "(LabeledUnit (Label \"start\") Skip)",
            "(LabeledUnit (Label \"finish\") (IntDenotation \"2\"))",
        ]
    );
    assert_eq!(parsed.nodes(Attribute::Completer).len(), 1);
}

#[test]
fn parenthesis_error_is_reported_once() {
    let parsed = parse_source("BEGIN (1 END");
    assert_eq!(
        parsed.messages(),
        vec![(ErrorCode::E1001, "parenthesis error, check for )".to_string())]
    );
    let unclosed = parse_source("IF TRUE THEN (1; 2");
    assert_eq!(unclosed.diagnostics.count_of(ErrorCode::E1001), 1);
}

#[test]
fn declaration_errors() {
    let mixed = parse_source("INT a = 1, b := 2; a");
    assert_eq!(
        mixed.messages(),
        vec![(
            ErrorCode::E1003,
            "probably mixed identity and variable declaration".to_string()
        )]
    );

    let trailing = parse_source("SKIP; INT a = 1");
    assert_eq!(
        trailing.messages(),
        vec![(ErrorCode::E1004, "clause cannot end with a declaration".to_string())]
    );

    let leftover = parse_source("INT x = 1; x SKIP");
    assert_eq!(
        leftover.messages(),
        vec![(ErrorCode::E1002, "syntax error: expected ;".to_string())]
    );
}

#[test]
fn one_syntax_error_per_phrase() {
    let parsed = parse_source("INT MAX = 1; SKIP");
    let messages = parsed.messages();
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert_eq!(messages[0].0, ErrorCode::E1002);

    let separate = parse_source("INT x = 1; x SKIP; x SKIP");
    assert_eq!(separate.diagnostics.count_of(ErrorCode::E1002), 2);
}

#[test]
fn priority_errors() {
    let range = parse_source("PRIO MAX = 10; SKIP");
    assert_eq!(range.diagnostics.count_of(ErrorCode::E1008), 1);

    let missing = parse_source("1 FOO 2");
    assert_eq!(
        missing.messages(),
        vec![(
            ErrorCode::E1007,
            "dyadic operator \"FOO\" has no priority".to_string()
        )]
    );
}

#[test]
fn duplicate_mode_is_reported() {
    let parsed = parse_source("MODE A = INT, A = REAL; SKIP");
    assert_eq!(parsed.diagnostics.count_of(ErrorCode::E2002), 1);
    let table = parsed.module.tree[parsed.top].table;
    assert_eq!(parsed.module.tables[table].chain(Namespace::Indicant).len(), 1);
}

#[test]
fn refinements_are_substituted() {
    let parsed = parse_clean("BEGIN init; x END. init: x := 1.");
    assert_eq!(
        parsed.all(Attribute::Assignation),
        vec!["(Assignation (Identifier \"x\") (IntDenotation \"1\"))"]
    );
    let refinements = &parsed.module.refinements;
    assert_eq!(refinements.len(), 1);
    assert_eq!(refinements[0].applications, 1);
    assert!(refinements[0].line_applied.is_some());
}

#[test]
fn refinement_errors() {
    let unapplied = parse_source("SKIP. unused: SKIP.");
    assert_eq!(unapplied.diagnostics.count_of(ErrorCode::W0002), 1);

    let twice = parse_source("BEGIN a; a END. a: SKIP.");
    assert_eq!(twice.diagnostics.count_of(ErrorCode::E1006), 1);

    let defined = parse_source("a. a: SKIP. a: SKIP.");
    assert_eq!(defined.diagnostics.count_of(ErrorCode::E1005), 1);
}

#[test]
fn empty_program_needs_a_unit() {
    let parsed = parse_source("");
    assert_eq!(
        parsed.messages(),
        vec![(ErrorCode::E1002, "syntax error: expected unit".to_string())]
    );
}
