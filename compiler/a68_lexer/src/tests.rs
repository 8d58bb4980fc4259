use a68_diagnostic::{Diagnostics, ErrorCode};
use a68_ir::{Attribute, LineId, Options, Position, SourceLines, StringInterner, Stropping};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

struct Scanned {
    tokens: Vec<Token>,
    interner: StringInterner,
    diagnostics: Diagnostics,
    options: Options,
}

impl Scanned {
    fn lexemes(&self) -> Vec<(Attribute, &str)> {
        self.tokens
            .iter()
            .map(|t| (t.attribute, self.interner.lookup(t.symbol)))
            .collect()
    }
}

fn scan_with(text: &str, mut options: Options) -> Scanned {
    let mut lines = SourceLines::from_source("test.a68", text);
    let interner = StringInterner::new();
    let mut diagnostics = Diagnostics::new();
    let tokens = lex(&mut lines, &mut options, &interner, &mut diagnostics).unwrap();
    Scanned {
        tokens,
        interner,
        diagnostics,
        options,
    }
}

fn scan(text: &str) -> Scanned {
    scan_with(text, Options::default())
}

#[test]
fn identity_declaration() {
    let scanned = scan("INT foo = 5;");
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::BoldTag, "INT"),
            (Attribute::Identifier, "foo"),
            (Attribute::EqualsSymbol, "="),
            (Attribute::IntDenotation, "5"),
            (Attribute::SemiSymbol, ";"),
        ]
    );
    assert_eq!(
        print_tokens(&scanned.tokens, &scanned.interner, Stropping::Bold),
        "INT foo = 5 ;"
    );
    assert!(!scanned.diagnostics.has_errors());
}

#[test]
fn reserved_words_are_keywords() {
    let scanned = scan("BEGIN SKIP END");
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::BeginSymbol, "BEGIN"),
            (Attribute::SkipSymbol, "SKIP"),
            (Attribute::EndSymbol, "END"),
        ]
    );
}

#[test]
fn quote_stropping() {
    let options = Options {
        stropping: Stropping::Quote,
        ..Options::default()
    };
    let scanned = scan_with("'begin' 'int' Max = 1 'end'", options);
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::BeginSymbol, "BEGIN"),
            (Attribute::BoldTag, "INT"),
            (Attribute::Identifier, "Max"),
            (Attribute::EqualsSymbol, "="),
            (Attribute::IntDenotation, "1"),
            (Attribute::EndSymbol, "END"),
        ]
    );
    assert_eq!(
        print_tokens(&scanned.tokens, &scanned.interner, Stropping::Quote),
        "'begin' 'int' Max = 1 'end'"
    );
}

#[test]
fn pragmat_switches_stropping() {
    let scanned = scan("PR quote stropping PR 'int' a");
    assert_eq!(
        scanned.lexemes(),
        vec![(Attribute::BoldTag, "INT"), (Attribute::Identifier, "a")]
    );
    assert_eq!(scanned.options.stropping, Stropping::Quote);
}

#[test]
fn unknown_pragmat_item_warns() {
    let scanned = scan("PR optimise PR SKIP");
    assert_eq!(scanned.diagnostics.warning_count(), 1);
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::W0003), 1);
    assert!(!scanned.diagnostics.has_errors());
}

#[test]
fn nowarnings_pragmat_silences_later_warnings() {
    let scanned = scan("PR nowarnings PR PR optimise PR SKIP");
    assert_eq!(scanned.diagnostics.warning_count(), 0);
    assert!(scanned.options.no_warnings);
}

#[test]
fn spaces_in_identifiers_are_dropped() {
    let scanned = scan("long name := x 1");
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::Identifier, "longname"),
            (Attribute::AssignSymbol, ":="),
            (Attribute::Identifier, "x1"),
        ]
    );
}

#[test]
fn comments_are_skipped() {
    let scanned = scan("# hash # 1 CO bold CO 2 COMMENT long\nform COMMENT 3");
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::IntDenotation, "1"),
            (Attribute::IntDenotation, "2"),
            (Attribute::IntDenotation, "3"),
        ]
    );
}

#[test]
fn unterminated_comment() {
    let scanned = scan("SKIP # never closed");
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::E0004), 1);
    assert_eq!(scanned.lexemes(), vec![(Attribute::SkipSymbol, "SKIP")]);
}

#[test]
fn denotations() {
    let scanned = scan("3.14 1e10 2.5e-3 2r101 .5 16rFF 42");
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::RealDenotation, "3.14"),
            (Attribute::RealDenotation, "1e10"),
            (Attribute::RealDenotation, "2.5e-3"),
            (Attribute::BitsDenotation, "2r101"),
            (Attribute::RealDenotation, ".5"),
            (Attribute::BitsDenotation, "16rff"),
            (Attribute::IntDenotation, "42"),
        ]
    );
}

#[test]
fn bad_radix() {
    let scanned = scan("3r12");
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::E0003), 1);
    assert_eq!(scanned.lexemes(), vec![(Attribute::BitsDenotation, "3r12")]);
}

#[test]
fn exponent_without_digits() {
    let scanned = scan("1e+");
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::E0003), 1);
}

#[test]
fn string_denotations() {
    let scanned = scan(r#""a""b" "x""#);
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::RowCharDenotation, "a\"b"),
            (Attribute::RowCharDenotation, "x"),
        ]
    );
    assert_eq!(
        print_tokens(&scanned.tokens, &scanned.interner, Stropping::Bold),
        r#""a""b" "x""#
    );
}

#[test]
fn unterminated_string() {
    let scanned = scan("\"abc\nSKIP");
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::E0001), 1);
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::RowCharDenotation, "abc"),
            (Attribute::SkipSymbol, "SKIP"),
        ]
    );
}

#[test]
fn operators_and_punctuation() {
    let scanned = scan("a +:= b; c /= d; e ** 2; f :=: g; h :/=: i |: x:=-1.");
    assert_eq!(
        scanned.lexemes(),
        vec![
            (Attribute::Identifier, "a"),
            (Attribute::Operator, "+:="),
            (Attribute::Identifier, "b"),
            (Attribute::SemiSymbol, ";"),
            (Attribute::Identifier, "c"),
            (Attribute::Operator, "/="),
            (Attribute::Identifier, "d"),
            (Attribute::SemiSymbol, ";"),
            (Attribute::Identifier, "e"),
            (Attribute::Operator, "**"),
            (Attribute::IntDenotation, "2"),
            (Attribute::SemiSymbol, ";"),
            (Attribute::Identifier, "f"),
            (Attribute::IsSymbol, ":=:"),
            (Attribute::Identifier, "g"),
            (Attribute::SemiSymbol, ";"),
            (Attribute::Identifier, "h"),
            (Attribute::IsntSymbol, ":/=:"),
            (Attribute::Identifier, "i"),
            (Attribute::ElseBarSymbol, "|:"),
            (Attribute::Identifier, "x"),
            (Attribute::AssignSymbol, ":="),
            (Attribute::Operator, "-"),
            (Attribute::IntDenotation, "1"),
            (Attribute::PointSymbol, "."),
        ]
    );
}

#[test]
fn go_to() {
    let scanned = scan("GO TO end; GOTO end; GO");
    let attributes: Vec<Attribute> = scanned.tokens.iter().map(|t| t.attribute).collect();
    assert_eq!(
        attributes,
        vec![
            Attribute::GotoSymbol,
            Attribute::Identifier,
            Attribute::SemiSymbol,
            Attribute::GotoSymbol,
            Attribute::Identifier,
            Attribute::SemiSymbol,
            Attribute::BoldTag,
        ]
    );
}

#[test]
fn invalid_character() {
    let scanned = scan("x @ y");
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::E0002), 1);
    assert_eq!(scanned.tokens.len(), 2);
}

#[test]
fn braces_need_brackets_option() {
    let scanned = scan("{ }");
    assert_eq!(scanned.diagnostics.count_of(ErrorCode::E0002), 2);

    let scanned = scan("PR brackets PR { }");
    assert_eq!(
        scanned.lexemes(),
        vec![(Attribute::OpenSymbol, "("), (Attribute::CloseSymbol, ")")]
    );
}

#[test]
fn positions() {
    let scanned = scan("BEGIN\n  x := 1\nEND");
    let positions: Vec<Position> = scanned.tokens.iter().map(|t| t.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::new(LineId::new(0), 0),
            Position::new(LineId::new(1), 2),
            Position::new(LineId::new(1), 4),
            Position::new(LineId::new(1), 7),
            Position::new(LineId::new(2), 0),
        ]
    );
}

#[test]
fn identifier_before_denotation_prints_on_new_line() {
    let scanned = scan("x\n1");
    let printed = print_tokens(&scanned.tokens, &scanned.interner, Stropping::Bold);
    assert_eq!(printed, "x\n1");
}

const LEXEMES: &[&str] = &[
    "BEGIN", "END", "INT", "REAL", "MODE", "x", "abc", "1", "3.5", "2r10", "\"s\"", "\"q\"\"\"",
    "+", "*", "<=", "(", ")", "[", "]", ";", ",", ":=", "=", ":=:", "IF", "THEN", "FI", "|",
];

proptest! {
    #[test]
    fn print_then_lex_is_stable(picks in prop::collection::vec(0..LEXEMES.len(), 0..40)) {
        let text = picks.iter().map(|&i| LEXEMES[i]).collect::<Vec<_>>().join(" ");
        let first = scan(&text);
        for stropping in [Stropping::Bold, Stropping::Quote] {
            let printed = print_tokens(&first.tokens, &first.interner, stropping);
            let options = Options { stropping, ..Options::default() };
            let second = scan_with(&printed, options);
            prop_assert_eq!(first.lexemes(), second.lexemes());
        }
    }
}
