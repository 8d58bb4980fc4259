use a68_ir::{LineId, Position};
use pretty_assertions::assert_eq;

use super::*;

fn lines() -> SourceLines {
    SourceLines::from_source("test.a68", "first\nsecond\nthird")
}

fn error_at(line: u32, column: u32, message: &str) -> Diagnostic {
    Diagnostic::error(
        ErrorCode::E2001,
        Position::new(LineId::new(line), column),
        message,
    )
}

#[test]
fn report_attaches_to_line_in_order() {
    let mut lines = lines();
    let mut sink = Diagnostics::new();

    let a = sink.report(&mut lines, error_at(1, 0, "a")).ok().flatten();
    let b = sink.report(&mut lines, error_at(1, 3, "b")).ok().flatten();
    let c = sink.report(&mut lines, error_at(2, 0, "c")).ok().flatten();

    assert_eq!(lines[LineId::new(1)].messages, vec![a.unwrap(), b.unwrap()]);
    assert_eq!(lines[LineId::new(2)].messages, vec![c.unwrap()]);
    assert!(lines[LineId::new(0)].messages.is_empty());
    assert_eq!(sink.error_count(), 3);
}

#[test]
fn cap_is_exceeded_not_reached() {
    let mut lines = lines();
    let mut sink = Diagnostics::with_config(DiagnosticConfig {
        error_limit: 2,
        no_warnings: false,
    });

    assert!(sink.report(&mut lines, error_at(0, 0, "one")).is_ok());
    assert!(sink.report(&mut lines, error_at(0, 1, "two")).is_ok());
    let third = sink.report(&mut lines, error_at(0, 2, "three"));
    assert_eq!(third, Err(Fatal::TooManyErrors { limit: 2 }));
    assert_eq!(sink.items().len(), 2);
}

#[test]
fn warnings_do_not_count_toward_cap() {
    let mut lines = lines();
    let mut sink = Diagnostics::with_config(DiagnosticConfig {
        error_limit: 1,
        no_warnings: false,
    });
    let position = Position::new(LineId::new(0), 0);
    for column in 0..5 {
        let warning = Diagnostic::warning(
            ErrorCode::W0001,
            Position::new(LineId::new(0), column),
            "unused",
        );
        assert!(sink.report(&mut lines, warning).is_ok());
    }
    assert!(sink
        .report(&mut lines, Diagnostic::error(ErrorCode::E3001, position, "x"))
        .is_ok());
    assert_eq!(sink.warning_count(), 5);
    assert_eq!(sink.error_count(), 1);
}

#[test]
fn suppressed_warnings_are_dropped() {
    let mut lines = lines();
    let mut sink = Diagnostics::new();
    sink.set_no_warnings(true);
    let warning = Diagnostic::warning(
        ErrorCode::W0001,
        Position::new(LineId::new(0), 0),
        "unused",
    );
    assert_eq!(sink.report(&mut lines, warning), Ok(None));
    assert!(sink.items().is_empty());
}

#[test]
fn identical_diagnostics_are_reported_once() {
    let mut lines = lines();
    let mut sink = Diagnostics::new();
    assert!(sink.report(&mut lines, error_at(0, 0, "same")).is_ok());
    assert_eq!(sink.report(&mut lines, error_at(0, 0, "same")), Ok(None));
    assert_eq!(sink.count_of(ErrorCode::E2001), 1);
}

#[test]
fn internal_failure_is_fatal() {
    let fatal = Diagnostics::internal("node without parent");
    assert_eq!(
        fatal.to_string(),
        "internal consistency check failure: node without parent"
    );
}

#[test]
fn termination_bypasses_the_cap() {
    let mut lines = lines();
    let mut sink = Diagnostics::with_config(DiagnosticConfig {
        error_limit: 1,
        no_warnings: false,
    });
    assert!(sink.report(&mut lines, error_at(2, 0, "one")).is_ok());
    let fatal = sink
        .report(&mut lines, error_at(2, 1, "two"))
        .unwrap_err();
    let id = sink.terminate(&mut lines, &fatal, Position::new(LineId::new(2), 1));

    assert_eq!(sink.items().len(), 2);
    assert_eq!(sink.count_of(ErrorCode::E9002), 1);
    assert_eq!(lines[LineId::new(2)].messages.last(), Some(&id));
    assert_eq!(sink.items()[1].message, "too many errors (more than 1)");
}
