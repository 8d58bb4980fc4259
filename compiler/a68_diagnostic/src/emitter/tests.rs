use a68_ir::{LineId, Position};
use pretty_assertions::assert_eq;

use super::terminal::marker_line;
use super::*;
use crate::{Diagnostic, ErrorCode};

#[test]
fn markers_sit_under_their_columns() {
    let lines = SourceLines::from_source("t.a68", "x := y + z");
    let markers = marker_line(&lines[LineId::new(0)], &[5, 9]);
    assert_eq!(markers, "     1   2");
}

#[test]
fn markers_at_same_column_do_not_overlap() {
    let lines = SourceLines::from_source("t.a68", "abc");
    let markers = marker_line(&lines[LineId::new(0)], &[1, 1]);
    assert_eq!(markers, " 12");
}

#[test]
fn tabs_are_preserved_for_alignment() {
    let lines = SourceLines::from_source("t.a68", "\tfoo");
    let markers = marker_line(&lines[LineId::new(0)], &[1]);
    assert_eq!(markers, "\t1");
}

#[test]
fn render_numbers_diagnostics_per_line() {
    let mut lines = SourceLines::from_source("t.a68", "BEGIN\n  x := y + z\nEND");
    let mut sink = Diagnostics::new();
    for (column, name) in [(7, "y"), (11, "z")] {
        let diagnostic = Diagnostic::error(
            ErrorCode::E2001,
            Position::new(LineId::new(1), column),
            format!("tag \"{name}\" has not been declared in this range"),
        );
        assert!(sink.report(&mut lines, diagnostic).is_ok());
    }

    let rendered = render(&lines, &sink, ColorMode::Never);
    let expected = "\
t.a68:2       x := y + z
                   1   2
  1: error: tag \"y\" has not been declared in this range [E2001]
  2: error: tag \"z\" has not been declared in this range [E2001]
2 errors, 0 warnings
";
    assert_eq!(rendered, expected);
}

#[test]
fn color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}
