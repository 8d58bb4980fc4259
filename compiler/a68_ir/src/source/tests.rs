use pretty_assertions::assert_eq;

use super::*;

#[test]
fn lines_are_numbered_from_one() {
    let lines = SourceLines::from_source("test.a68", "BEGIN\n  SKIP\nEND\n");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines.file(), "test.a68");

    let numbers: Vec<u32> = lines.iter().map(|(_, line)| line.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(lines[LineId::new(1)].text, "  SKIP");
}

#[test]
fn empty_source_has_one_blank_line() {
    let lines = SourceLines::from_source("empty.a68", "");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.last_id(), LineId::new(0));
    assert_eq!(lines[LineId::new(0)].text, "");
}

#[test]
fn level_bounds_widen() {
    let mut lines = SourceLines::from_source("test.a68", "x");
    let id = LineId::new(0);
    assert!(!lines[id].has_levels());

    lines[id].note_level(3, 1);
    lines[id].note_level(2, 2);

    let line = &lines[id];
    assert!(line.has_levels());
    assert_eq!((line.min_level, line.max_level), (2, 3));
    assert_eq!((line.min_proc_level, line.max_proc_level), (1, 2));
}
