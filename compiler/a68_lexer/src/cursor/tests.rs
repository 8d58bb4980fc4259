use a68_ir::{LineId, Position, SourceLines};
use pretty_assertions::assert_eq;

use super::Cursor;

#[test]
fn positions_follow_lines() {
    let lines = SourceLines::from_source("t.a68", "ab\ncd");
    let mut cursor = Cursor::new(&lines);
    assert_eq!(cursor.position_of(cursor.offset()), Position::new(LineId::new(0), 0));
    cursor.bump();
    cursor.bump();
    assert_eq!(cursor.current(), Some('\n'));
    assert_eq!(cursor.position_of(cursor.offset()), Position::new(LineId::new(0), 2));
    cursor.bump();
    assert_eq!(cursor.position_of(cursor.offset()), Position::new(LineId::new(1), 0));
    assert!(cursor.starts_with("cd"));
    cursor.bump();
    cursor.bump();
    cursor.bump();
    assert_eq!(cursor.current(), None);
}
