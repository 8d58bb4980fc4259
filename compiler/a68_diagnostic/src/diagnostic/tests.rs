use a68_ir::LineId;

use super::*;

#[test]
fn display_includes_severity_and_code() {
    let position = Position::new(LineId::new(0), 4);
    let error = Diagnostic::error(
        ErrorCode::E2001,
        position,
        "tag \"y\" has not been declared in this range",
    );
    assert!(error.is_error());
    assert_eq!(
        error.to_string(),
        "error: tag \"y\" has not been declared in this range [E2001]"
    );

    let warning = Diagnostic::warning(ErrorCode::W0001, position, "tag \"x\" is not used");
    assert!(!warning.is_error());
    assert_eq!(warning.to_string(), "warning: tag \"x\" is not used [W0001]");
}
