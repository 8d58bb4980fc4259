//! Error codes for all front-end diagnostics.
//!
//! The first digit names the phase that reports the diagnostic.

use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### / W#### where the first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Binding errors
/// - E3xxx: Mode errors
/// - E4xxx: Scope errors
/// - W0xxx: Warnings
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string denotation
    E0001,
    /// Invalid character in source
    E0002,
    /// Malformed denotation (exponent or radix without digits)
    E0003,
    /// Unterminated comment
    E0004,
    /// Unterminated pragmat
    E0005,

    // Parser Errors (E1xxx)
    /// Parenthesis mismatch
    E1001,
    /// Syntax error: expected construct
    E1002,
    /// Mixed identity and variable declaration
    E1003,
    /// Clause ends with a declaration
    E1004,
    /// Refinement defined more than once
    E1005,
    /// Refinement applied more than once
    E1006,
    /// Dyadic operator without priority
    E1007,
    /// Priority out of range
    E1008,

    // Binding Errors (E2xxx)
    /// Undeclared tag
    E2001,
    /// Multiply declared tag
    E2002,
    /// Undeclared indicant
    E2003,
    /// Undeclared label
    E2004,

    // Mode Errors (E3xxx)
    /// Mode cannot be coerced
    E3001,
    /// Mode is not well formed
    E3002,
    /// Operator not declared for operand modes
    E3003,
    /// Selection of a field that does not exist
    E3004,
    /// Call of a non-procedure, or wrong number of arguments
    E3005,
    /// Rows with different bounds in one display
    E3006,
    /// Destination of an assignation is not a name
    E3007,
    /// Alternatives cannot be balanced
    E3008,
    /// Conformity specifier is not a component of the union
    E3009,
    /// Wrong number of indices
    E3010,
    /// Operator with a wrong number of operands
    E3011,

    // Scope Errors (E4xxx)
    /// Value exported out of its scope
    E4001,

    // Warnings (W0xxx)
    /// Tag is not used
    W0001,
    /// Refinement is not applied
    W0002,
    /// Unrecognised pragmat item
    W0003,

    // Internal Errors (E9xxx)
    /// Internal consistency check failure
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// Code as printed in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E4001 => "E4001",
            ErrorCode::W0001 => "W0001",
            ErrorCode::W0002 => "W0002",
            ErrorCode::W0003 => "W0003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Whether this code is a warning.
    pub const fn is_warning(self) -> bool {
        matches!(self, ErrorCode::W0001 | ErrorCode::W0002 | ErrorCode::W0003)
    }

    /// Whether this code is a syntax error (lexer or parser).
    pub const fn is_syntax(self) -> bool {
        matches!(
            self,
            ErrorCode::E0001
                | ErrorCode::E0002
                | ErrorCode::E0003
                | ErrorCode::E0004
                | ErrorCode::E0005
                | ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
                | ErrorCode::E1007
                | ErrorCode::E1008
        )
    }

    /// One-line description for `--explain` style lookups.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string denotation",
            ErrorCode::E0002 => "invalid character in source",
            ErrorCode::E0003 => "malformed denotation",
            ErrorCode::E0004 => "unterminated comment",
            ErrorCode::E0005 => "unterminated pragmat",
            ErrorCode::E1001 => "parenthesis mismatch",
            ErrorCode::E1002 => "syntax error",
            ErrorCode::E1003 => "mixed identity and variable declaration",
            ErrorCode::E1004 => "clause ends with a declaration",
            ErrorCode::E1005 => "refinement defined more than once",
            ErrorCode::E1006 => "refinement applied more than once",
            ErrorCode::E1007 => "dyadic operator without priority",
            ErrorCode::E1008 => "priority out of range",
            ErrorCode::E2001 => "undeclared tag",
            ErrorCode::E2002 => "multiply declared tag",
            ErrorCode::E2003 => "undeclared indicant",
            ErrorCode::E2004 => "undeclared label",
            ErrorCode::E3001 => "mode cannot be coerced",
            ErrorCode::E3002 => "mode is not well formed",
            ErrorCode::E3003 => "operator not declared for these operands",
            ErrorCode::E3004 => "no such field",
            ErrorCode::E3005 => "invalid call",
            ErrorCode::E3006 => "rows have different bounds",
            ErrorCode::E3007 => "destination is not a name",
            ErrorCode::E3008 => "alternatives cannot be balanced",
            ErrorCode::E3009 => "specifier is not a component of the union",
            ErrorCode::E3010 => "wrong number of indices",
            ErrorCode::E3011 => "wrong number of operands",
            ErrorCode::E4001 => "value exported out of its scope",
            ErrorCode::W0001 => "tag is not used",
            ErrorCode::W0002 => "refinement is not applied",
            ErrorCode::W0003 => "unrecognised pragmat item",
            ErrorCode::E9001 => "internal consistency check failure",
            ErrorCode::E9002 => "too many errors",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
