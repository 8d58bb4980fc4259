//! Conditions that stop the whole pipeline.

use a68_ir::Position;

use crate::{Diagnostic, ErrorCode};

/// Reason to abandon the compilation.
///
/// Returned as `Err` from every pass and propagated with `?` to the driver,
/// which is the single point where compilation stops.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Fatal {
    /// More errors were reported than the configured cap allows.
    #[error("too many errors (more than {limit})")]
    TooManyErrors { limit: usize },
    /// A compiler invariant was violated.
    #[error("internal consistency check failure: {message}")]
    Internal { message: String },
}

impl Fatal {
    /// Termination diagnostic reported in place of further output.
    pub fn to_diagnostic(&self, position: Position) -> Diagnostic {
        let code = match self {
            Fatal::TooManyErrors { .. } => ErrorCode::E9002,
            Fatal::Internal { .. } => ErrorCode::E9001,
        };
        Diagnostic::error(code, position, self.to_string())
    }
}
