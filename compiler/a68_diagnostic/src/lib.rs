//! Diagnostic system for the Algol 68 front-end.
//!
//! - [`Diagnostic`]: severity, error code, message, exact position
//! - [`Diagnostics`]: accumulates diagnostics against their source lines and
//!   enforces the error cap
//! - [`Fatal`]: the only error that stops the pipeline, either because the
//!   cap was exceeded or because a compiler invariant broke
//! - [`emitter`]: renders lines with per-character markers
//!
//! Every pass returns `Result<_, Fatal>`; user errors are reported through
//! the sink and never returned as `Err`.

mod diagnostic;
pub mod emitter;
mod error_code;
mod fatal;
mod sink;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use fatal::Fatal;
pub use sink::{DiagnosticConfig, Diagnostics, MAX_ERRORS};
