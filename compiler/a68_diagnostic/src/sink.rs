//! Diagnostic sink: accumulates diagnostics per source line and enforces the
//! error cap.
//!
//! Features:
//! - Each diagnostic is attached to its source line in report order
//! - Identical diagnostics at the same position are reported once
//! - Warnings can be suppressed and never count toward the cap
//! - Exceeding the cap yields [`Fatal::TooManyErrors`]

use a68_ir::{MessageId, Position, SourceLines};

use crate::{Diagnostic, ErrorCode, Fatal};

/// Default number of errors tolerated before compilation stops.
pub const MAX_ERRORS: usize = 8;

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Drop warnings instead of recording them.
    pub no_warnings: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: MAX_ERRORS,
            no_warnings: false,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            no_warnings: false,
        }
    }
}

/// Accumulated diagnostics of one compilation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    config: DiagnosticConfig,
}

impl Diagnostics {
    /// Create a sink with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a sink with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        Diagnostics {
            items: Vec::new(),
            error_count: 0,
            warning_count: 0,
            config,
        }
    }

    /// Toggle warning suppression; pragmats may change it mid-source.
    pub fn set_no_warnings(&mut self, no_warnings: bool) {
        self.config.no_warnings = no_warnings;
    }

    /// Record `diagnostic` and attach it to its source line.
    ///
    /// Returns the message handle, or `None` if the diagnostic was filtered.
    /// Fails with [`Fatal::TooManyErrors`] once the error count exceeds the
    /// configured cap; the offending error is not recorded.
    pub fn report(
        &mut self,
        lines: &mut SourceLines,
        diagnostic: Diagnostic,
    ) -> Result<Option<MessageId>, Fatal> {
        let is_error = diagnostic.is_error();
        if !is_error && self.config.no_warnings {
            return Ok(None);
        }
        if self.is_duplicate(&diagnostic) {
            return Ok(None);
        }
        if is_error {
            if self.config.error_limit > 0 && self.error_count >= self.config.error_limit {
                tracing::debug!(limit = self.config.error_limit, "error cap exceeded");
                return Err(Fatal::TooManyErrors {
                    limit: self.config.error_limit,
                });
            }
            self.error_count += 1;
        } else {
            self.warning_count += 1;
        }

        let id = MessageId::from_usize(self.items.len());
        if diagnostic.position.line.index() < lines.len() {
            lines[diagnostic.position.line].messages.push(id);
        }
        self.items.push(diagnostic);
        Ok(Some(id))
    }

    /// Build the fatal error for a broken compiler invariant.
    pub fn internal(message: impl Into<String>) -> Fatal {
        let message = message.into();
        tracing::debug!(%message, "internal consistency check failure");
        Fatal::Internal { message }
    }

    /// Record the termination diagnostic of `fatal` at `position`.
    ///
    /// The cap does not apply: this is the last entry of a compilation.
    pub fn terminate(
        &mut self,
        lines: &mut SourceLines,
        fatal: &Fatal,
        position: Position,
    ) -> MessageId {
        let id = MessageId::from_usize(self.items.len());
        if position.line.index() < lines.len() {
            lines[position.line].messages.push(id);
        }
        self.error_count += 1;
        self.items.push(fatal.to_diagnostic(position));
        id
    }

    fn is_duplicate(&self, diagnostic: &Diagnostic) -> bool {
        self.items.iter().rev().take(8).any(|d| {
            d.position == diagnostic.position
                && d.code == diagnostic.code
                && d.message == diagnostic.message
        })
    }

    pub fn get(&self, id: MessageId) -> Option<&Diagnostic> {
        self.items.get(id.index())
    }

    /// All diagnostics in report order.
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Number of recorded diagnostics with the given code.
    pub fn count_of(&self, code: ErrorCode) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }
}

#[cfg(test)]
mod tests;
