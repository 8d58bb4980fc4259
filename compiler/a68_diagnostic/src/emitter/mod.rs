//! Diagnostic Emitters
//!
//! Renders accumulated diagnostics against the source line store: each
//! line with diagnostics is printed once, followed by a marker line that
//! numbers every diagnostic under the character it applies to.

mod terminal;

pub use terminal::TerminalEmitter;

use a68_ir::SourceLines;

use crate::Diagnostics;

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Render all diagnostics of a compilation to a string.
pub fn render(lines: &SourceLines, diagnostics: &Diagnostics, color: ColorMode) -> String {
    let mut buf = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut buf, color, false);
        emitter.emit_lines(lines, diagnostics);
        emitter.emit_summary(diagnostics.error_count(), diagnostics.warning_count());
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests;
