//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::Write;

use a68_ir::{SourceLine, SourceLines};

use crate::{Diagnostic, Diagnostics, Severity};

use super::ColorMode;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const BOLD: &str = "\x1b[1m";
    pub const MARKER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Returns "s" for plural counts, "" for singular.
#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Digit used to mark the `n`th (1-based) diagnostic of a line.
fn marker_char(n: usize) -> char {
    u32::try_from(n)
        .ok()
        .filter(|&n| n < 10)
        .and_then(|n| char::from_digit(n, 10))
        .unwrap_or('*')
}

/// Build the marker line for `line`: the number of each diagnostic sits
/// under its column, and tabs in the text are copied so markers align.
pub(crate) fn marker_line(line: &SourceLine, columns: &[u32]) -> String {
    let text: Vec<char> = line.text.chars().collect();
    let width = columns
        .iter()
        .map(|&c| c as usize + columns.len() + 1)
        .max()
        .unwrap_or(0)
        .max(text.len());
    let mut marks: Vec<char> = (0..width)
        .map(|i| if text.get(i) == Some(&'\t') { '\t' } else { ' ' })
        .collect();
    for (n, &column) in columns.iter().enumerate() {
        let mut at = column as usize;
        while at < marks.len() && marks[at] != ' ' && marks[at] != '\t' {
            at += 1;
        }
        if at >= marks.len() {
            marks.resize(at + 1, ' ');
        }
        marks[at] = marker_char(n + 1);
    }
    let rendered: String = marks.into_iter().collect();
    rendered.trim_end().to_owned()
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
        };
        self.write_colored(&severity.to_string(), color);
    }

    /// Emit one numbered diagnostic: `  n: error: message [CODE]`.
    fn emit_numbered(&mut self, n: usize, diagnostic: &Diagnostic) {
        let _ = write!(self.writer, "  {n}: ");
        self.write_severity(diagnostic.severity);
        let _ = write!(self.writer, ": {} ", diagnostic.message);
        self.write_colored(&format!("[{}]", diagnostic.code), colors::BOLD);
        let _ = writeln!(self.writer);
    }

    /// Emit every line that carries diagnostics, with its marker line.
    pub fn emit_lines(&mut self, lines: &SourceLines, diagnostics: &Diagnostics) {
        for (_, line) in lines.iter() {
            if line.messages.is_empty() {
                continue;
            }
            let attached: Vec<&Diagnostic> = line
                .messages
                .iter()
                .filter_map(|&id| diagnostics.get(id))
                .collect();
            let columns: Vec<u32> = attached.iter().map(|d| d.position.column).collect();

            let prefix = format!("{}:{:<5} ", lines.file(), line.number);
            let _ = writeln!(self.writer, "{prefix}{}", line.text);
            let markers = marker_line(line, &columns);
            let _ = write!(self.writer, "{}", " ".repeat(prefix.chars().count()));
            self.write_colored(&markers, colors::MARKER);
            let _ = writeln!(self.writer);
            for (i, diagnostic) in attached.iter().enumerate() {
                self.emit_numbered(i + 1, diagnostic);
            }
        }
    }

    /// Emit a summary of errors/warnings.
    pub fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }
        let _ = writeln!(
            self.writer,
            "{error_count} error{}, {warning_count} warning{}",
            plural_s(error_count),
            plural_s(warning_count)
        );
    }

    /// Flush any buffered output.
    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
