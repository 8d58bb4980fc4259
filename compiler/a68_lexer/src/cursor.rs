//! Character cursor over the whole source.
//!
//! Lines are joined with `'\n'` so that comments and pragmats may span
//! lines; every offset maps back to a line and column.

use a68_ir::{LineId, Position, SourceLines};

pub(crate) struct Cursor {
    chars: Vec<char>,
    /// Offset of the first character of each line.
    line_starts: Vec<usize>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(lines: &SourceLines) -> Self {
        let mut chars = Vec::new();
        let mut line_starts = Vec::with_capacity(lines.len());
        for (_, line) in lines.iter() {
            line_starts.push(chars.len());
            chars.extend(line.text.chars());
            chars.push('\n');
        }
        Cursor {
            chars,
            line_starts,
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    #[inline]
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += 1;
        Some(c)
    }

    /// Move back to an earlier offset after a failed lookahead.
    pub(crate) fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.chars.len());
    }

    /// Consume `c` if it is the current character.
    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.current() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds, returning them.
    pub(crate) fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    /// Whether the text at the cursor starts with `s`.
    pub(crate) fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek(i) == Some(c))
    }

    pub(crate) fn position_of(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        let column = u32::try_from(offset - start).unwrap_or(u32::MAX);
        Position::new(LineId::from_usize(line), column)
    }
}

#[cfg(test)]
mod tests;
