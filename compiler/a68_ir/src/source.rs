//! Source line store.
//!
//! One [`SourceLine`] per physical input line, created once when the source
//! is loaded and kept for the whole compilation. Later passes only append
//! diagnostics or widen the recorded level bounds.

use std::ops::{Index, IndexMut};

use crate::{LineId, MessageId, NodeId};

/// Location of a token: the line it came from and its character column.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: LineId,
    /// 0-based character offset within the line.
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: LineId, column: u32) -> Self {
        Position { line, column }
    }
}

/// A physical line of source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    /// Line text without the terminating newline.
    pub text: String,
    /// 1-based line number.
    pub number: u32,
    /// Diagnostics attached to this line, in attachment order.
    pub messages: Vec<MessageId>,
    pub min_level: u32,
    pub max_level: u32,
    pub min_proc_level: u32,
    pub max_proc_level: u32,
    /// First tree node that originates on this line.
    pub top_node: Option<NodeId>,
}

impl SourceLine {
    fn new(text: String, number: u32) -> Self {
        SourceLine {
            text,
            number,
            messages: Vec::new(),
            min_level: u32::MAX,
            max_level: 0,
            min_proc_level: u32::MAX,
            max_proc_level: 0,
            top_node: None,
        }
    }

    /// Widen the level bounds to include a node at `level` / `proc_level`.
    pub fn note_level(&mut self, level: u32, proc_level: u32) {
        self.min_level = self.min_level.min(level);
        self.max_level = self.max_level.max(level);
        self.min_proc_level = self.min_proc_level.min(proc_level);
        self.max_proc_level = self.max_proc_level.max(proc_level);
    }

    /// Whether any node was recorded on this line.
    pub fn has_levels(&self) -> bool {
        self.min_level != u32::MAX
    }

    /// Characters of the line, for column-based access.
    pub fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }
}

/// Ordered store of the source lines of one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLines {
    file: String,
    lines: Vec<SourceLine>,
}

impl SourceLines {
    /// Split `text` into lines. A trailing newline does not produce an
    /// empty last line; an empty text still yields one (empty) line so
    /// that end-of-file diagnostics have somewhere to attach.
    pub fn from_source(file: &str, text: &str) -> Self {
        let mut lines: Vec<SourceLine> = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                SourceLine::new(line.to_owned(), u32::try_from(i + 1).unwrap_or(u32::MAX))
            })
            .collect();
        if lines.is_empty() {
            lines.push(SourceLine::new(String::new(), 1));
        }
        SourceLines {
            file: file.to_owned(),
            lines,
        }
    }

    /// Logical file name used in diagnostics.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, id: LineId) -> Option<&SourceLine> {
        self.lines.get(id.index())
    }

    pub fn get_mut(&mut self, id: LineId) -> Option<&mut SourceLine> {
        self.lines.get_mut(id.index())
    }

    /// Iterate over `(LineId, &SourceLine)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &SourceLine)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (LineId::from_usize(i), line))
    }

    /// Last line, used to position end-of-file diagnostics.
    pub fn last_id(&self) -> LineId {
        LineId::from_usize(self.lines.len().saturating_sub(1))
    }
}

impl Index<LineId> for SourceLines {
    type Output = SourceLine;

    fn index(&self, id: LineId) -> &SourceLine {
        &self.lines[id.index()]
    }
}

impl IndexMut<LineId> for SourceLines {
    fn index_mut(&mut self, id: LineId) -> &mut SourceLine {
        &mut self.lines[id.index()]
    }
}

#[cfg(test)]
mod tests;
