//! Compilation options read by the lexer and parser.
//!
//! The record is populated by the caller; pragmats in the source fold
//! further settings into it while lexing.

/// Convention for writing bold words.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Stropping {
    /// Bold words are written in upper case: `BEGIN`, `INT`.
    #[default]
    Bold,
    /// Bold words are enclosed in apostrophes: `'begin'`, `'int'`.
    Quote,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Options {
    pub stropping: Stropping,
    /// Suppress warnings.
    pub no_warnings: bool,
    /// Warn about declarations that are never applied.
    pub unused: bool,
    /// Accept `{` and `}` as open and close symbols.
    pub brackets: bool,
    /// Log every parser reduction.
    pub reductions: bool,
}

impl Options {
    /// Apply one pragmat item such as `quote-stropping` or `--unused`.
    ///
    /// Returns `false` if the item is not recognised.
    pub fn apply_pragmat_item(&mut self, item: &str) -> bool {
        let key: String = item
            .trim_start_matches('-')
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "quotestropping" | "quote" => self.stropping = Stropping::Quote,
            "upperstropping" | "boldstropping" | "upper" | "bold" => {
                self.stropping = Stropping::Bold;
            }
            "nowarnings" => self.no_warnings = true,
            "warnings" => self.no_warnings = false,
            "unused" => self.unused = true,
            "brackets" => self.brackets = true,
            "reductions" => self.reductions = true,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests;
