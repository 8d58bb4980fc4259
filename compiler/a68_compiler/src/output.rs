//! Result types of the compiler driver.

use a68_diagnostic::{Diagnostics, Fatal};
use a68_ir::{Module, SourceLines};
use a68_modes::ModeTable;

/// The first phase that reported an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorPhase {
    /// Lexical errors.
    Lex,
    /// Syntax errors.
    Parse,
    /// Undeclared or multiply declared tags, ill-formed modes.
    Bind,
    /// Mode errors.
    Mode,
    /// Scope errors.
    Scope,
}

/// Result of compiling one source text.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// No errors were reported and the compilation was not abandoned.
    pub success: bool,
    /// The annotated tree with its tables and refinements; `None` when the
    /// compilation was abandoned.
    pub module: Option<Module>,
    /// The finalised mode table the tree's modes refer to.
    pub modes: Option<ModeTable>,
    /// The source lines with their attached diagnostics.
    pub lines: SourceLines,
    pub diagnostics: Diagnostics,
    pub error_count: usize,
    pub warning_count: usize,
    pub error_phase: Option<ErrorPhase>,
    /// Why the compilation was abandoned, if it was.
    pub fatal: Option<Fatal>,
}
