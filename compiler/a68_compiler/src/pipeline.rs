//! The compilation pipeline: lex, parse, bind, check.
//!
//! Source comes in as `&str`; the annotated tree and every diagnostic come
//! out as a [`CompileOutput`]. No filesystem access happens here.

use a68_bind::{bind_tags, collect_modes, collect_tags, set_levels, StandardEnvironment};
use a68_check::{check_unused, insert_coercions, mode_check, scope_check};
use a68_diagnostic::{DiagnosticConfig, Diagnostics, Fatal};
use a68_ir::{LineId, Module, Options, Position, SourceLines};
use a68_modes::ModeTable;

use crate::output::{CompileOutput, ErrorPhase};

/// Configuration for a compilation run.
#[derive(Clone, Debug)]
pub struct CompileConfig {
    /// Logical file path (used in diagnostics, not for IO).
    pub file_path: String,
    /// Initial options; pragmats in the source may change them.
    pub options: Options,
    pub diagnostics: DiagnosticConfig,
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            file_path: "input.a68".to_string(),
            options: Options::default(),
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

/// Compile `source` against the standard environment `env`.
///
/// Phases run in order and compilation stops after the first phase that
/// reports an error, except that binding errors carry on into mode
/// checking so each undeclared tag is reported exactly once. Exceeding the
/// error cap abandons the compilation: the output then has no module and
/// its diagnostics end with the termination entry.
#[tracing::instrument(level = "debug", skip_all, fields(file = %config.file_path))]
pub fn compile(source: &str, env: &StandardEnvironment, config: &CompileConfig) -> CompileOutput {
    let lines = SourceLines::from_source(&config.file_path, source);
    let mut session = Session {
        module: Module::new(
            env.interner().clone(),
            config.options.clone(),
            lines,
            env.tables().clone(),
        ),
        modes: env.modes().clone(),
        diagnostics: Diagnostics::with_config(config.diagnostics.clone()),
        error_phase: None,
        phase: ErrorPhase::Lex,
    };
    match session.run() {
        Ok(()) => session.finish(),
        Err(fatal) => session.abandon(fatal),
    }
}

/// State of one compilation between phases.
struct Session {
    module: Module,
    modes: ModeTable,
    diagnostics: Diagnostics,
    error_phase: Option<ErrorPhase>,
    /// Phase currently running.
    phase: ErrorPhase,
}

impl Session {
    fn run(&mut self) -> Result<(), Fatal> {
        self.phase = ErrorPhase::Lex;
        let tokens = a68_lexer::lex(
            &mut self.module.lines,
            &mut self.module.options,
            &self.module.interner,
            &mut self.diagnostics,
        )?;
        if self.stop_after(ErrorPhase::Lex) {
            return Ok(());
        }

        self.phase = ErrorPhase::Parse;
        a68_parse::parse(&mut self.module, &tokens, &mut self.diagnostics)?;
        if self.stop_after(ErrorPhase::Parse) {
            return Ok(());
        }

        self.phase = ErrorPhase::Bind;
        collect_tags(&mut self.module, &mut self.diagnostics)?;
        bind_tags(&mut self.module, &mut self.diagnostics)?;
        collect_modes(&mut self.module, &mut self.modes, &mut self.diagnostics)?;
        self.note_errors(ErrorPhase::Bind);

        self.phase = ErrorPhase::Mode;
        let expectations = mode_check(&mut self.module, &mut self.modes, &mut self.diagnostics)?;
        insert_coercions(&mut self.module, &mut self.modes, &expectations)?;
        if self.stop_after(ErrorPhase::Mode) {
            return Ok(());
        }

        self.phase = ErrorPhase::Scope;
        scope_check(&mut self.module, &self.modes, &mut self.diagnostics)?;
        if self.stop_after(ErrorPhase::Scope) {
            return Ok(());
        }

        check_unused(&mut self.module, &mut self.diagnostics)?;
        set_levels(&mut self.module);
        Ok(())
    }

    /// Record `phase` as the error phase if it is the first to report
    /// errors.
    fn note_errors(&mut self, phase: ErrorPhase) {
        if self.error_phase.is_none() && self.diagnostics.has_errors() {
            tracing::debug!(?phase, errors = self.diagnostics.error_count(), "phase reported errors");
            self.error_phase = Some(phase);
        }
    }

    /// Whether compilation should stop once `phase` has run.
    fn stop_after(&mut self, phase: ErrorPhase) -> bool {
        self.note_errors(phase);
        self.diagnostics.has_errors()
    }

    fn finish(self) -> CompileOutput {
        let Session {
            module,
            modes,
            diagnostics,
            error_phase,
            ..
        } = self;
        let error_count = diagnostics.error_count();
        CompileOutput {
            success: error_count == 0,
            lines: module.lines.clone(),
            module: Some(module),
            modes: Some(modes),
            warning_count: diagnostics.warning_count(),
            error_count,
            diagnostics,
            error_phase,
            fatal: None,
        }
    }

    fn abandon(self, fatal: Fatal) -> CompileOutput {
        tracing::debug!(%fatal, "compilation abandoned");
        let Session {
            module,
            mut diagnostics,
            error_phase,
            phase,
            ..
        } = self;
        let mut lines = module.lines;
        let position = diagnostics
            .items()
            .last()
            .map_or_else(|| Position::new(LineId::new(0), 0), |d| d.position);
        diagnostics.terminate(&mut lines, &fatal, position);
        CompileOutput {
            success: false,
            module: None,
            modes: None,
            lines,
            error_count: diagnostics.error_count(),
            warning_count: diagnostics.warning_count(),
            diagnostics,
            error_phase: error_phase.or(Some(phase)),
            fatal: Some(fatal),
        }
    }
}
