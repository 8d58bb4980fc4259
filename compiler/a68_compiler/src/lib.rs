//! Algol 68 front-end driver.
//!
//! Runs every pass over one source text and collects the results:
//!
//! ```text
//! a68_lexer → a68_parse → a68_bind → a68_check
//!                      ↓
//!               a68_compiler  ← this crate
//!                      ↓
//!                    a68c
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use a68_compiler::{compile, CompileConfig, StandardEnvironment};
//!
//! let env = StandardEnvironment::new();
//! let output = compile("INT x := 1; x := x + 1", &env, &CompileConfig::default());
//! assert!(output.success);
//! ```
//!
//! # Tracing
//!
//! Set `A68_LOG` to an `EnvFilter` directive, e.g. `A68_LOG=a68_check=debug`
//! or `A68_LOG=trace`, and call [`init_tracing`] once at startup.

mod output;
mod pipeline;

pub use a68_bind::StandardEnvironment;
pub use a68_diagnostic::emitter::ColorMode;
pub use output::{CompileOutput, ErrorPhase};
pub use pipeline::{compile, CompileConfig};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Render the diagnostics of a compilation: each source line that has
/// diagnostics, its marker line, the numbered messages, then a summary.
pub fn render_diagnostics(output: &CompileOutput, color: ColorMode) -> String {
    a68_diagnostic::emitter::render(&output.lines, &output.diagnostics, color)
}

/// Install a hierarchical tracing subscriber filtered by `A68_LOG`.
///
/// Does nothing when `A68_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("A68_LOG") else {
            return;
        };
        let filter = EnvFilter::new(directives);
        let layer = tracing_tree::HierarchicalLayer::new(2)
            .with_writer(std::io::stderr)
            .with_targets(true)
            .with_indent_lines(true);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
