//! `a68c`: check an Algol 68 source file and report its diagnostics.

use std::io::IsTerminal;

use a68_compiler::{compile, render_diagnostics, ColorMode, CompileConfig, StandardEnvironment};

fn main() {
    a68_compiler::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = CompileConfig::default();
    let mut path = None;
    for arg in &args {
        if let Some(item) = arg.strip_prefix("--") {
            if !config.options.apply_pragmat_item(item) {
                eprintln!("unknown option '{arg}'");
                print_usage();
                std::process::exit(1);
            }
        } else if path.replace(arg.clone()).is_some() {
            print_usage();
            std::process::exit(1);
        }
    }
    let Some(path) = path else {
        print_usage();
        std::process::exit(1);
    };

    let source = read_file(&path);
    config.file_path.clone_from(&path);
    let env = StandardEnvironment::new();
    let output = compile(&source, &env, &config);

    let color = if std::io::stdout().is_terminal() {
        ColorMode::Always
    } else {
        ColorMode::Never
    };
    print!("{}", render_diagnostics(&output, color));
    if !output.success {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: a68c [options] <file.a68>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --quote-stropping   Bold words are written 'begin' 'int'");
    eprintln!("  --no-warnings       Suppress warnings");
    eprintln!("  --unused            Warn about declarations that are never applied");
    eprintln!("  --brackets          Accept {{ and }} as parentheses");
    eprintln!("  --reductions        Log every parser reduction");
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
