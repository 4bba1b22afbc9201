pub mod check;
pub mod compare;
pub mod validate;

use std::path::{Path, PathBuf};
use std::process;

use michelson_check::diagnostic::Diagnostic;
use michelson_check::{parse_json, CheckerConfig, Node, SyntaxError, Type, TypeChecker};

/// One input file with its text, kept for diagnostics.
pub struct Loaded {
    pub name: String,
    pub source: String,
}

pub fn read_input(path: &Path) -> Loaded {
    match std::fs::read_to_string(path) {
        Ok(source) => Loaded {
            name: path.display().to_string(),
            source,
        },
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Render a diagnostic to stderr; a broken stderr is reported once and
/// otherwise ignored.
pub fn emit(diag: &Diagnostic, input: &Loaded) {
    if let Err(e) = diag.render(&input.name, &input.source) {
        eprintln!("error: cannot render diagnostic: {}", e);
    }
}

fn exit_on_syntax<T>(res: Result<T, SyntaxError>, input: &Loaded) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            emit(&Diagnostic::from(&e), input);
            process::exit(1);
        }
    }
}

pub fn load_node(path: &Path) -> (Loaded, Node) {
    let input = read_input(path);
    let node = exit_on_syntax(parse_json(&input.source), &input);
    (input, node)
}

pub fn load_type(path: &Path) -> (Loaded, Type) {
    let (input, node) = load_node(path);
    let ty = exit_on_syntax(michelson_check::lower_type(&node), &input);
    (input, ty)
}

/// Config file (if any) with command-line overrides applied.
pub fn load_config(path: Option<&PathBuf>, max_depth: Option<usize>) -> CheckerConfig {
    let mut config = match path {
        Some(p) => match CheckerConfig::load(p) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        },
        None => CheckerConfig::default(),
    };
    if let Some(depth) = max_depth {
        if depth == 0 {
            eprintln!("error: --max-depth must be positive");
            process::exit(1);
        }
        config.max_depth = depth;
    }
    config
}

pub fn checker(config: CheckerConfig) -> TypeChecker {
    TypeChecker::with_config(config)
}
