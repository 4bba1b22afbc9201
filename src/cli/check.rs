use std::path::PathBuf;
use std::process;

use clap::Args;
use serde::Serialize;
use tracing::debug;

use michelson_check::diagnostic::Diagnostic;
use michelson_check::path::PathStep;
use michelson_check::{
    check_scripts, lower_script, parse_json, Category, Error, Node, Script, StackType, SyntaxError,
};

use super::{checker, emit, load_config, read_input, Loaded};

#[derive(Args)]
pub struct CheckArgs {
    /// Micheline JSON script files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Checker config file (JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Override the nesting budget
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
    /// Count code that always fails as an error
    #[arg(long)]
    pub reject_failed: bool,
    /// Print one JSON report per script on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Report {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<Vec<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_with: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    path: Vec<PathStep>,
}

enum Outcome {
    Syntax(SyntaxError),
    Checked(Result<StackType, Error>),
}

fn parse(input: &Loaded) -> Result<Script, SyntaxError> {
    lower_script(&parse_json(&input.source)?)
}

pub fn cmd_check(args: CheckArgs) {
    let CheckArgs {
        files,
        config,
        max_depth,
        reject_failed,
        json,
    } = args;
    let mut config = load_config(config.as_ref(), max_depth);
    config.reject_failed_programs |= reject_failed;
    let reject_failed = config.reject_failed_programs;
    let tc = checker(config);

    let inputs: Vec<Loaded> = files.iter().map(|f| read_input(f)).collect();
    let parsed: Vec<Result<Script, SyntaxError>> = inputs.iter().map(parse).collect();
    let scripts: Vec<Script> = parsed.iter().filter_map(|p| p.as_ref().ok().cloned()).collect();
    debug!(files = inputs.len(), scripts = scripts.len(), "checking");

    let mut checked = check_scripts(&tc, &scripts).into_iter();
    let mut outcomes = Vec::with_capacity(parsed.len());
    for p in parsed {
        match p {
            Ok(_) => outcomes.extend(checked.next().map(Outcome::Checked)),
            Err(e) => outcomes.push(Outcome::Syntax(e)),
        }
    }

    let mut failures = 0;
    for (input, outcome) in inputs.iter().zip(&outcomes) {
        let ok = match outcome {
            Outcome::Checked(Ok(StackType::Failed(_))) => !reject_failed,
            Outcome::Checked(Ok(StackType::Live(_))) => true,
            _ => false,
        };
        if !ok {
            failures += 1;
        }
        if json {
            print_json(input, outcome, ok);
        } else {
            print_human(input, outcome, ok);
        }
    }

    if failures > 0 {
        if !json {
            eprintln!("{} of {} script(s) failed", failures, inputs.len());
        }
        process::exit(1);
    }
}

fn print_human(input: &Loaded, outcome: &Outcome, ok: bool) {
    match outcome {
        Outcome::Syntax(e) => emit(&Diagnostic::from(e), input),
        Outcome::Checked(Err(e)) => emit(&Diagnostic::from(e), input),
        Outcome::Checked(Ok(result)) if ok => eprintln!("OK: {} {}", input.name, result),
        Outcome::Checked(Ok(result)) => emit(
            &Diagnostic::error(format!("code always fails: {}", result))
                .with_help("drop --reject-failed to accept failing programs".to_string()),
            input,
        ),
    }
}

fn print_json(input: &Loaded, outcome: &Outcome, ok: bool) {
    let mut report = Report {
        file: input.name.clone(),
        ok,
        stack: None,
        failed_with: None,
        error: None,
    };
    match outcome {
        Outcome::Syntax(e) => {
            report.error = Some(ErrorReport {
                category: None,
                message: e.to_string(),
                path: Vec::new(),
            })
        }
        Outcome::Checked(Err(e)) => {
            report.error = Some(ErrorReport {
                category: Some(e.category()),
                message: e.to_string(),
                path: e.path.clone(),
            })
        }
        Outcome::Checked(Ok(StackType::Live(s))) => {
            report.stack = Some(s.iter().map(Node::from).collect())
        }
        Outcome::Checked(Ok(StackType::Failed(t))) => report.failed_with = Some(Node::from(t)),
    }
    match serde_json::to_string(&report) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("error: cannot serialize report for {}: {}", input.name, e),
    }
}
