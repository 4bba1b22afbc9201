mod cli;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::check::{cmd_check, CheckArgs};
use cli::compare::{cmd_compare, CompareArgs};
use cli::validate::{cmd_validate, ValidateArgs};

#[derive(Parser)]
#[command(
    name = "michelson-check",
    version,
    about = "Static type checker for Michelson contracts"
)]
struct Cli {
    /// Log checker internals (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type-check Micheline JSON scripts
    Check(CheckArgs),
    /// Validate a literal against a type
    Validate(ValidateArgs),
    /// Compare two values of a comparable type
    Compare(CompareArgs),
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check(args) => cmd_check(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Compare(args) => cmd_compare(args),
    }
}
