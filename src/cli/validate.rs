use std::path::PathBuf;
use std::process;

use clap::Args;

use michelson_check::diagnostic::Diagnostic;

use super::{checker, emit, load_config, load_node, load_type};

#[derive(Args)]
pub struct ValidateArgs {
    /// Micheline JSON type
    pub type_file: PathBuf,
    /// Micheline JSON literal
    pub data_file: PathBuf,
    /// Checker config file (JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn cmd_validate(args: ValidateArgs) {
    let tc = checker(load_config(args.config.as_ref(), None));
    let (_, ty) = load_type(&args.type_file);
    let (input, data) = load_node(&args.data_file);

    match tc.validate_data(&ty, &data) {
        Ok(()) => eprintln!("OK: {} is a valid {}", input.name, ty),
        Err(e) => {
            emit(&Diagnostic::from(&e), &input);
            process::exit(1);
        }
    }
}
