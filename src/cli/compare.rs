use std::cmp::Ordering;
use std::path::PathBuf;
use std::process;

use clap::Args;

use michelson_check::diagnostic::Diagnostic;

use super::{emit, load_node, load_type};

#[derive(Args)]
pub struct CompareArgs {
    /// Micheline JSON comparable type
    pub type_file: PathBuf,
    /// First value
    pub a: PathBuf,
    /// Second value
    pub b: PathBuf,
}

/// Prints -1, 0 or 1. Both values are validated first.
pub fn cmd_compare(args: CompareArgs) {
    let tc = michelson_check::TypeChecker::new();
    let (type_input, ty) = load_type(&args.type_file);
    if !ty.is_comparable() {
        emit(
            &Diagnostic::error(format!("comparable type expected: {}", ty)),
            &type_input,
        );
        process::exit(1);
    }
    let (ia, a) = load_node(&args.a);
    let (ib, b) = load_node(&args.b);
    for (input, value) in [(&ia, &a), (&ib, &b)] {
        if let Err(e) = tc.validate_data(&ty, value) {
            emit(&Diagnostic::from(&e), input);
            process::exit(1);
        }
    }

    match tc.compare(&ty, &a, &b) {
        Ok(ord) => println!(
            "{}",
            match ord {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            }
        ),
        Err(e) => {
            emit(&Diagnostic::from(&e), &ia);
            process::exit(1);
        }
    }
}
