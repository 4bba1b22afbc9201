pub mod annot;
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod ident;
pub mod path;
pub mod syntax;
pub mod typecheck;
pub mod types;

// Public surface at `michelson_check::X`
pub use ast::{Instruction, Script};
pub use config::CheckerConfig;
pub use error::{Category, Error, ErrorKind};
pub use syntax::lower::{lower_instruction, lower_script, lower_type, SyntaxError};
pub use syntax::micheline::Node;
pub use syntax::parse_json;
pub use typecheck::{
    assert_annotations_valid, assert_stacks_equal, assert_types_equal, types_equal, StackType,
    TypeChecker,
};
pub use types::{Type, TypeId};

use rayon::prelude::*;
use tracing::debug;

/// Parse and lower a Micheline JSON script.
pub fn parse_script(text: &str) -> Result<Script, SyntaxError> {
    lower_script(&parse_json(text)?)
}

/// Parse and lower a Micheline JSON type.
pub fn parse_type(text: &str) -> Result<Type, SyntaxError> {
    lower_type(&parse_json(text)?)
}

/// Check independent scripts in parallel. Results keep the input order.
pub fn check_scripts(checker: &TypeChecker, scripts: &[Script]) -> Vec<Result<StackType, Error>> {
    debug!(count = scripts.len(), "check scripts");
    scripts
        .par_iter()
        .map(|script| checker.check_script(script))
        .collect()
}

/// Type-check a program with the default checker.
pub fn check_program(parameter: &Type, storage: &Type, code: &Instruction) -> Result<StackType, Error> {
    TypeChecker::new().check_program(parameter, storage, code)
}

/// Validate a literal with the default checker.
pub fn validate_data(ty: &Type, data: &Node) -> Result<(), Error> {
    TypeChecker::new().validate_data(ty, data)
}
