mod arith;
mod compare;
mod control;
mod data;
mod equality;
mod instr;
mod stack;
#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use equality::{assert_annotations_valid, assert_stacks_equal, assert_types_equal, types_equal};
pub(crate) use equality::{assert_stacks_equal_at, check_annotations};

use crate::ast::{Instruction, Script};
use crate::config::CheckerConfig;
use crate::error::{Error, ErrorKind};
use crate::ident::{Base58Check, IdDecoder};
use crate::path::{Crumb, Path};
use crate::syntax::micheline::Node;
use crate::types::{display_stack, Type};

/// Result of abstract interpretation: the output stack, or the type of the
/// value a code path always fails with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackType {
    Live(Vec<Type>),
    Failed(Type),
}

impl StackType {
    pub fn is_failed(&self) -> bool {
        matches!(self, StackType::Failed(_))
    }

    pub fn live(&self) -> Option<&[Type]> {
        match self {
            StackType::Live(s) => Some(s),
            StackType::Failed(_) => None,
        }
    }
}

impl fmt::Display for StackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackType::Live(s) => f.write_str(&display_stack(s)),
            StackType::Failed(t) => write!(f, "failed with {}", t),
        }
    }
}

/// Stateless checker; one value can serve any number of concurrent calls.
#[derive(Clone)]
pub struct TypeChecker {
    pub(super) config: CheckerConfig,
    pub(super) ids: Arc<dyn IdDecoder>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self {
            config,
            ids: Arc::new(Base58Check),
        }
    }

    /// Replace the identifier decoder.
    pub fn with_decoder(mut self, ids: Arc<dyn IdDecoder>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Guard against pathological nesting.
    pub(super) fn enter(&self, path: &Path<'_>) -> Result<(), Error> {
        if path.depth() > self.config.max_depth {
            return Err(Error::new(ErrorKind::DepthLimit(self.config.max_depth), path));
        }
        Ok(())
    }

    /// Type-check `code` against an initial stack (top first).
    pub fn check_instruction(&self, code: &Instruction, stack: &[Type]) -> Result<StackType, Error> {
        let root = Path::root();
        for (i, t) in stack.iter().enumerate() {
            check_annotations(t, false, &root.push(i, Crumb::Type(t)))?;
        }
        let result = self.check_instr(code, stack, &root)?;
        debug!(result = %result, "checked instruction");
        Ok(result)
    }

    /// Check contract code: the input stack is `[pair parameter storage]`
    /// and a normal exit must leave `[pair (list operation) storage]`.
    /// A failing program is returned as is for the caller to judge.
    pub fn check_program(
        &self,
        parameter: &Type,
        storage: &Type,
        code: &Instruction,
    ) -> Result<StackType, Error> {
        debug!(parameter = %parameter, storage = %storage, "check program");
        let input = [Type::pair(parameter.clone(), storage.clone())];
        let result = self.check_instruction(code, &input)?;
        if let StackType::Live(s) = &result {
            let expected = [Type::pair(Type::list(Type::operation()), storage.clone())];
            assert_stacks_equal_at(&expected, s, &Path::root())?;
        }
        Ok(result)
    }

    pub fn check_script(&self, script: &Script) -> Result<StackType, Error> {
        self.check_program(&script.parameter, &script.storage, &script.code)
    }

    /// Validate a literal, e.g. an initial storage value.
    pub fn validate_data(&self, ty: &Type, data: &Node) -> Result<(), Error> {
        let root = Path::root();
        check_annotations(ty, false, &root)?;
        self.check_data(ty, data, &root)
    }

    /// Canonical order of two values of a comparable type. The values are
    /// expected to be valid; anything else is an internal error.
    pub fn compare(&self, ty: &Type, a: &Node, b: &Node) -> Result<Ordering, Error> {
        let root = Path::root();
        if !ty.is_comparable() {
            return Err(Error::internal(format!("non comparable type: {}", ty), &root));
        }
        self.compare_data(ty, a, b, &root)
    }
}
