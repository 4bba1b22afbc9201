mod arith;
mod data;

use serde_json::Value;

use crate::ast::Instruction;
use crate::error::{CodeErrorReason, DataErrorReason, Error};
use crate::ident::{encode, IdKind};
use crate::syntax::lower::{lower_instruction, lower_type};
use crate::syntax::micheline::Node;
use crate::typecheck::{StackType, TypeChecker};
use crate::types::Type;

pub(super) fn node(v: Value) -> Node {
    serde_json::from_value(v).unwrap()
}

pub(super) fn ty(v: Value) -> Type {
    lower_type(&node(v)).unwrap()
}

pub(super) fn code(v: Value) -> Instruction {
    lower_instruction(&node(v)).unwrap()
}

pub(super) fn check(c: Value, stack: &[Type]) -> Result<StackType, Error> {
    TypeChecker::new().check_instruction(&code(c), stack)
}

/// Output stack of code that must check and not fail.
pub(super) fn live(c: Value, stack: &[Type]) -> Vec<Type> {
    match check(c, stack) {
        Ok(StackType::Live(s)) => s,
        other => panic!("expected a live stack, got {:?}", other),
    }
}

pub(super) fn code_err(c: Value, stack: &[Type]) -> CodeErrorReason {
    let err = check(c, stack).unwrap_err();
    match err.code_reason() {
        Some(r) => r.clone(),
        None => panic!("expected a code error, got {}", err),
    }
}

pub(super) fn validate(t: Value, d: Value) -> Result<(), Error> {
    TypeChecker::new().validate_data(&ty(t), &node(d))
}

pub(super) fn data_err(t: Value, d: Value) -> DataErrorReason {
    let err = validate(t, d).unwrap_err();
    match err.data_reason() {
        Some(r) => r.clone(),
        None => panic!("expected a data error, got {}", err),
    }
}

/// A syntactically valid identifier of the given kind.
pub(super) fn id(kind: IdKind, fill: u8) -> String {
    encode(kind, &vec![fill; kind.payload_len()])
}
