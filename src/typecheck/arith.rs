//! Arithmetic, bitwise and comparison instructions.

use super::equality::assert_types_equal_at;
use super::stack::{push, Frame, ANY};
use super::{StackType, TypeChecker};
use crate::ast::Op;
use crate::error::{CodeErrorReason, Error};
use crate::types::{Type, TypeId};

use TypeId::{Bool, Int, Mutez, Nat, Timestamp};

const ADDITIVE: &[TypeId] = &[Nat, Int, Timestamp, Mutez];
const MULTIPLICATIVE: &[TypeId] = &[Nat, Int, Mutez];

fn is_num(id: TypeId) -> bool {
    matches!(id, Nat | Int)
}

fn add(a: TypeId, b: TypeId) -> Option<Type> {
    match (a, b) {
        (Nat, Nat) => Some(Type::nat()),
        (x, y) if is_num(x) && is_num(y) => Some(Type::int()),
        (Int, Timestamp) | (Timestamp, Int) => Some(Type::timestamp()),
        (Mutez, Mutez) => Some(Type::mutez()),
        _ => None,
    }
}

fn sub(a: TypeId, b: TypeId) -> Option<Type> {
    match (a, b) {
        (x, y) if is_num(x) && is_num(y) => Some(Type::int()),
        (Timestamp, Timestamp) => Some(Type::int()),
        (Timestamp, Int) => Some(Type::timestamp()),
        (Mutez, Mutez) => Some(Type::mutez()),
        _ => None,
    }
}

fn mul(a: TypeId, b: TypeId) -> Option<Type> {
    match (a, b) {
        (Nat, Nat) => Some(Type::nat()),
        (x, y) if is_num(x) && is_num(y) => Some(Type::int()),
        (Nat, Mutez) | (Mutez, Nat) => Some(Type::mutez()),
        _ => None,
    }
}

fn ediv(a: TypeId, b: TypeId) -> Option<Type> {
    let res = |q: Type, r: Type| Some(Type::option(Type::pair(q, r)));
    match (a, b) {
        (x, y) if is_num(x) && is_num(y) => res(Type::int(), Type::nat()),
        (Mutez, Nat) => res(Type::mutez(), Type::mutez()),
        (Mutez, Mutez) => res(Type::nat(), Type::mutez()),
        _ => None,
    }
}

impl TypeChecker {
    pub(super) fn check_arith(&self, f: &Frame<'_, '_>) -> Result<StackType, Error> {
        let out = match &f.instr.op {
            Op::Add | Op::Sub | Op::Mul | Op::Ediv => {
                let allowed = if matches!(f.instr.op, Op::Add | Op::Sub) {
                    ADDITIVE
                } else {
                    MULTIPLICATIVE
                };
                let s = f.top(0, &[allowed, allowed])?;
                let (a, b) = (s[0].id(), s[1].id());
                let rule = match f.instr.op {
                    Op::Add => add,
                    Op::Sub => sub,
                    Op::Mul => mul,
                    _ => ediv,
                };
                let t = rule(a, b)
                    .ok_or_else(|| f.error(CodeErrorReason::IncompatibleOperandTypes(a, b)))?;
                push([f.av1(&t)?], f.rest(2)?)
            }
            Op::Abs => {
                f.top(0, &[&[Int]])?;
                push([f.av1(&Type::nat())?], f.rest(1)?)
            }
            Op::IsNat => {
                f.top(0, &[&[Int]])?;
                push([f.av1(&Type::option(Type::nat()))?], f.rest(1)?)
            }
            Op::Int => {
                f.top(0, &[&[Nat]])?;
                push([f.av1(&Type::int())?], f.rest(1)?)
            }
            Op::Neg => {
                f.top(0, &[&[Nat, Int]])?;
                push([f.av1(&Type::int())?], f.rest(1)?)
            }
            Op::Lsl | Op::Lsr => {
                f.top(0, &[&[Nat], &[Nat]])?;
                push([f.av1(&Type::nat())?], f.rest(2)?)
            }
            Op::Or | Op::Xor => {
                let s = f.top(0, &[&[Nat, Bool], &[Nat, Bool]])?;
                if s[0].id() != s[1].id() {
                    return Err(f.error(CodeErrorReason::OperandsDiffer(s[0].id(), s[1].id())));
                }
                push([f.av1(&s[1])?], f.rest(2)?)
            }
            Op::And => {
                // `int AND nat` masks to a nat.
                let s = f.top(0, &[&[Nat, Bool, Int], &[Nat, Bool]])?;
                let (a, b) = (s[0].id(), s[1].id());
                if (a, b) != (Int, Nat) && a != b {
                    return Err(f.error(CodeErrorReason::OperandsDiffer(a, b)));
                }
                push([f.av1(&s[1])?], f.rest(2)?)
            }
            Op::Not => {
                let s = f.top(0, &[&[Nat, Bool, Int]])?;
                let t = if s[0].id() == Bool {
                    Type::bool()
                } else {
                    Type::int()
                };
                push([f.av1(&t)?], f.rest(1)?)
            }
            Op::Compare => {
                let s = f.top(0, &[ANY, ANY])?;
                f.comparable(&s[0])?;
                f.comparable(&s[1])?;
                assert_types_equal_at(&s[0], &s[1], f.path)?;
                push([f.av1(&Type::int())?], f.rest(2)?)
            }
            Op::Eq | Op::Neq | Op::Lt | Op::Gt | Op::Le | Op::Ge => {
                f.top(0, &[&[Int]])?;
                push([f.av1(&Type::bool())?], f.rest(1)?)
            }
            _ => return Err(Error::internal("not an arithmetic instruction", f.path)),
        };
        Ok(StackType::Live(out))
    }
}
