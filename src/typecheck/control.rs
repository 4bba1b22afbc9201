//! Branches, loops, iteration, DIP and functions.

use super::equality::{assert_stacks_equal_at, assert_types_equal_at, check_annotations, types_equal};
use super::stack::{push, Frame, ANY};
use super::{StackType, TypeChecker};
use crate::annot::{AnnotAction, AnnotChange, AnnotLimits};
use crate::ast::{Body, Op};
use crate::error::{CodeErrorReason, Error};
use crate::path::Crumb;
use crate::types::{Type, TypeId, TypeKind};

use StackType::{Failed, Live};

/// Value pushed for a body: field names do not survive onto the stack.
fn payload(t: &Type) -> Type {
    t.annotate(&AnnotChange {
        field: AnnotAction::Clear,
        ..AnnotChange::keep_all()
    })
}

/// Element type seen by MAP and ITER bodies.
fn element(t: &Type) -> Type {
    match &t.kind {
        TypeKind::Map(k, v) | TypeKind::BigMap(k, v) => Type::pair((**k).clone(), (**v).clone()),
        TypeKind::List(e) | TypeKind::Set(e) => payload(e),
        _ => t.clone(),
    }
}

impl TypeChecker {
    pub(super) fn check_control(&self, f: &Frame<'_, '_>) -> Result<StackType, Error> {
        match &f.instr.op {
            Op::If(a, b) | Op::IfLeft(a, b) | Op::IfNone(a, b) | Op::IfCons(a, b) => {
                f.annots(AnnotLimits::NONE)?;
                let scrutinee = match &f.instr.op {
                    Op::If(..) => TypeId::Bool,
                    Op::IfLeft(..) => TypeId::Or,
                    Op::IfNone(..) => TypeId::Option,
                    _ => TypeId::List,
                };
                f.top(0, &[&[scrutinee]])?;
                self.check_branches(f, a, b, f.rest(1)?)
            }

            Op::Loop(body) => {
                f.annots(AnnotLimits::NONE)?;
                f.top(0, &[&[TypeId::Bool]])?;
                let tail = f.rest(1)?;
                let out = match self.check_body(body, 0, tail, f.path)? {
                    Live(s) => s,
                    failed => return Ok(failed),
                };
                assert_stacks_equal_at(&push([Type::bool()], tail), &out, f.path)?;
                Ok(Live(tail.to_vec()))
            }

            Op::LoopLeft(body) => {
                f.annots(AnnotLimits::NONE)?;
                let s = f.top(0, &[&[TypeId::Or]])?;
                let tail = f.rest(1)?;
                let TypeKind::Or(l, r) = &s[0].kind else {
                    return Err(Error::internal("or expected", f.path));
                };
                let out = match self.check_body(body, 0, &push([payload(l)], tail), f.path)? {
                    Live(s) => s,
                    failed => return Ok(failed),
                };
                assert_stacks_equal_at(&push([s[0].clone()], tail), &out, f.path)?;
                let right = r.annotate(&AnnotChange {
                    var: AnnotAction::Keep,
                    ty: AnnotAction::Clear,
                    field: AnnotAction::Clear,
                });
                Ok(Live(push([right], tail)))
            }

            Op::Map(body) => {
                let s = f.top(0, &[&[TypeId::List, TypeId::Map]])?;
                let tail = f.rest(1)?;
                let out = match self.check_body(body, 0, &push([element(&s[0])], tail), f.path)? {
                    Live(s) => s,
                    failed => return Ok(failed),
                };
                let Some((top, below)) = out.split_first() else {
                    return Err(f.error(CodeErrorReason::EmptyBodyResult));
                };
                assert_stacks_equal_at(tail, below, f.path)?;
                let mapped = match &s[0].kind {
                    TypeKind::Map(k, _) => Type::map((**k).clone(), payload(top)),
                    _ => Type::list(payload(top)),
                };
                Ok(Live(push([f.av1(&mapped)?], tail)))
            }

            Op::Iter(body) => {
                f.annots(AnnotLimits::NONE)?;
                let s = f.top(0, &[&[TypeId::Set, TypeId::List, TypeId::Map]])?;
                let tail = f.rest(1)?;
                let out = match self.check_body(body, 0, &push([element(&s[0])], tail), f.path)? {
                    Live(s) => s,
                    failed => return Ok(failed),
                };
                assert_stacks_equal_at(tail, &out, f.path)?;
                Ok(Live(tail.to_vec()))
            }

            Op::Dip(n, body) => {
                f.annots(AnnotLimits::NONE)?;
                let depth = n.unwrap_or(1);
                let tail = f.rest(depth)?;
                let index = if n.is_some() { 1 } else { 0 };
                match self.check_body(body, index, tail, f.path)? {
                    Live(out) => Ok(Live(push(f.stack[..depth].iter().cloned(), &out))),
                    failed => Ok(failed),
                }
            }

            Op::Lambda(arg, ret, body) => {
                check_annotations(arg, false, &f.path.push(0, Crumb::Type(arg)))?;
                check_annotations(ret, false, &f.path.push(1, Crumb::Type(ret)))?;
                let out = match self.check_body(body, 2, std::slice::from_ref(arg), f.path)? {
                    Live(s) => s,
                    failed => return Ok(failed),
                };
                assert_stacks_equal_at(
                    std::slice::from_ref(ret),
                    &out,
                    &f.path.push(1, Crumb::Type(ret)),
                )?;
                let lambda = Type::lambda(arg.clone(), ret.clone());
                Ok(Live(push([f.av1(&lambda)?], f.stack)))
            }

            Op::Exec => {
                let s = f.top(0, &[ANY, &[TypeId::Lambda]])?;
                let sig = s[1].args();
                assert_types_equal_at(&s[0], sig[0], f.path)?;
                Ok(Live(push([f.av1(sig[1])?], f.rest(2)?)))
            }

            Op::Apply => {
                let s = f.top(0, &[ANY, &[TypeId::Lambda]])?;
                let sig = s[1].args();
                let TypeKind::Pair(captured, remaining) = &sig[0].kind else {
                    return Err(f.error(CodeErrorReason::ApplyArgumentNotPair(sig[0].id())));
                };
                assert_types_equal_at(&s[0], &payload(captured), f.path)?;
                let applied = Type::lambda(payload(remaining), sig[1].clone());
                Ok(Live(push([f.av1(&applied)?], f.rest(2)?)))
            }

            Op::Failwith => {
                let s = f.top(0, &[ANY])?;
                Ok(Failed(s[0].clone()))
            }

            _ => Err(Error::internal("not a control instruction", f.path)),
        }
    }

    /// Both branches run on the stack below the scrutinee. A failing
    /// branch defers to the other one.
    fn check_branches(
        &self,
        f: &Frame<'_, '_>,
        a: &Body,
        b: &Body,
        rest: &[Type],
    ) -> Result<StackType, Error> {
        let ra = self.check_body(a, 0, rest, f.path)?;
        let rb = self.check_body(b, 1, rest, f.path)?;
        match (ra, rb) {
            (Failed(x), Failed(y)) => {
                if types_equal(&x, &y) {
                    Ok(Failed(x))
                } else {
                    Ok(Failed(Type::or(x, y)))
                }
            }
            (Failed(_), live) | (live, Failed(_)) => Ok(live),
            (Live(x), Live(y)) => {
                assert_stacks_equal_at(&x, &y, f.path)?;
                Ok(Live(x))
            }
        }
    }
}
