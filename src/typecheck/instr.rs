//! Instruction dispatch, sequences, and the stack, constructor, container
//! and chain-environment rules.

use tracing::trace;

use super::equality::{assert_types_equal_at, check_annotations};
use super::stack::{push, Frame, ANY};
use super::{StackType, TypeChecker};
use crate::annot::{AnnotAction, AnnotChange, AnnotKind, AnnotLimits, Annotation};
use crate::ast::{Instr, Instruction, Op};
use crate::error::{CodeErrorReason, Error, ErrorKind};
use crate::path::{Crumb, Path};
use crate::types::{Type, TypeId, TypeKind};

use StackType::Live;

impl TypeChecker {
    pub(super) fn check_instr(
        &self,
        code: &Instruction,
        stack: &[Type],
        path: &Path<'_>,
    ) -> Result<StackType, Error> {
        self.enter(path)?;
        match code {
            Instruction::Seq(items) => self.check_seq(items, stack, path),
            Instruction::Instr(i) => self.check_op(i, stack, path),
        }
    }

    /// Fold left to right; the first failing instruction ends the sequence.
    pub(super) fn check_seq(
        &self,
        items: &[Instruction],
        stack: &[Type],
        path: &Path<'_>,
    ) -> Result<StackType, Error> {
        let mut cur = stack.to_vec();
        for (i, ins) in items.iter().enumerate() {
            let p = path.push(i, Crumb::Instr(ins));
            match self.check_instr(ins, &cur, &p)? {
                Live(s) => cur = s,
                failed => return Ok(failed),
            }
        }
        Ok(Live(cur))
    }

    /// Check a nested body as child `index` of the current instruction.
    pub(super) fn check_body(
        &self,
        body: &[Instruction],
        index: usize,
        stack: &[Type],
        path: &Path<'_>,
    ) -> Result<StackType, Error> {
        let p = path.push(index, Crumb::Body(body));
        self.enter(&p)?;
        self.check_seq(body, stack, &p)
    }

    fn check_op(&self, instr: &Instr, stack: &[Type], path: &Path<'_>) -> Result<StackType, Error> {
        trace!(prim = instr.op.prim(), depth = stack.len(), "check");
        let f = Frame::new(instr, stack, path);

        let out = match &instr.op {
            // Stack manipulation
            Op::Drop(n) => {
                f.annots(AnnotLimits::NONE)?;
                f.rest(n.unwrap_or(1))?.to_vec()
            }
            Op::Dup => {
                let s = f.top(0, &[ANY])?;
                push([f.av1(&s[0])?], stack)
            }
            Op::Swap => {
                let s = f.top(0, &[ANY, ANY])?;
                f.annots(AnnotLimits::NONE)?;
                push([s[1].clone(), s[0].clone()], f.rest(2)?)
            }
            Op::Dig(n) => {
                f.annots(AnnotLimits::NONE)?;
                let t = f.top(*n, &[ANY])?[0].clone();
                let rest = f.rest(n.saturating_add(1))?;
                push(std::iter::once(t).chain(stack[..*n].iter().cloned()), rest)
            }
            Op::Dug(n) => {
                f.annots(AnnotLimits::NONE)?;
                let t = f.top(0, &[ANY])?[0].clone();
                let rest = f.rest(n.saturating_add(1))?;
                push(stack[1..=*n].iter().cloned().chain(std::iter::once(t)), rest)
            }
            Op::Push(t, d) => {
                let p = path.push(0, Crumb::Type(t));
                check_annotations(t, false, &p)?;
                self.check_data(t, d, &p)?;
                push([f.av1(t)?], stack)
            }
            Op::Rename => {
                let s = f.top(0, &[ANY])?;
                push([f.av1(&s[0])?], f.rest(1)?)
            }

            // Constructors and destructors
            Op::Unit => push([f.tv(Type::unit())?], stack),
            Op::Some => {
                let s = f.top(0, &[ANY])?;
                push([f.tv(Type::option(s[0].clone()))?], f.rest(1)?)
            }
            Op::None(t) => {
                check_annotations(t, false, &path.push(0, Crumb::Type(t)))?;
                push([f.tv(Type::option(t.clone()))?], stack)
            }
            Op::Left(t) | Op::Right(t) => {
                check_annotations(t, false, &path.push(0, Crumb::Type(t)))?;
                let s = f.top(0, &[ANY])?;
                let or = if matches!(instr.op, Op::Left(_)) {
                    Type::or(s[0].clone(), t.clone())
                } else {
                    Type::or(t.clone(), s[0].clone())
                };
                push([f.tv(or)?], f.rest(1)?)
            }
            Op::Nil(t) => {
                check_annotations(t, false, &path.push(0, Crumb::Type(t)))?;
                push([f.tv(Type::list(t.clone()))?], stack)
            }
            Op::Pair => return self.check_pair(&f),
            Op::Car | Op::Cdr => {
                let s = f.top(0, &[&[TypeId::Pair]])?;
                let a = f.annots(AnnotLimits::new(1, 0, 1))?;
                let TypeKind::Pair(l, r) = &s[0].kind else {
                    return Err(Error::internal("pair expected", path));
                };
                let component = if matches!(instr.op, Op::Car) { l } else { r };
                if let (Some(given), Some(found)) =
                    (a.first(AnnotKind::Field), component.annots.first(AnnotKind::Field))
                {
                    if !given.name().is_empty() && given != found {
                        return Err(f.error(CodeErrorReason::FieldMismatch {
                            given: given.to_string(),
                            found: found.to_string(),
                        }));
                    }
                }
                let out = component.annotate(&AnnotChange {
                    var: AnnotAction::set(a.only(AnnotKind::Var)),
                    ty: AnnotAction::Keep,
                    field: AnnotAction::Clear,
                });
                push([out], f.rest(1)?)
            }
            Op::Cons => {
                let s = f.top(0, &[ANY, &[TypeId::List]])?;
                assert_types_equal_at(&s[0], s[1].args()[0], path)?;
                push([f.av1(&s[1])?], f.rest(2)?)
            }
            Op::EmptySet(k) => {
                check_annotations(k, false, &path.push(0, Crumb::Type(k)))?;
                f.comparable(k)?;
                push([f.tv(Type::set(k.clone()))?], stack)
            }
            Op::EmptyMap(k, v) | Op::EmptyBigMap(k, v) => {
                check_annotations(k, false, &path.push(0, Crumb::Type(k)))?;
                check_annotations(v, false, &path.push(1, Crumb::Type(v)))?;
                f.comparable(k)?;
                let t = if matches!(instr.op, Op::EmptyMap(..)) {
                    Type::map(k.clone(), v.clone())
                } else {
                    Type::big_map(k.clone(), v.clone())
                };
                push([f.tv(t)?], stack)
            }

            // Containers
            Op::Size => {
                f.top(
                    0,
                    &[&[
                        TypeId::String,
                        TypeId::List,
                        TypeId::Set,
                        TypeId::Map,
                        TypeId::Bytes,
                    ]],
                )?;
                push([f.av1(&Type::nat())?], f.rest(1)?)
            }
            Op::Mem => {
                let s = f.top(0, &[ANY, &[TypeId::Set, TypeId::Map, TypeId::BigMap]])?;
                f.comparable(&s[0])?;
                assert_types_equal_at(&s[0], s[1].args()[0], path)?;
                push([f.av1(&Type::bool())?], f.rest(2)?)
            }
            Op::Get => {
                let s = f.top(0, &[ANY, &[TypeId::Map, TypeId::BigMap]])?;
                f.comparable(&s[0])?;
                let kv = s[1].args();
                assert_types_equal_at(&s[0], kv[0], path)?;
                push([f.av1(&Type::option(kv[1].clone()))?], f.rest(2)?)
            }
            Op::Update => {
                let s = f.top(0, &[ANY, &[TypeId::Bool, TypeId::Option]])?;
                f.comparable(&s[0])?;
                let container = if s[1].id() == TypeId::Bool {
                    let c = f.top(2, &[&[TypeId::Set]])?;
                    assert_types_equal_at(&s[0], c[0].args()[0], path)?;
                    &c[0]
                } else {
                    let c = f.top(2, &[&[TypeId::Map, TypeId::BigMap]])?;
                    let kv = c[0].args();
                    assert_types_equal_at(&s[0], kv[0], path)?;
                    assert_types_equal_at(s[1].args()[0], kv[1], path)?;
                    &c[0]
                };
                push([f.av1(container)?], f.rest(3)?)
            }
            Op::Concat => {
                let s0 = f.top(0, &[&[TypeId::String, TypeId::List, TypeId::Bytes]])?;
                if let TypeKind::List(elt) = &s0[0].kind {
                    if !matches!(elt.id(), TypeId::String | TypeId::Bytes) {
                        return Err(f.error(CodeErrorReason::ConcatListElement(elt.id())));
                    }
                    push([f.av1(elt)?], f.rest(1)?)
                } else {
                    let s1 = f.top(1, &[&[TypeId::String, TypeId::Bytes]])?;
                    if s0[0].id() != s1[0].id() {
                        return Err(f.error(CodeErrorReason::OperandsDiffer(s0[0].id(), s1[0].id())));
                    }
                    push([f.av1(&s1[0])?], f.rest(2)?)
                }
            }
            Op::Slice => {
                let s = f.top(
                    0,
                    &[&[TypeId::Nat], &[TypeId::Nat], &[TypeId::String, TypeId::Bytes]],
                )?;
                push([f.av1(&Type::option(s[2].clone()))?], f.rest(3)?)
            }

            // Nested bodies and functions
            Op::If(..)
            | Op::IfLeft(..)
            | Op::IfNone(..)
            | Op::IfCons(..)
            | Op::Loop(_)
            | Op::LoopLeft(_)
            | Op::Map(_)
            | Op::Iter(_)
            | Op::Dip(..)
            | Op::Lambda(..)
            | Op::Exec
            | Op::Apply
            | Op::Failwith => return self.check_control(&f),

            // Serialization
            Op::Pack => {
                let s = f.top(0, &[ANY])?;
                if !s[0].is_packable() {
                    return Err(f.error(CodeErrorReason::NotPackable(s[0].clone())));
                }
                push([f.av1(&Type::bytes())?], f.rest(1)?)
            }
            Op::Unpack(t) => {
                f.top(0, &[&[TypeId::Bytes]])?;
                if !t.is_packable() {
                    return Err(f.error(CodeErrorReason::NotPackable(t.clone())));
                }
                check_annotations(t, false, &path.push(0, Crumb::Type(t)))?;
                push([f.av1(&Type::option(t.clone()))?], f.rest(1)?)
            }

            Op::Add
            | Op::Sub
            | Op::Mul
            | Op::Ediv
            | Op::Abs
            | Op::IsNat
            | Op::Int
            | Op::Neg
            | Op::Lsl
            | Op::Lsr
            | Op::Or
            | Op::Xor
            | Op::And
            | Op::Not
            | Op::Compare
            | Op::Eq
            | Op::Neq
            | Op::Lt
            | Op::Gt
            | Op::Le
            | Op::Ge => return self.check_arith(&f),

            // Chain environment
            Op::Self_ | Op::Cast(_) | Op::CreateContract(_) => {
                return Err(Error::new(ErrorKind::Unsupported(instr.op.prim()), path));
            }
            Op::Contract(t) => {
                f.top(0, &[&[TypeId::Address]])?;
                check_annotations(t, false, &path.push(0, Crumb::Type(t)))?;
                push([f.av1(&Type::option(Type::contract(t.clone())))?], f.rest(1)?)
            }
            Op::TransferTokens => {
                let s = f.top(0, &[ANY, &[TypeId::Mutez], &[TypeId::Contract]])?;
                assert_types_equal_at(&s[0], s[2].args()[0], path)?;
                push([f.av1(&Type::operation())?], f.rest(3)?)
            }
            Op::SetDelegate => {
                let s = f.top(0, &[&[TypeId::Option]])?;
                let inner = s[0].args()[0].id();
                if inner != TypeId::KeyHash {
                    return Err(f.error(CodeErrorReason::KeyHashExpected(inner)));
                }
                push([f.av1(&Type::operation())?], f.rest(1)?)
            }
            Op::CreateAccount => {
                let a = f.annots(AnnotLimits::new(0, 0, 2))?;
                let s = f.top(
                    0,
                    &[
                        &[TypeId::KeyHash],
                        &[TypeId::Option],
                        &[TypeId::Bool],
                        &[TypeId::Mutez],
                    ],
                )?;
                let delegate = s[1].args()[0].id();
                if delegate != TypeId::KeyHash {
                    return Err(f.error(CodeErrorReason::KeyHashExpected(delegate)));
                }
                let vars = a.only(AnnotKind::Var);
                let named = |t: Type, v: Option<&Annotation>| {
                    t.with_annots(v.cloned().into_iter().collect::<Vec<_>>().into())
                };
                push(
                    [
                        named(Type::operation(), vars.first()),
                        named(Type::address(), vars.get(1)),
                    ],
                    f.rest(4)?,
                )
            }
            Op::ImplicitAccount => {
                f.top(0, &[&[TypeId::KeyHash]])?;
                push([f.av1(&Type::contract(Type::unit()))?], f.rest(1)?)
            }
            Op::Now => push([f.av1(&Type::timestamp())?], stack),
            Op::Amount | Op::Balance => push([f.av1(&Type::mutez())?], stack),
            Op::StepsToQuota => push([f.av1(&Type::nat())?], stack),
            Op::Source | Op::Sender => push([f.av1(&Type::address())?], stack),
            Op::ChainId => push([f.av1(&Type::chain_id())?], stack),
            Op::CheckSignature => {
                f.top(0, &[&[TypeId::Key], &[TypeId::Signature], &[TypeId::Bytes]])?;
                push([f.av1(&Type::bool())?], f.rest(3)?)
            }
            Op::Blake2b | Op::Sha256 | Op::Sha512 => {
                f.top(0, &[&[TypeId::Bytes]])?;
                push([f.av1(&Type::bytes())?], f.rest(1)?)
            }
            Op::HashKey => {
                f.top(0, &[&[TypeId::Key]])?;
                push([f.av1(&Type::key_hash())?], f.rest(1)?)
            }
            Op::Address => {
                f.top(0, &[&[TypeId::Contract]])?;
                push([f.av1(&Type::address())?], f.rest(1)?)
            }
        };
        Ok(Live(out))
    }

    /// PAIR names its components from the instruction's field annotations;
    /// `%@` reuses the source slot's variable name.
    fn check_pair(&self, f: &Frame<'_, '_>) -> Result<StackType, Error> {
        let s = f.top(0, &[ANY, ANY])?;
        let a = f.annots(AnnotLimits::new(2, 1, 1))?;
        let fields = a.only(AnnotKind::Field);
        let field = |n: usize| -> AnnotAction {
            match fields.get(n).map(Annotation::as_str) {
                None | Some("%") => AnnotAction::Clear,
                Some("%@") => match s[n].annots.first(AnnotKind::Var) {
                    Some(v) => AnnotAction::Replace(vec![Annotation::new(AnnotKind::Field, v.name())]),
                    None => AnnotAction::Clear,
                },
                Some(_) => AnnotAction::Replace(vec![fields[n].clone()]),
            }
        };
        let component = |n: usize| {
            s[n].annotate(&AnnotChange {
                var: AnnotAction::Clear,
                ty: AnnotAction::Keep,
                field: field(n),
            })
        };
        let pair = Type::pair(component(0), component(1)).annotate(&AnnotChange {
            var: AnnotAction::set(a.only(AnnotKind::Var)),
            ty: AnnotAction::set(a.only(AnnotKind::Type)),
            field: AnnotAction::Clear,
        });
        Ok(Live(push([pair], f.rest(2)?)))
    }
}
