//! Per-instruction helpers: slot matching, annotation limits and the
//! result annotation conventions.

use crate::annot::{AnnotAction, AnnotChange, AnnotKind, AnnotLimits, AnnotationError, Annotations};
use crate::ast::Instr;
use crate::error::{CodeError, CodeErrorReason, Error};
use crate::path::Path;
use crate::types::{Type, TypeId};

/// Unconstrained slot.
pub(super) const ANY: &[TypeId] = &[];

/// One instruction being checked against one input stack.
pub(super) struct Frame<'s, 'p> {
    pub(super) instr: &'s Instr,
    pub(super) stack: &'s [Type],
    pub(super) path: &'s Path<'p>,
}

impl<'s, 'p> Frame<'s, 'p> {
    pub(super) fn new(instr: &'s Instr, stack: &'s [Type], path: &'s Path<'p>) -> Self {
        Self { instr, stack, path }
    }

    pub(super) fn error(&self, reason: CodeErrorReason) -> Error {
        Error::new(
            CodeError {
                instr: self.instr.clone(),
                stack: self.stack.to_vec(),
                reason,
            },
            self.path,
        )
    }

    /// Match `slots.len()` elements starting at depth `n` against the
    /// allowed constructors of each slot.
    pub(super) fn top(&self, n: usize, slots: &[&[TypeId]]) -> Result<&'s [Type], Error> {
        let need = n.saturating_add(slots.len());
        if self.stack.len() < need {
            return Err(self.error(CodeErrorReason::StackUnderflow(need)));
        }
        let window = &self.stack[n..need];
        for (i, (t, allowed)) in window.iter().zip(slots).enumerate() {
            if !allowed.is_empty() && !allowed.contains(&t.id()) {
                return Err(self.error(CodeErrorReason::StackTypeMismatch {
                    slot: n + i,
                    expected: allowed.to_vec(),
                    found: t.id(),
                }));
            }
        }
        Ok(window)
    }

    /// The stack below the top `n` elements.
    pub(super) fn rest(&self, n: usize) -> Result<&'s [Type], Error> {
        if self.stack.len() < n {
            return Err(self.error(CodeErrorReason::StackUnderflow(n)));
        }
        Ok(&self.stack[n..])
    }

    /// The instruction's annotations, checked against per-class limits.
    pub(super) fn annots(&self, limits: AnnotLimits) -> Result<&'s Annotations, Error> {
        let annots = &self.instr.annots;
        for kind in [AnnotKind::Field, AnnotKind::Type, AnnotKind::Var] {
            let max = limits.max(kind);
            if annots.count(kind) > max {
                return Err(Error::new(
                    AnnotationError::InstructionLimit {
                        prim: self.instr.op.prim(),
                        kind,
                        max,
                    },
                    self.path,
                ));
            }
        }
        Ok(annots)
    }

    /// Name the result with at most one variable annotation; field names
    /// never survive onto the stack.
    pub(super) fn av1(&self, t: &Type) -> Result<Type, Error> {
        let a = self.annots(AnnotLimits::VAR)?;
        Ok(t.annotate(&AnnotChange {
            var: AnnotAction::set(a.only(AnnotKind::Var)),
            ty: AnnotAction::Keep,
            field: AnnotAction::Clear,
        }))
    }

    /// Freshly built result carrying the instruction's type and variable
    /// annotations.
    pub(super) fn tv(&self, t: Type) -> Result<Type, Error> {
        let a = self.annots(AnnotLimits::TYPE_VAR)?;
        Ok(t.annotate(&AnnotChange {
            var: AnnotAction::set(a.only(AnnotKind::Var)),
            ty: AnnotAction::set(a.only(AnnotKind::Type)),
            field: AnnotAction::Clear,
        }))
    }

    pub(super) fn comparable(&self, t: &Type) -> Result<(), Error> {
        if t.is_comparable() {
            Ok(())
        } else {
            Err(self.error(CodeErrorReason::NotComparable(t.clone())))
        }
    }
}

/// `head` pushed onto `rest`.
pub(super) fn push(head: impl IntoIterator<Item = Type>, rest: &[Type]) -> Vec<Type> {
    let mut out: Vec<Type> = head.into_iter().collect();
    out.extend_from_slice(rest);
    out
}
