//! Checker errors.
//!
//! Every error is raised where it is detected together with the full path
//! from the root of the checked tree, and is never rewritten on the way up.

use std::fmt;

use crate::annot::AnnotationError;
use crate::ast::Instr;
use crate::path::{Path, PathStep};
use crate::syntax::micheline::Node;
use crate::types::{display_stack, Type, TypeId};

/// Structural disagreement between two types or two stacks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unequal types: {left} != {right}")]
    UnequalTypes { left: TypeId, right: TypeId },
    #[error("unequal type names: {left} != {right}")]
    UnequalTypeNames { left: String, right: String },
    #[error("unequal field names: {left} != {right}")]
    UnequalFieldNames { left: String, right: String },
    #[error("unequal stack lengths: {left} != {right}")]
    StackLengthMismatch { left: usize, right: usize },
}

/// A literal that does not fit its declared type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason}: {data}")]
pub struct DataError {
    pub ty: Type,
    pub data: Node,
    pub reason: DataErrorReason,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataErrorReason {
    #[error("{0} expected")]
    Expected(&'static str),
    #[error("{0} type can't be represented as a literal value")]
    NoLiteral(TypeId),
    #[error("Elt item outside of a map literal")]
    EltOutsideMap,
    #[error("map elements expected")]
    MapEltExpected,
    #[error("set elements must be ordered")]
    UnorderedSetLiteral,
    #[error("map elements must be ordered")]
    UnorderedMapLiteral,
    #[error("function is failed with error type: {0}")]
    LambdaAlwaysFails(Type),
    #[error("comparable type expected: {0}")]
    NotComparable(Type),
}

/// An instruction whose stack precondition does not hold.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}: {reason}", .instr.op.prim())]
pub struct CodeError {
    pub instr: Instr,
    pub stack: Vec<Type>,
    pub reason: CodeErrorReason,
}

fn join_ids(ids: &[TypeId]) -> String {
    let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    names.join(",")
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeErrorReason {
    #[error("stack must have at least {0} element(s)")]
    StackUnderflow(usize),
    #[error("stack type mismatch: [{slot}] expected to be {}, got {found} instead", join_ids(.expected))]
    StackTypeMismatch {
        slot: usize,
        expected: Vec<TypeId>,
        found: TypeId,
    },
    #[error("incompatible operand types: {0}, {1}")]
    IncompatibleOperandTypes(TypeId, TypeId),
    #[error("comparable type expected: {0}")]
    NotComparable(Type),
    #[error("packable type expected: {0}")]
    NotPackable(Type),
    #[error("function's argument must be a pair: {0}")]
    ApplyArgumentNotPair(TypeId),
    #[error("can't concatenate list of {0}'s")]
    ConcatListElement(TypeId),
    #[error("both arguments must be of the same type: {0}, {1}")]
    OperandsDiffer(TypeId, TypeId),
    #[error("key hash expected: {0}")]
    KeyHashExpected(TypeId),
    #[error("body must return a value")]
    EmptyBodyResult,
    #[error("field annotation {given} doesn't match {found}")]
    FieldMismatch { given: String, found: String },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error(transparent)]
    Data(Box<DataError>),
    #[error(transparent)]
    Code(Box<CodeError>),
    #[error("{0}: instruction is not supported")]
    Unsupported(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimit(usize),
}

impl From<DataError> for ErrorKind {
    fn from(e: DataError) -> Self {
        ErrorKind::Data(Box::new(e))
    }
}

impl From<CodeError> for ErrorKind {
    fn from(e: CodeError) -> Self {
        ErrorKind::Code(Box::new(e))
    }
}

/// Coarse error classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StructuralType,
    Annotation,
    DataType,
    CodeType,
    Unsupported,
    InternalInvariant,
    ResourceLimit,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::StructuralType => "type error",
            Category::Annotation => "annotation error",
            Category::DataType => "data error",
            Category::CodeType => "code error",
            Category::Unsupported => "unsupported construct",
            Category::InternalInvariant => "internal error",
            Category::ResourceLimit => "resource limit",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub path: Vec<PathStep>,
}

impl Error {
    pub fn new(kind: impl Into<ErrorKind>, path: &Path<'_>) -> Self {
        Self {
            kind: kind.into(),
            path: path.steps(),
        }
    }

    pub fn internal(message: impl Into<String>, path: &Path<'_>) -> Self {
        Self::new(ErrorKind::Internal(message.into()), path)
    }

    pub fn category(&self) -> Category {
        match &self.kind {
            ErrorKind::Type(_) => Category::StructuralType,
            ErrorKind::Annotation(_) => Category::Annotation,
            ErrorKind::Data(_) => Category::DataType,
            ErrorKind::Code(_) => Category::CodeType,
            ErrorKind::Unsupported(_) => Category::Unsupported,
            ErrorKind::Internal(_) => Category::InternalInvariant,
            ErrorKind::DepthLimit(_) => Category::ResourceLimit,
        }
    }

    /// Stack at the failing instruction, for code errors.
    pub fn stack(&self) -> Option<&[Type]> {
        match &self.kind {
            ErrorKind::Code(e) => Some(&e.stack),
            _ => None,
        }
    }

    pub fn code_reason(&self) -> Option<&CodeErrorReason> {
        match &self.kind {
            ErrorKind::Code(e) => Some(&e.reason),
            _ => None,
        }
    }

    pub fn data_reason(&self) -> Option<&DataErrorReason> {
        match &self.kind {
            ErrorKind::Data(e) => Some(&e.reason),
            _ => None,
        }
    }

    /// One-line rendering of the stack, if any.
    pub fn stack_note(&self) -> Option<String> {
        self.stack().map(|s| format!("stack: {}", display_stack(s)))
    }
}
