//! Annotations attached to type and instruction nodes.
//!
//! Every token is classified by its leading character: `:` names a type,
//! `%` names a field, `@` names a variable. Variable annotations belong to
//! the instruction that produced a value and are copied onto result types;
//! they never take part in type equality.

use std::fmt;

use crate::types::TypeId;

/// Annotation class, decided by the token prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotKind {
    Type,
    Field,
    Var,
}

impl AnnotKind {
    pub fn prefix(self) -> char {
        match self {
            AnnotKind::Type => ':',
            AnnotKind::Field => '%',
            AnnotKind::Var => '@',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnnotKind::Type => "type",
            AnnotKind::Field => "field",
            AnnotKind::Var => "variable",
        }
    }
}

impl fmt::Display for AnnotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single annotation token, prefix included (`%owner`, `:t`, `@x`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    kind: AnnotKind,
    text: String,
}

impl Annotation {
    pub fn parse(token: &str) -> Result<Self, AnnotationError> {
        let kind = match token.chars().next() {
            Some(':') => AnnotKind::Type,
            Some('%') => AnnotKind::Field,
            Some('@') => AnnotKind::Var,
            _ => return Err(AnnotationError::Malformed(token.to_string())),
        };
        let valid = token[1..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%' | '@'));
        if !valid {
            return Err(AnnotationError::Malformed(token.to_string()));
        }
        Ok(Self {
            kind,
            text: token.to_string(),
        })
    }

    /// Build an annotation of the given class from a bare name.
    pub fn new(kind: AnnotKind, name: &str) -> Self {
        Self {
            kind,
            text: format!("{}{}", kind.prefix(), name),
        }
    }

    pub fn kind(&self) -> AnnotKind {
        self.kind
    }

    /// Full token, prefix included.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Token without its prefix.
    pub fn name(&self) -> &str {
        &self.text[1..]
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered annotation list of one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse raw tokens. Empty tokens are skipped.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, AnnotationError> {
        tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| !t.is_empty())
            .map(Annotation::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn of(&self, kind: AnnotKind) -> impl Iterator<Item = &Annotation> {
        self.0.iter().filter(move |a| a.kind == kind)
    }

    pub fn count(&self, kind: AnnotKind) -> usize {
        self.of(kind).count()
    }

    pub fn first(&self, kind: AnnotKind) -> Option<&Annotation> {
        self.of(kind).next()
    }

    pub fn push(&mut self, annot: Annotation) {
        self.0.push(annot);
    }

    /// Only the annotations of one class, in order.
    pub fn only(&self, kind: AnnotKind) -> Vec<Annotation> {
        self.of(kind).cloned().collect()
    }

    /// Apply a change record. The result lists variables, then types, then
    /// fields.
    pub fn apply(&self, change: &AnnotChange) -> Annotations {
        let mut out = Vec::new();
        for (kind, action) in [
            (AnnotKind::Var, &change.var),
            (AnnotKind::Type, &change.ty),
            (AnnotKind::Field, &change.field),
        ] {
            match action {
                AnnotAction::Keep => out.extend(self.of(kind).cloned()),
                AnnotAction::Replace(list) => out.extend(list.iter().cloned()),
                AnnotAction::Clear => {}
            }
        }
        Annotations(out)
    }
}

impl fmt::Display for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.0.iter().map(Annotation::as_str).collect();
        f.write_str(&parts.join(" "))
    }
}

impl From<Vec<Annotation>> for Annotations {
    fn from(v: Vec<Annotation>) -> Self {
        Self(v)
    }
}

/// What to do with one annotation class when rebuilding a type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AnnotAction {
    #[default]
    Keep,
    Replace(Vec<Annotation>),
    Clear,
}

impl AnnotAction {
    /// Replace with the given list, or clear when it is empty.
    pub fn set(list: Vec<Annotation>) -> Self {
        if list.is_empty() {
            AnnotAction::Clear
        } else {
            AnnotAction::Replace(list)
        }
    }
}

/// Requested annotation changes, one action per class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotChange {
    pub var: AnnotAction,
    pub ty: AnnotAction,
    pub field: AnnotAction,
}

impl AnnotChange {
    pub fn keep_all() -> Self {
        Self::default()
    }

    pub fn clear_all() -> Self {
        Self {
            var: AnnotAction::Clear,
            ty: AnnotAction::Clear,
            field: AnnotAction::Clear,
        }
    }
}

/// Per-class upper bounds on the annotations an instruction may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotLimits {
    pub field: usize,
    pub ty: usize,
    pub var: usize,
}

impl AnnotLimits {
    pub const NONE: AnnotLimits = AnnotLimits::new(0, 0, 0);
    pub const VAR: AnnotLimits = AnnotLimits::new(0, 0, 1);
    pub const TYPE_VAR: AnnotLimits = AnnotLimits::new(0, 1, 1);

    pub const fn new(field: usize, ty: usize, var: usize) -> Self {
        Self { field, ty, var }
    }

    pub fn max(&self, kind: AnnotKind) -> usize {
        match kind {
            AnnotKind::Field => self.field,
            AnnotKind::Type => self.ty,
            AnnotKind::Var => self.var,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("{ty}: at most one type annotation allowed: {annots}")]
    TooManyTypeAnnots { ty: TypeId, annots: Annotations },
    #[error("{ty}: at most one field annotation allowed: {annots}")]
    TooManyFieldAnnots { ty: TypeId, annots: Annotations },
    #[error("{ty}: field annotations aren't allowed here: {annots}")]
    FieldNotAllowed { ty: TypeId, annots: Annotations },
    #[error("{prim}: at most {max} {kind} annotations allowed")]
    InstructionLimit {
        prim: &'static str,
        kind: AnnotKind,
        max: usize,
    },
    #[error("unexpected annotation: {0:?}")]
    Malformed(String),
}
