//! Structural type equality and annotation well-formedness.

use crate::annot::{AnnotKind, AnnotationError};
use crate::error::{Error, TypeError};
use crate::path::{Crumb, Path};
use crate::types::{Type, TypeKind};

/// At most one type annotation per node; at most one field annotation in
/// field position (pair and or components), none elsewhere.
pub(crate) fn check_annotations(t: &Type, field: bool, path: &Path<'_>) -> Result<(), Error> {
    let annots = &t.annots;
    if annots.count(AnnotKind::Type) > 1 {
        return Err(Error::new(
            AnnotationError::TooManyTypeAnnots {
                ty: t.id(),
                annots: annots.clone(),
            },
            path,
        ));
    }
    let fields = annots.count(AnnotKind::Field);
    if field && fields > 1 {
        return Err(Error::new(
            AnnotationError::TooManyFieldAnnots {
                ty: t.id(),
                annots: annots.clone(),
            },
            path,
        ));
    }
    if !field && fields > 0 {
        return Err(Error::new(
            AnnotationError::FieldNotAllowed {
                ty: t.id(),
                annots: annots.clone(),
            },
            path,
        ));
    }
    let in_field = matches!(t.kind, TypeKind::Pair(..) | TypeKind::Or(..));
    for (i, arg) in t.args().into_iter().enumerate() {
        check_annotations(arg, in_field, &path.push(i, Crumb::Type(arg)))?;
    }
    Ok(())
}

fn name_of(t: &Type, kind: AnnotKind) -> Option<&str> {
    t.annots.first(kind).map(|a| a.as_str())
}

fn scalar_equal(a: &Type, b: &Type, field: bool, path: &Path<'_>) -> Result<(), Error> {
    if a.id() != b.id() {
        return Err(Error::new(
            TypeError::UnequalTypes {
                left: a.id(),
                right: b.id(),
            },
            path,
        ));
    }

    let (ta, tb) = (name_of(a, AnnotKind::Type), name_of(b, AnnotKind::Type));
    if (ta.is_some() || tb.is_some()) && ta != tb {
        return Err(Error::new(
            TypeError::UnequalTypeNames {
                left: ta.unwrap_or("<undefined>").to_string(),
                right: tb.unwrap_or("<undefined>").to_string(),
            },
            path,
        ));
    }

    let (fa, fb) = (name_of(a, AnnotKind::Field), name_of(b, AnnotKind::Field));
    if field && (fa.is_some() || fb.is_some()) && fa != fb {
        return Err(Error::new(
            TypeError::UnequalFieldNames {
                left: fa.unwrap_or("<undefined>").to_string(),
                right: fb.unwrap_or("<undefined>").to_string(),
            },
            path,
        ));
    }

    let in_field = matches!(a.kind, TypeKind::Pair(..) | TypeKind::Or(..));
    for (i, (x, y)) in a.args().into_iter().zip(b.args()).enumerate() {
        scalar_equal(x, y, in_field, &path.push(i, Crumb::Type(x)))?;
    }
    Ok(())
}

pub(crate) fn assert_types_equal_at(a: &Type, b: &Type, path: &Path<'_>) -> Result<(), Error> {
    check_annotations(a, false, path)?;
    check_annotations(b, false, &Path::root())?;
    scalar_equal(a, b, false, path)
}

pub(crate) fn assert_stacks_equal_at(a: &[Type], b: &[Type], path: &Path<'_>) -> Result<(), Error> {
    if a.len() != b.len() {
        return Err(Error::new(
            TypeError::StackLengthMismatch {
                left: a.len(),
                right: b.len(),
            },
            path,
        ));
    }
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let p = path.push(i, Crumb::Type(x));
        assert_types_equal_at(x, y, &p)?;
    }
    Ok(())
}

/// Fails with the first point where `a` and `b` diverge.
pub fn assert_types_equal(a: &Type, b: &Type) -> Result<(), Error> {
    assert_types_equal_at(a, b, &Path::root())
}

/// Stack equality: equal lengths and pairwise equal types.
pub fn assert_stacks_equal(a: &[Type], b: &[Type]) -> Result<(), Error> {
    assert_stacks_equal_at(a, b, &Path::root())
}

pub fn types_equal(a: &Type, b: &Type) -> bool {
    assert_types_equal(a, b).is_ok()
}

/// Annotation well-formedness of a type outside field position.
pub fn assert_annotations_valid(t: &Type) -> Result<(), Error> {
    check_annotations(t, false, &Path::root())
}
