//! Literal validation against a declared type.

use std::cmp::Ordering;

use tracing::trace;

use super::compare::{is_decimal, is_natural, parse_timestamp, split_entrypoint};
use super::equality::assert_stacks_equal_at;
use super::{StackType, TypeChecker};
use crate::error::{DataError, DataErrorReason, Error};
use crate::ident::IdKind;
use crate::path::{Crumb, Path};
use crate::syntax::lower::lower_instruction;
use crate::syntax::micheline::{hex_digits, Node};
use crate::types::{Type, TypeKind};

fn data_error(ty: &Type, data: &Node, reason: DataErrorReason, path: &Path<'_>) -> Error {
    Error::new(
        DataError {
            ty: ty.clone(),
            data: data.clone(),
            reason,
        },
        path,
    )
}

/// `(prim, args)` of a data constructor application.
fn ctor(d: &Node) -> Option<(&str, &[Node])> {
    d.as_prim()
}

impl TypeChecker {
    pub(super) fn check_data(&self, ty: &Type, d: &Node, path: &Path<'_>) -> Result<(), Error> {
        self.enter(path)?;
        trace!(ty = %ty, "validate literal");

        let expected = |what: &'static str| data_error(ty, d, DataErrorReason::Expected(what), path);

        match &ty.kind {
            TypeKind::Int => match d {
                Node::Int { int } if is_decimal(int) => Ok(()),
                _ => Err(expected("integer value")),
            },
            TypeKind::Nat | TypeKind::Mutez => match d {
                Node::Int { int } if is_natural(int) => Ok(()),
                _ => Err(expected("natural value")),
            },
            TypeKind::String => match d {
                Node::String { .. } => Ok(()),
                _ => Err(expected("string value")),
            },
            TypeKind::Bytes => match d {
                Node::Bytes { bytes } if hex::decode(hex_digits(bytes)).is_ok() => {
                    Ok(())
                }
                _ => Err(expected("bytes value")),
            },
            TypeKind::Bool => match ctor(d) {
                Some(("True" | "False", [])) => Ok(()),
                _ => Err(expected("boolean value")),
            },
            TypeKind::Unit => match ctor(d) {
                Some(("Unit", [])) => Ok(()),
                _ => Err(expected("unit value")),
            },
            TypeKind::KeyHash => self.check_id(d, IdKind::KEY_HASHES).ok_or_else(|| expected("key hash")),
            TypeKind::Key => self.check_id(d, IdKind::KEYS).ok_or_else(|| expected("public key")),
            TypeKind::Signature => self
                .check_id(d, IdKind::SIGNATURES)
                .ok_or_else(|| expected("signature")),
            TypeKind::Address => match d {
                Node::String { string } => {
                    let (addr, _) = split_entrypoint(string);
                    self.ids
                        .classify(addr, IdKind::ADDRESSES)
                        .map(|_| ())
                        .ok_or_else(|| expected("address"))
                }
                _ => Err(expected("address")),
            },
            TypeKind::Timestamp => match d {
                Node::Int { .. } | Node::String { .. } if parse_timestamp(d).is_some() => Ok(()),
                _ => Err(expected("timestamp")),
            },
            TypeKind::ChainId => {
                let ok = match d {
                    Node::String { string } => {
                        self.ids.classify(string, &[IdKind::ChainId]).is_some()
                    }
                    Node::Bytes { bytes } => hex::decode(hex_digits(bytes))
                        .map(|b| b.len() == IdKind::ChainId.payload_len())
                        .unwrap_or(false),
                    _ => false,
                };
                if ok {
                    Ok(())
                } else {
                    Err(expected("chain id"))
                }
            }
            TypeKind::Operation | TypeKind::Contract(_) => {
                Err(data_error(ty, d, DataErrorReason::NoLiteral(ty.id()), path))
            }

            TypeKind::Option(t) => match ctor(d) {
                Some(("None", [])) => Ok(()),
                Some(("Some", [x])) => self.check_data(t, x, &path.push(0, Crumb::Type(t))),
                _ => Err(expected("option")),
            },
            TypeKind::List(t) | TypeKind::Set(t) => {
                let Node::Seq(items) = d else {
                    return Err(expected(ty.id().as_str()));
                };
                let is_set = matches!(ty.kind, TypeKind::Set(_));
                if is_set && !t.is_comparable() {
                    return Err(data_error(
                        ty,
                        d,
                        DataErrorReason::NotComparable((**t).clone()),
                        path,
                    ));
                }
                let mut prev: Option<&Node> = None;
                for (i, v) in items.iter().enumerate() {
                    if matches!(ctor(v), Some(("Elt", _))) {
                        return Err(data_error(ty, d, DataErrorReason::EltOutsideMap, path));
                    }
                    let p = path.push(i, Crumb::Data(v));
                    self.check_data(t, v, &p)?;
                    if is_set {
                        if let Some(prev) = prev {
                            if self.compare_data(t, prev, v, &p)? == Ordering::Greater {
                                return Err(data_error(
                                    ty,
                                    d,
                                    DataErrorReason::UnorderedSetLiteral,
                                    path,
                                ));
                            }
                        }
                        prev = Some(v);
                    }
                }
                Ok(())
            }
            TypeKind::Pair(l, r) => match ctor(d) {
                Some(("Pair", [a, b])) => {
                    self.check_data(l, a, &path.push(0, Crumb::Type(l)))?;
                    self.check_data(r, b, &path.push(1, Crumb::Type(r)))
                }
                _ => Err(expected("pair")),
            },
            TypeKind::Or(l, r) => match ctor(d) {
                Some(("Left", [x])) => self.check_data(l, x, &path.push(0, Crumb::Type(l))),
                Some(("Right", [x])) => self.check_data(r, x, &path.push(1, Crumb::Type(r))),
                _ => Err(expected("union (or)")),
            },
            TypeKind::Lambda(arg, ret) => {
                if !matches!(d, Node::Seq(_)) {
                    return Err(expected("function"));
                }
                let code = lower_instruction(d).map_err(|_| expected("function"))?;
                let body = self.check_instr(&code, std::slice::from_ref(&**arg), path)?;
                match body {
                    StackType::Failed(f) => Err(data_error(
                        ty,
                        d,
                        DataErrorReason::LambdaAlwaysFails(f),
                        path,
                    )),
                    StackType::Live(s) => assert_stacks_equal_at(
                        std::slice::from_ref(&**ret),
                        &s,
                        &path.push(1, Crumb::Type(ret)),
                    ),
                }
            }
            TypeKind::Map(k, v) | TypeKind::BigMap(k, v) => {
                let Node::Seq(items) = d else {
                    return Err(expected(ty.id().as_str()));
                };
                if !k.is_comparable() {
                    return Err(data_error(
                        ty,
                        d,
                        DataErrorReason::NotComparable((**k).clone()),
                        path,
                    ));
                }
                let mut prev: Option<&Node> = None;
                for (i, item) in items.iter().enumerate() {
                    let Some(("Elt", [key, val])) = ctor(item) else {
                        return Err(data_error(ty, d, DataErrorReason::MapEltExpected, path));
                    };
                    let p = path.push(i, Crumb::Data(item));
                    self.check_data(k, key, &p.push(0, Crumb::Type(k)))?;
                    self.check_data(v, val, &p.push(1, Crumb::Type(v)))?;
                    if let Some(prev) = prev {
                        if self.compare_data(k, prev, key, &p)? == Ordering::Greater {
                            return Err(data_error(ty, d, DataErrorReason::UnorderedMapLiteral, path));
                        }
                    }
                    prev = Some(key);
                }
                Ok(())
            }
        }
    }

    fn check_id(&self, d: &Node, kinds: &[IdKind]) -> Option<()> {
        match d {
            Node::String { string } => self.ids.classify(string, kinds).map(|_| ()),
            _ => None,
        }
    }
}
