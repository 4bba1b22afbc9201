//! Total order over values of comparable types.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::DateTime;
use num_bigint::BigInt;
use regex::Regex;

use super::TypeChecker;
use crate::error::Error;
use crate::path::{Crumb, Path};
use crate::syntax::micheline::{hex_digits, Node};
use crate::types::{Type, TypeKind};

static RFC3339: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn rfc3339() -> Option<&'static Regex> {
    RFC3339
        .get_or_init(|| {
            Regex::new(
                r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])T([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9]|60)(\.[0-9]+)?(Z|[+-]([01][0-9]|2[0-3]):([0-5][0-9]))$",
            )
        })
        .as_ref()
        .ok()
}

pub(super) fn is_natural(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit())
}

pub(super) fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    is_natural(digits)
}

/// Milliseconds since the epoch. Natural numbers, in int or string form,
/// are taken as milliseconds; other strings must be RFC 3339.
pub(super) fn parse_timestamp(d: &Node) -> Option<BigInt> {
    match d {
        Node::Int { int } if is_natural(int) => int.parse().ok(),
        Node::String { string } if is_natural(string) => string.parse().ok(),
        Node::String { string } if rfc3339()?.is_match(string) => DateTime::parse_from_rfc3339(string)
            .ok()
            .map(|t| BigInt::from(t.timestamp_millis())),
        _ => None,
    }
}

/// Split `KT1...%entrypoint` into the address and its entrypoint.
pub(super) fn split_entrypoint(s: &str) -> (&str, &str) {
    match s.find('%') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

impl TypeChecker {
    pub(super) fn compare_data(
        &self,
        ty: &Type,
        a: &Node,
        b: &Node,
        path: &Path<'_>,
    ) -> Result<Ordering, Error> {
        let mismatch = || Error::internal(format!("non comparable values: {}, {}", a, b), path);
        let ord = match (&ty.kind, a, b) {
            (
                TypeKind::Int | TypeKind::Nat | TypeKind::Mutez,
                Node::Int { int: x },
                Node::Int { int: y },
            ) => {
                let x: BigInt = x.parse().map_err(|_| mismatch())?;
                let y: BigInt = y.parse().map_err(|_| mismatch())?;
                x.cmp(&y)
            }
            (TypeKind::String, Node::String { string: x }, Node::String { string: y }) => x.cmp(y),
            (TypeKind::Bytes, Node::Bytes { bytes: x }, Node::Bytes { bytes: y }) => {
                let x = hex::decode(hex_digits(x)).map_err(|_| mismatch())?;
                let y = hex::decode(hex_digits(y)).map_err(|_| mismatch())?;
                x.cmp(&y)
            }
            (TypeKind::Bool, Node::Prim { prim: x, .. }, Node::Prim { prim: y, .. }) => {
                let rank = |p: &str| match p {
                    "False" => Some(0),
                    "True" => Some(1),
                    _ => None,
                };
                let x = rank(x).ok_or_else(mismatch)?;
                let y = rank(y).ok_or_else(mismatch)?;
                x.cmp(&y)
            }
            (TypeKind::KeyHash, Node::String { string: x }, Node::String { string: y }) => {
                let x = self.ids.decode(x).ok_or_else(mismatch)?;
                let y = self.ids.decode(y).ok_or_else(mismatch)?;
                x.cmp(&y)
            }
            (TypeKind::Address, Node::String { string: x }, Node::String { string: y }) => {
                let (xa, xe) = split_entrypoint(x);
                let (ya, ye) = split_entrypoint(y);
                let xb = self.ids.decode(xa).ok_or_else(mismatch)?;
                let yb = self.ids.decode(ya).ok_or_else(mismatch)?;
                xb.cmp(&yb).then_with(|| xe.cmp(ye))
            }
            (TypeKind::Timestamp, _, _) => {
                let x = parse_timestamp(a).ok_or_else(mismatch)?;
                let y = parse_timestamp(b).ok_or_else(mismatch)?;
                x.cmp(&y)
            }
            (TypeKind::Pair(l, r), Node::Prim { prim: pa, args: xa, .. }, Node::Prim { prim: pb, args: ya, .. })
                if pa == "Pair" && pb == "Pair" && xa.len() == 2 && ya.len() == 2 =>
            {
                let p0 = path.push(0, Crumb::Data(a));
                let first = self.compare_data(l, &xa[0], &ya[0], &p0)?;
                if first != Ordering::Equal {
                    return Ok(first);
                }
                let p1 = path.push(1, Crumb::Data(a));
                self.compare_data(r, &xa[1], &ya[1], &p1)?
            }
            _ => return Err(mismatch()),
        };
        Ok(ord)
    }
}
