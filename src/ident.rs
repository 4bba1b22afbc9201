//! Identifier decoding for key hashes, addresses, keys, signatures and
//! chain ids.
//!
//! The checker only needs `decode + classify`: a string is of a given kind
//! iff its base58check payload is exactly the kind's binary prefix followed
//! by a payload of the kind's fixed length.

use std::fmt;

/// Recognized identifier kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    Ed25519PublicKeyHash,
    Secp256k1PublicKeyHash,
    P256PublicKeyHash,
    ContractHash,
    Ed25519PublicKey,
    Secp256k1PublicKey,
    P256PublicKey,
    Ed25519Signature,
    Secp256k1Signature,
    P256Signature,
    GenericSignature,
    ChainId,
}

impl IdKind {
    pub const KEY_HASHES: &'static [IdKind] = &[
        IdKind::Ed25519PublicKeyHash,
        IdKind::Secp256k1PublicKeyHash,
        IdKind::P256PublicKeyHash,
    ];

    pub const ADDRESSES: &'static [IdKind] = &[
        IdKind::Ed25519PublicKeyHash,
        IdKind::Secp256k1PublicKeyHash,
        IdKind::P256PublicKeyHash,
        IdKind::ContractHash,
    ];

    pub const KEYS: &'static [IdKind] = &[
        IdKind::Ed25519PublicKey,
        IdKind::Secp256k1PublicKey,
        IdKind::P256PublicKey,
    ];

    pub const SIGNATURES: &'static [IdKind] = &[
        IdKind::Ed25519Signature,
        IdKind::Secp256k1Signature,
        IdKind::P256Signature,
        IdKind::GenericSignature,
    ];

    /// Binary prefix that yields the familiar textual prefix (`tz1`, `KT1`...).
    pub fn prefix(self) -> &'static [u8] {
        match self {
            IdKind::Ed25519PublicKeyHash => &[6, 161, 159],
            IdKind::Secp256k1PublicKeyHash => &[6, 161, 161],
            IdKind::P256PublicKeyHash => &[6, 161, 164],
            IdKind::ContractHash => &[2, 90, 121],
            IdKind::Ed25519PublicKey => &[13, 15, 37, 217],
            IdKind::Secp256k1PublicKey => &[3, 254, 226, 86],
            IdKind::P256PublicKey => &[3, 178, 139, 127],
            IdKind::Ed25519Signature => &[9, 245, 205, 134, 18],
            IdKind::Secp256k1Signature => &[13, 115, 101, 19, 63],
            IdKind::P256Signature => &[54, 240, 44, 52],
            IdKind::GenericSignature => &[4, 130, 43],
            IdKind::ChainId => &[87, 82, 0],
        }
    }

    pub fn payload_len(self) -> usize {
        match self {
            IdKind::Ed25519PublicKeyHash
            | IdKind::Secp256k1PublicKeyHash
            | IdKind::P256PublicKeyHash
            | IdKind::ContractHash => 20,
            IdKind::Ed25519PublicKey => 32,
            IdKind::Secp256k1PublicKey | IdKind::P256PublicKey => 33,
            IdKind::Ed25519Signature
            | IdKind::Secp256k1Signature
            | IdKind::P256Signature
            | IdKind::GenericSignature => 64,
            IdKind::ChainId => 4,
        }
    }

    /// Textual prefix, for messages.
    pub fn tag(self) -> &'static str {
        match self {
            IdKind::Ed25519PublicKeyHash => "tz1",
            IdKind::Secp256k1PublicKeyHash => "tz2",
            IdKind::P256PublicKeyHash => "tz3",
            IdKind::ContractHash => "KT1",
            IdKind::Ed25519PublicKey => "edpk",
            IdKind::Secp256k1PublicKey => "sppk",
            IdKind::P256PublicKey => "p2pk",
            IdKind::Ed25519Signature => "edsig",
            IdKind::Secp256k1Signature => "spsig1",
            IdKind::P256Signature => "p2sig",
            IdKind::GenericSignature => "sig",
            IdKind::ChainId => "Net",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A classified identifier: its kind and the payload without prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub kind: IdKind,
    pub payload: Vec<u8>,
}

/// Decode-and-classify primitive used by the data validator and the
/// comparator.
pub trait IdDecoder: Send + Sync {
    /// Checked decoding of the full binary form, prefix included.
    fn decode(&self, s: &str) -> Option<Vec<u8>>;

    fn classify(&self, s: &str, kinds: &[IdKind]) -> Option<Decoded> {
        let bytes = self.decode(s)?;
        kinds.iter().find_map(|&kind| {
            let prefix = kind.prefix();
            if bytes.len() == prefix.len() + kind.payload_len() && bytes.starts_with(prefix) {
                Some(Decoded {
                    kind,
                    payload: bytes[prefix.len()..].to_vec(),
                })
            } else {
                None
            }
        })
    }
}

/// Base58 with a double-SHA256 checksum.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base58Check;

impl IdDecoder for Base58Check {
    fn decode(&self, s: &str) -> Option<Vec<u8>> {
        bs58::decode(s).with_check(None).into_vec().ok()
    }
}

/// Encode a payload of the given kind. Used to build fixtures.
pub fn encode(kind: IdKind, payload: &[u8]) -> String {
    let mut bytes = kind.prefix().to_vec();
    bytes.extend_from_slice(payload);
    bs58::encode(bytes).with_check().into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_prefixes() {
        let cases = [
            (IdKind::Ed25519PublicKeyHash, "tz1"),
            (IdKind::Secp256k1PublicKeyHash, "tz2"),
            (IdKind::P256PublicKeyHash, "tz3"),
            (IdKind::ContractHash, "KT1"),
            (IdKind::Ed25519PublicKey, "edpk"),
            (IdKind::Secp256k1PublicKey, "sppk"),
            (IdKind::P256PublicKey, "p2pk"),
            (IdKind::Ed25519Signature, "edsig"),
            (IdKind::Secp256k1Signature, "spsig1"),
            (IdKind::P256Signature, "p2sig"),
            (IdKind::GenericSignature, "sig"),
            (IdKind::ChainId, "Net"),
        ];
        for (kind, tag) in cases {
            let s = encode(kind, &vec![7u8; kind.payload_len()]);
            assert!(s.starts_with(tag), "{} should start with {}", s, tag);
        }
    }

    #[test]
    fn test_known_address_classifies() {
        let d = Base58Check
            .classify("tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx", IdKind::KEY_HASHES)
            .unwrap();
        assert_eq!(d.kind, IdKind::Ed25519PublicKeyHash);
        assert_eq!(d.payload.len(), 20);
    }

    #[test]
    fn test_classify_round_trip() {
        let payload: Vec<u8> = (0..20).collect();
        let s = encode(IdKind::ContractHash, &payload);
        let d = Base58Check.classify(&s, IdKind::ADDRESSES).unwrap();
        assert_eq!(d.kind, IdKind::ContractHash);
        assert_eq!(d.payload, payload);
        assert!(Base58Check.classify(&s, IdKind::KEY_HASHES).is_none());
    }

    #[test]
    fn test_rejects_bad_checksum_and_length() {
        let s = encode(IdKind::Ed25519PublicKeyHash, &[1; 20]);
        let mut broken = s.clone();
        let last = broken.pop().unwrap();
        broken.push(if last == 'a' { 'b' } else { 'a' });
        assert!(Base58Check.classify(&broken, IdKind::KEY_HASHES).is_none());

        let short = encode(IdKind::Ed25519PublicKeyHash, &[1; 19]);
        assert!(Base58Check.classify(&short, IdKind::KEY_HASHES).is_none());
        assert!(Base58Check.decode("not base58 0OIl").is_none());
    }
}
