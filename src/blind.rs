//! Leaf blinding.
//!
//! The tree never stores a leaf value in the clear. Under
//! `EncodingType::BlindedSha256v1` a `(key, value)` pair is stored as
//! `(key, p(p(key, s), value))` where `p` is HMAC-SHA256 and `s` is a secret
//! unique to the root's seqno. The secret-derived input is always the MAC key:
//!
//! ```text
//! kss     = HMAC-SHA256(key = s,   message = key)
//! blinded = HMAC-SHA256(key = kss, message = value)
//! ```
//!
//! Secrets are only borrowed for the duration of a call.

use std::io::Write;

use ed::{Decode, Encode, Terminated};

use crate::encoding::{decode_with, decoding_error, encode_to_vec, read_hash};
use crate::error::{Error, Result};
use crate::hash::{hmac_sha256, hmac_sha256_verify, Hash, HASH_LENGTH};
use crate::leaf::LeafContainer;

/// Tags which blinding scheme produced an `EncodedLeaf`. New schemes are
/// added as new variants; existing ones never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodingType {
    BlindedSha256v1,
}

impl EncodingType {
    pub fn as_u8(self) -> u8 {
        match self {
            EncodingType::BlindedSha256v1 => 1,
        }
    }

    pub fn from_u8(raw: u8) -> Result<Self> {
        match raw {
            1 => Ok(EncodingType::BlindedSha256v1),
            other => Err(Error::UnknownEncodingType(other)),
        }
    }
}

impl Encode for EncodingType {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        dest.write_all(&[self.as_u8()])?;
        Ok(())
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(1)
    }
}

impl Terminated for EncodingType {}

/// A blinded leaf value, as stored in the tree. Opaque to anyone without the
/// secret of the root it was written under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedLeaf {
    encoding_type: EncodingType,
    value: Hash,
}

impl EncodedLeaf {
    /// Blinds `value` stored under `key` with the per-root `secret`.
    pub fn blind(
        encoding_type: EncodingType,
        key: &[u8],
        value: &[u8],
        secret: &[u8],
    ) -> Result<Self> {
        let value = match encoding_type {
            EncodingType::BlindedSha256v1 => {
                let key_secret = hmac_sha256(secret, key)?;
                hmac_sha256(&key_secret, value)?
            }
        };
        Ok(EncodedLeaf {
            encoding_type,
            value,
        })
    }

    /// Blinds the serialized form of a leaf container.
    pub fn blind_container(
        encoding_type: EncodingType,
        key: &[u8],
        container: &LeafContainer,
        secret: &[u8],
    ) -> Result<Self> {
        let value = container.serialize()?;
        EncodedLeaf::blind(encoding_type, key, &value, secret)
    }

    /// Re-derives the blinded value from `key`, `value` and `secret` using this
    /// leaf's encoding type, and compares in constant time.
    pub fn verify(&self, key: &[u8], value: &[u8], secret: &[u8]) -> Result<bool> {
        match self.encoding_type {
            EncodingType::BlindedSha256v1 => {
                let key_secret = hmac_sha256(secret, key)?;
                hmac_sha256_verify(&key_secret, value, &self.value)
            }
        }
    }

    /// Constructs an `EncodedLeaf` from a blinded value produced elsewhere.
    pub fn from_fields(encoding_type: EncodingType, value: Hash) -> Self {
        EncodedLeaf {
            encoding_type,
            value,
        }
    }

    #[inline]
    pub fn encoding_type(&self) -> EncodingType {
        self.encoding_type
    }

    #[inline]
    pub fn value(&self) -> &Hash {
        &self.value
    }

    /// Encodes as the type byte followed by the blinded value.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_with(bytes, |input| {
            let raw: u8 = Decode::decode(&mut *input).map_err(decoding_error)?;
            let encoding_type = EncodingType::from_u8(raw)?;
            let value = read_hash(input).map_err(decoding_error)?;
            Ok(EncodedLeaf {
                encoding_type,
                value,
            })
        })
    }
}

impl Encode for EncodedLeaf {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        self.encoding_type.encode_into(dest)?;
        dest.write_all(&self.value[..])?;
        Ok(())
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(1 + HASH_LENGTH)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::leaf::{export_leaf, Chain17v1Leaf, Leaf};

    const SECRET: &[u8] = b"per-root secret for seqno 7";

    #[test]
    fn blind_is_double_hmac() {
        let leaf = EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key", b"value", SECRET).unwrap();
        let expected = hmac_sha256(&hmac_sha256(SECRET, b"key").unwrap(), b"value").unwrap();
        assert_eq!(leaf.value(), &expected);
        assert_eq!(leaf.encoding_type(), EncodingType::BlindedSha256v1);
    }

    #[test]
    fn blind_depends_on_every_input() {
        let base = EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key", b"value", SECRET).unwrap();
        let other_key =
            EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key2", b"value", SECRET).unwrap();
        let other_value =
            EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key", b"value2", SECRET).unwrap();
        let other_secret =
            EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key", b"value", b"other").unwrap();
        assert_ne!(base, other_key);
        assert_ne!(base, other_value);
        assert_ne!(base, other_secret);
        assert_eq!(
            base,
            EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key", b"value", SECRET).unwrap()
        );
    }

    #[test]
    fn verify() {
        let leaf = EncodedLeaf::blind(EncodingType::BlindedSha256v1, b"key", b"value", SECRET).unwrap();
        assert!(leaf.verify(b"key", b"value", SECRET).unwrap());
        assert!(!leaf.verify(b"key", b"value", b"wrong secret").unwrap());
        assert!(!leaf.verify(b"key", b"other value", SECRET).unwrap());
        assert!(!leaf.verify(b"other key", b"value", SECRET).unwrap());
    }

    #[test]
    fn blind_container() {
        let leaf = Leaf::Chain17v1(Chain17v1Leaf {
            team_id: vec![1; 16],
            sig_id: vec![2; 32],
            link_id: vec![3; 32],
            seqno: 9,
        });
        let container = export_leaf(&leaf).unwrap();
        let encoded =
            EncodedLeaf::blind_container(EncodingType::BlindedSha256v1, &[1; 16], &container, SECRET)
                .unwrap();
        assert!(encoded
            .verify(&[1; 16], &container.serialize().unwrap(), SECRET)
            .unwrap());
    }

    #[test]
    fn encode_decode() {
        let leaf = EncodedLeaf::from_fields(EncodingType::BlindedSha256v1, [9; HASH_LENGTH]);
        let bytes = leaf.encode().unwrap();
        assert_eq!(bytes.len(), 1 + HASH_LENGTH);
        assert_eq!(bytes[0], 1);
        assert_eq!(EncodedLeaf::decode(&bytes).unwrap(), leaf);
    }

    #[test]
    fn decode_unknown_encoding_type() {
        let mut bytes = vec![2];
        bytes.extend_from_slice(&[0; HASH_LENGTH]);
        let err = EncodedLeaf::decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::UnknownEncodingType(2)));
        assert!(err.is_decoding());
    }

    #[test]
    fn decode_short() {
        assert!(EncodedLeaf::decode(&[1, 2, 3]).unwrap_err().is_decoding());
        assert!(EncodedLeaf::decode(&[]).unwrap_err().is_decoding());
    }
}
