use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512_256};

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// The length of a `Hash` (in bytes).
pub const HASH_LENGTH: usize = 32;

/// A zero-filled `Hash`.
pub const NULL_HASH: Hash = [0; HASH_LENGTH];

/// A cryptographic hash digest.
pub type Hash = [u8; HASH_LENGTH];

/// The hash algorithms a `Config` can select for hashing root metadata. All of
/// them produce `HASH_LENGTH`-byte digests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha512_256,
    Blake3,
}

impl HashAlgorithm {
    /// Hashes `bytes` with this algorithm.
    pub fn hash(self, bytes: &[u8]) -> Hash {
        match self {
            HashAlgorithm::Sha256 => digest::<Sha256>(bytes),
            HashAlgorithm::Sha512_256 => digest::<Sha512_256>(bytes),
            HashAlgorithm::Blake3 => *blake3::hash(bytes).as_bytes(),
        }
    }
}

fn digest<D: Digest>(bytes: &[u8]) -> Hash {
    let res = D::digest(bytes);
    let mut hash: Hash = Default::default();
    hash.copy_from_slice(&res[..]);
    hash
}

fn new_mac(key: &[u8]) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(key)
        .map_err(|err| Error::Serialization(format!("invalid HMAC key: {}", err)))
}

/// HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Hash> {
    let mut mac = new_mac(key)?;
    mac.update(message);

    let res = mac.finalize().into_bytes();
    let mut hash: Hash = Default::default();
    hash.copy_from_slice(&res[..]);
    Ok(hash)
}

/// Checks `tag` against HMAC-SHA256 of `message` under `key` in constant time.
pub fn hmac_sha256_verify(key: &[u8], message: &[u8], tag: &[u8]) -> Result<bool> {
    let mut mac = new_mac(key)?;
    mac.update(message);
    Ok(mac.verify_slice(tag).is_ok())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sha256_known_digest() {
        let hash = HashAlgorithm::Sha256.hash(b"abc");
        assert_eq!(
            hex::encode(hash),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn algorithms_differ() {
        let a = HashAlgorithm::Sha256.hash(b"root");
        let b = HashAlgorithm::Sha512_256.hash(b"root");
        let c = HashAlgorithm::Blake3.hash(b"root");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_ne!(a, NULL_HASH);
    }

    #[test]
    fn hmac_rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
        assert!(hmac_sha256_verify(b"Jefe", b"what do ya want for nothing?", &tag).unwrap());
        assert!(!hmac_sha256_verify(b"Jefe", b"something else", &tag).unwrap());
        assert!(!hmac_sha256_verify(b"Jefe", b"what do ya want for nothing?", &tag[..16]).unwrap());
    }

    #[test]
    fn hmac_accepts_any_key_length() {
        let long_key = [0xaa; 131];
        let tag = hmac_sha256(&long_key, b"message").unwrap();
        assert!(hmac_sha256_verify(&long_key, b"message", &tag).unwrap());
        assert_ne!(hmac_sha256(b"", b"message").unwrap(), tag);
    }
}
