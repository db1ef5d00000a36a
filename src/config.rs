use crate::blind::EncodingType;
use crate::hash::{Hash, HashAlgorithm};

/// Engine parameters shared by everything that hashes, assembles or verifies
/// roots. Construct one per process and pass it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Hashes root metadata into `Root::hash_meta` and therefore every skip
    /// link.
    pub hash_algorithm: HashAlgorithm,

    /// The blinding scheme new roots declare in their metadata.
    pub encoding_type: EncodingType,
}

impl Config {
    pub fn new(hash_algorithm: HashAlgorithm, encoding_type: EncodingType) -> Self {
        Config {
            hash_algorithm,
            encoding_type,
        }
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    pub fn with_encoding_type(mut self, encoding_type: EncodingType) -> Self {
        self.encoding_type = encoding_type;
        self
    }

    #[inline]
    pub fn hash(&self, bytes: &[u8]) -> Hash {
        self.hash_algorithm.hash(bytes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(HashAlgorithm::Sha256, EncodingType::BlindedSha256v1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.encoding_type, EncodingType::BlindedSha256v1);
        assert_eq!(config.hash(b"x"), HashAlgorithm::Sha256.hash(b"x"));
    }

    #[test]
    fn with_hash_algorithm() {
        let config = Config::default().with_hash_algorithm(HashAlgorithm::Blake3);
        assert_eq!(config.hash(b"x"), HashAlgorithm::Blake3.hash(b"x"));
        assert_eq!(config.encoding_type, EncodingType::BlindedSha256v1);
    }
}
