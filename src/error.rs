use thiserror::Error;

use crate::skips::Seqno;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Decoding Error: {0}")]
    Decoding(String),
    #[error("Unknown leaf type: {0}")]
    UnknownLeafType(u16),
    #[error("Unknown encoding type: {0}")]
    UnknownEncodingType(u8),
    #[error("Serialization Error: {0}")]
    Serialization(String),
    #[error("Consistency Violation: {0}")]
    ConsistencyViolation(String),
    #[error("Invalid signature on root {0}")]
    InvalidSignature(Seqno),
    #[error("Fetch Error: {0}")]
    Fetch(String),
}

impl Error {
    /// Returns `true` for malformed or unrecognized bytes at any layer.
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            Error::Decoding(_) | Error::UnknownLeafType(_) | Error::UnknownEncodingType(_)
        )
    }

    /// Returns `true` if the error means the directory itself is broken. These
    /// must not be retried.
    pub fn is_consistency_violation(&self) -> bool {
        matches!(self, Error::ConsistencyViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
