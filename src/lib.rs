//! A verifiable skip-list index for an append-only, hash-linked directory of
//! signed Merkle roots.
//!
//! Each root's metadata links to the `hash_meta` of the roots at
//! `compute_skip_pointers(seqno)`. A client holding an old root can then be
//! convinced that a newer root extends it by checking `O(log(distance))`
//! roots, namely those at `compute_skip_path(old, new)`.

mod encoding;
mod error;

pub mod blind;
pub mod config;
pub mod hash;
pub mod leaf;
pub mod proofs;
pub mod root;
pub mod skips;
#[cfg(feature = "full")]
pub mod test_utils;

pub use blind::{EncodedLeaf, EncodingType};
pub use config::Config;
pub use encoding::MAX_BYTES_LENGTH;
pub use error::{Error, Result};
pub use hash::{Hash, HashAlgorithm, HASH_LENGTH, NULL_HASH};
pub use leaf::{export_leaf, Chain17v1Leaf, Leaf, LeafContainer, LeafType};
pub use proofs::{assemble_skips, verify_skips, Block, Path, RootSource, SignatureVerifier};
pub use root::{Root, RootMetadata, Skips};
pub use skips::{compute_skip_path, compute_skip_pointers, skip_chain, Seqno};
