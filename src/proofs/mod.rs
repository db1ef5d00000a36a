pub mod assemble;
pub mod encoding;
pub mod verify;

use crate::error::Result;
use crate::hash::Hash;
use crate::root::{Root, Seqno};

pub use assemble::{assemble_skips, RootSource};
pub use verify::{verify_skips, SignatureVerifier};

/// One element of a Merkle inclusion path: a tree node's hash and its raw
/// value bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub hash: Hash,
    pub value: Vec<u8>,
}

impl Block {
    pub fn new(hash: Hash, value: Vec<u8>) -> Self {
        Block { hash, value }
    }
}

/// The proof artifact handed to a verifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    /// The latest root known to the server.
    pub current_root: Root,

    /// Inclusion path for the requested leaf, `None` if not requested.
    pub path: Option<Vec<Block>>,

    /// Roots at `compute_skip_path(known, current_root.seqno)`, in that order.
    /// `None` if not requested.
    pub skips: Option<Vec<Root>>,
}

impl Path {
    pub fn new(current_root: Root, path: Option<Vec<Block>>, skips: Option<Vec<Root>>) -> Self {
        Path {
            current_root,
            path,
            skips,
        }
    }

    /// Builds a `Path` for `current_root`, fetching the consistency roots from
    /// `source` when a `known` seqno is given.
    pub fn assemble<S: RootSource + ?Sized>(
        source: &S,
        current_root: Root,
        path: Option<Vec<Block>>,
        known: Option<Seqno>,
    ) -> Result<Self> {
        let skips = match known {
            Some(known) => Some(assemble_skips(source, known, current_root.seqno)?),
            None => None,
        };
        Ok(Path::new(current_root, path, skips))
    }
}
