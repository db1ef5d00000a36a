use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::proofs::RootSource;
use crate::root::{Root, Seqno};

/// An in-memory `RootSource`.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    roots: BTreeMap<Seqno, Root>,
}

impl MemorySource {
    pub fn new<I: IntoIterator<Item = Root>>(roots: I) -> Self {
        MemorySource {
            roots: roots.into_iter().map(|root| (root.seqno, root)).collect(),
        }
    }

    pub fn get(&self, seqno: Seqno) -> Option<&Root> {
        self.roots.get(&seqno)
    }

    /// Stores `root` under `seqno` regardless of the seqno it claims, returning
    /// whatever was there.
    pub fn insert(&mut self, seqno: Seqno, root: Root) -> Option<Root> {
        self.roots.insert(seqno, root)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl RootSource for MemorySource {
    fn fetch_root(&self, seqno: Seqno) -> Result<Root> {
        self.roots
            .get(&seqno)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("No root stored for seqno {}", seqno)))
    }
}
