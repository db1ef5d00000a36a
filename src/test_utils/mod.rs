mod memory_source;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::config::Config;
use crate::hash::Hash;
use crate::leaf::{Chain17v1Leaf, Leaf};
use crate::root::{Root, RootMetadata, Seqno, Skips};

pub use memory_source::MemorySource;

/// Creation time of the root at seqno 0 in generated chains.
pub const BASE_CTIME: i64 = 1_500_000_000_000;

/// A signature check which trusts every root.
pub fn accept_all(_root: &Root) -> bool {
    true
}

/// Stand-in for the tree root hash of the directory at `seqno`.
pub fn tree_root_hash(config: &Config, seqno: Seqno) -> Hash {
    config.hash(&seqno.to_be_bytes())
}

/// Builds roots `1..=count`, each linked to its skip pointers. The root at
/// seqno `s` is at index `s - 1`.
pub fn make_root_chain(config: &Config, count: Seqno) -> Vec<Root> {
    let mut chain: Vec<Root> = Vec::with_capacity(count.max(0) as usize);
    for seqno in 1..=count {
        let skips = Skips::for_seqno(seqno, |target| Ok(chain[(target - 1) as usize].hash_meta))
            .expect("skip target missing");
        let metadata = RootMetadata::new(config, seqno, skips, tree_root_hash(config, seqno));
        let root = Root::new(config, &metadata, BASE_CTIME + seqno * 1000)
            .expect("failed to encode root");
        chain.push(root);
    }
    chain
}

pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

pub fn random_bytes<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut bytes = vec![0; len];
    rng.fill(&mut bytes[..]);
    bytes
}

pub fn random_leaf<R: Rng>(rng: &mut R) -> Leaf {
    let sig_id_len = rng.gen_range(32..=33);
    Leaf::Chain17v1(Chain17v1Leaf {
        team_id: random_bytes(rng, 16),
        sig_id: random_bytes(rng, sig_id_len),
        link_id: random_bytes(rng, 32),
        seqno: rng.gen(),
    })
}
