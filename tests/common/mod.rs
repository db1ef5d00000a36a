#![allow(dead_code, unused_macros)]

use skiplink::*;

macro_rules! assert_err {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Err(err) => panic!("Unexpected error: {:?}", err),
            Ok(_) => panic!("Expected Err, got Ok"),
        }
    };
}

/// Asserts every hop of the chain from `end` down to `start` follows a skip
/// pointer.
pub fn assert_chain_links(start: Seqno, end: Seqno) {
    let chain = skip_chain(start, end);
    for pair in chain.windows(2) {
        assert!(
            compute_skip_pointers(pair[0]).contains(&pair[1]),
            "{} does not link to {} on the way from {} to {}",
            pair[0],
            pair[1],
            end,
            start
        );
    }
}

pub fn root_at(chain: &[Root], seqno: Seqno) -> &Root {
    &chain[(seqno - 1) as usize]
}

/// Asserts that every root in `chain` links to exactly its skip pointers, and
/// that each link is the `hash_meta` of its target.
pub fn assert_chain_invariants(config: &Config, chain: &[Root]) {
    for root in chain {
        root.check_hash_meta(config).expect("bad hash_meta");
        let metadata = root.metadata().expect("bad metadata");
        metadata.check_skips().expect("bad skip set");
        for (target, hash) in metadata.skips.iter() {
            assert_eq!(hash, &root_at(chain, *target).hash_meta);
        }
    }
}
