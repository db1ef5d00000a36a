//! Skip pointer arithmetic.
//!
//! Every root at seqno `s` keeps hash links to `s-1, s-2, s-4, s-8, ...`, so
//! any two roots are connected by a path of `O(log(distance))` links. These
//! functions compute which links a root must carry and which roots a
//! consistency proof must walk through. They are pure and total: degenerate
//! inputs produce empty sequences rather than errors.

/// A sequence number identifying one state (root) of the directory.
pub type Seqno = i64;

/// Returns the seqnos a root at `s` must link to, in strictly decreasing
/// order. Empty for `s <= 1`.
///
/// ```
/// assert_eq!(skiplink::compute_skip_pointers(16), vec![15, 14, 12, 8]);
/// ```
pub fn compute_skip_pointers(s: Seqno) -> Vec<Seqno> {
    if s <= 1 {
        return vec![];
    }

    let mut skips = Vec::new();
    let mut r: Seqno = 1;
    let mut rem = s - r;
    while rem > 0 {
        skips.push(rem);
        rem -= r;
        r = r.saturating_mul(2);
    }
    skips
}

/// Returns the intermediate seqnos needed to walk from `end` back down to
/// `start`, in decreasing order, such that every hop (including the hop from
/// `end` to the first entry and from the last entry to `start`) follows a
/// skip pointer. Neither `start` nor `end` is included.
///
/// e.g. `start = 100, end = 2033` gives `[1009, 497, 241, 113, 105, 101]`.
pub fn compute_skip_path(start: Seqno, end: Seqno) -> Vec<Seqno> {
    if end <= start {
        return vec![];
    }

    // the distance always fits in a u64, even when it overflows i64
    let mut diff = end.wrapping_sub(start) as u64;
    let mut z: u64 = 1;
    let mut cur = start;
    let mut jumps = Vec::new();
    while diff > 0 {
        if diff & 1 == 1 {
            cur = cur.wrapping_add(z as Seqno);
            jumps.push(cur);
        }
        diff >>= 1;
        z = z.wrapping_shl(1);
    }

    // the last jump lands on `end`, which the caller already has
    jumps.pop();
    jumps.reverse();
    jumps
}

/// Returns the full descending chain `[end, path..., start]` a verifier walks
/// when checking hash links. Empty when `end <= start`.
pub fn skip_chain(start: Seqno, end: Seqno) -> Vec<Seqno> {
    if end <= start {
        return vec![];
    }

    let path = compute_skip_path(start, end);
    let mut chain = Vec::with_capacity(path.len() + 2);
    chain.push(end);
    chain.extend(path);
    chain.push(start);
    chain
}
