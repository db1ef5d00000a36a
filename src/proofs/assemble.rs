use log::debug;

use crate::error::{Error, Result};
use crate::root::{Root, Seqno};
use crate::skips::compute_skip_path;

/// A source of roots by seqno, typically backed by the network or local
/// storage.
pub trait RootSource {
    fn fetch_root(&self, seqno: Seqno) -> Result<Root>;
}

impl<T: RootSource + ?Sized> RootSource for &T {
    fn fetch_root(&self, seqno: Seqno) -> Result<Root> {
        (**self).fetch_root(seqno)
    }
}

/// Fetches the roots a client at `known` needs to check that `target` extends
/// it, in the order `compute_skip_path` gives them.
pub fn assemble_skips<S: RootSource + ?Sized>(
    source: &S,
    known: Seqno,
    target: Seqno,
) -> Result<Vec<Root>> {
    let seqnos = compute_skip_path(known, target);
    debug!(
        "assembling skip path {} -> {} ({} roots)",
        known,
        target,
        seqnos.len()
    );

    let mut roots = Vec::with_capacity(seqnos.len());
    for seqno in seqnos {
        let root = source.fetch_root(seqno)?;
        if root.seqno != seqno {
            return Err(Error::ConsistencyViolation(format!(
                "Requested root {}, got root {}",
                seqno, root.seqno
            )));
        }
        roots.push(root);
    }
    Ok(roots)
}
