use log::{debug, warn};

use super::Path;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::root::{Root, RootMetadata, Seqno};
use crate::skips::compute_skip_path;

/// Checks the signature on a root. Roots are only trusted after this passes.
pub trait SignatureVerifier {
    fn verify_signature(&self, root: &Root) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&Root) -> bool,
{
    fn verify_signature(&self, root: &Root) -> bool {
        self(root)
    }
}

fn violation(message: String) -> Error {
    warn!("{}", message);
    Error::ConsistencyViolation(message)
}

// signature first, then the metadata it covers
fn check_root<V: SignatureVerifier + ?Sized>(
    config: &Config,
    verifier: &V,
    root: &Root,
) -> Result<RootMetadata> {
    if !verifier.verify_signature(root) {
        warn!("signature check failed for root {}", root.seqno);
        return Err(Error::InvalidSignature(root.seqno));
    }
    root.check_hash_meta(config)?;
    let metadata = root.metadata()?;
    metadata.check_skips()?;
    Ok(metadata)
}

/// Verifies that `target` is a valid extension of `known`.
///
/// `skips` must be exactly the roots at `compute_skip_path(known.seqno,
/// target.seqno)`, in order. Every root, `known` and `target` included, must
/// pass the signature check and carry metadata matching its `hash_meta`, and
/// every root in the chain `[target, skips.., known]` must record the
/// `hash_meta` of the next one in its skip map.
pub fn verify_skips<V: SignatureVerifier + ?Sized>(
    config: &Config,
    verifier: &V,
    known: &Root,
    skips: &[Root],
    target: &Root,
) -> Result<()> {
    if target.seqno < known.seqno {
        return Err(violation(format!(
            "Target root {} is older than known root {}",
            target.seqno, known.seqno
        )));
    }

    if target.seqno == known.seqno {
        if !skips.is_empty() {
            return Err(violation(format!(
                "Expected no skip roots between {} and itself, got {}",
                known.seqno,
                skips.len()
            )));
        }
        check_root(config, verifier, target)?;
        if target.hash_meta != known.hash_meta {
            return Err(violation(format!(
                "Two different roots for seqno {}",
                known.seqno
            )));
        }
        return Ok(());
    }

    let expected = compute_skip_path(known.seqno, target.seqno);
    let actual: Vec<Seqno> = skips.iter().map(|root| root.seqno).collect();
    if actual != expected {
        return Err(violation(format!(
            "Skip roots {:?} do not match skip path {:?}",
            actual, expected
        )));
    }

    let mut later = check_root(config, verifier, target)?;
    for earlier in skips.iter().chain(std::iter::once(known)) {
        let metadata = check_root(config, verifier, earlier)?;
        let link = later.skip_to(earlier.seqno)?;
        if link != &earlier.hash_meta {
            return Err(violation(format!(
                "Root {} links to {} with hash {}, but its hash_meta is {}",
                later.seqno,
                earlier.seqno,
                hex::encode(link),
                hex::encode(earlier.hash_meta)
            )));
        }
        later = metadata;
    }

    debug!(
        "verified root {} extends root {} via {} skips",
        target.seqno,
        known.seqno,
        skips.len()
    );
    Ok(())
}

impl Path {
    /// Verifies that `current_root` extends `known` using the skip roots this
    /// path carries.
    pub fn verify_consistency<V: SignatureVerifier + ?Sized>(
        &self,
        config: &Config,
        verifier: &V,
        known: &Root,
    ) -> Result<()> {
        let skips = self.skips.as_ref().ok_or_else(|| {
            violation(format!(
                "Path for root {} carries no skip roots",
                self.current_root.seqno
            ))
        })?;
        verify_skips(config, verifier, known, skips, &self.current_root)
    }
}
