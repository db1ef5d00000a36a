use std::io::{Read, Write};
use std::iter::FromIterator;

use ed::{Decode, Encode, Terminated};
use log::trace;

use crate::blind::EncodingType;
use crate::config::Config;
use crate::encoding::{
    bytes_length, decode_exact, decode_with, decoding_error, encode_to_vec, invalid_data,
    read_bytes, read_count, read_hash, write_bytes, write_count,
};
use crate::error::{Error, Result};
use crate::hash::{Hash, HASH_LENGTH};
pub use crate::skips::Seqno;
use crate::skips::compute_skip_pointers;

/// The skip links of one root: the `hash_meta` of each earlier root it points
/// to, kept sorted by seqno so the encoding is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Skips(Vec<(Seqno, Hash)>);

impl Skips {
    pub fn new() -> Self {
        Skips(Vec::new())
    }

    /// Builds the links a root at `seqno` must carry, asking `hash_of` for the
    /// `hash_meta` of each target.
    pub fn for_seqno<F>(seqno: Seqno, mut hash_of: F) -> Result<Self>
    where
        F: FnMut(Seqno) -> Result<Hash>,
    {
        let mut skips = Skips::new();
        for target in compute_skip_pointers(seqno) {
            skips.insert(target, hash_of(target)?);
        }
        Ok(skips)
    }

    /// Inserts a link, returning the hash it replaced (if any).
    pub fn insert(&mut self, seqno: Seqno, hash: Hash) -> Option<Hash> {
        match self.0.binary_search_by_key(&seqno, |(s, _)| *s) {
            Ok(i) => Some(std::mem::replace(&mut self.0[i].1, hash)),
            Err(i) => {
                self.0.insert(i, (seqno, hash));
                None
            }
        }
    }

    pub fn get(&self, seqno: Seqno) -> Option<&Hash> {
        self.0
            .binary_search_by_key(&seqno, |(s, _)| *s)
            .ok()
            .map(|i| &self.0[i].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the links in ascending seqno order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Seqno, Hash)> {
        self.0.iter()
    }

    /// Returns the linked seqnos in ascending order.
    pub fn seqnos(&self) -> Vec<Seqno> {
        self.0.iter().map(|(seqno, _)| *seqno).collect()
    }
}

impl FromIterator<(Seqno, Hash)> for Skips {
    fn from_iter<I: IntoIterator<Item = (Seqno, Hash)>>(iter: I) -> Self {
        let mut skips = Skips::new();
        for (seqno, hash) in iter {
            skips.insert(seqno, hash);
        }
        skips
    }
}

impl Encode for Skips {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        write_count(self.0.len(), dest)?;
        for (seqno, hash) in self.0.iter() {
            seqno.encode_into(dest)?;
            dest.write_all(&hash[..])?;
        }
        Ok(())
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(4 + self.0.len() * (8 + HASH_LENGTH))
    }
}

impl Decode for Skips {
    fn decode<R: Read>(mut input: R) -> ed::Result<Self> {
        let (count, mut entries): (usize, Vec<(Seqno, Hash)>) = read_count(&mut input)?;
        for _ in 0..count {
            let seqno: Seqno = Decode::decode(&mut input)?;
            let hash = read_hash(&mut input)?;
            if let Some((prev, _)) = entries.last() {
                if seqno <= *prev {
                    return Err(invalid_data(format!(
                        "Skip seqnos must be strictly increasing, got {} after {}",
                        seqno, prev
                    )));
                }
            }
            entries.push((seqno, hash));
        }
        Ok(Skips(entries))
    }
}

impl Terminated for Skips {}

/// The signed summary of one directory state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootMetadata {
    pub encoding_type: EncodingType,
    pub seqno: Seqno,
    /// Includes the link to the previous root.
    pub skips: Skips,
    pub root_hash: Hash,
}

impl RootMetadata {
    /// Creates metadata declaring the configured encoding type.
    pub fn new(config: &Config, seqno: Seqno, skips: Skips, root_hash: Hash) -> Self {
        RootMetadata {
            encoding_type: config.encoding_type,
            seqno,
            skips,
            root_hash,
        }
    }

    /// Checks that the skip map links to exactly the seqnos a root at this
    /// seqno must point to.
    pub fn check_skips(&self) -> Result<()> {
        let mut expected = compute_skip_pointers(self.seqno);
        expected.reverse();

        let actual = self.skips.seqnos();
        if actual != expected {
            return Err(Error::ConsistencyViolation(format!(
                "Root {} links to {:?}, expected {:?}",
                self.seqno, actual, expected
            )));
        }
        Ok(())
    }

    /// Returns the hash this root records for the earlier root at `seqno`.
    pub fn skip_to(&self, seqno: Seqno) -> Result<&Hash> {
        self.skips.get(seqno).ok_or_else(|| {
            Error::ConsistencyViolation(format!(
                "Root {} has no skip link to {}",
                self.seqno, seqno
            ))
        })
    }

    /// The canonical bytes roots sign over.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_with(bytes, |input| {
            let raw: u8 = Decode::decode(&mut *input).map_err(decoding_error)?;
            let encoding_type = EncodingType::from_u8(raw)?;
            let seqno: Seqno = Decode::decode(&mut *input).map_err(decoding_error)?;
            let skips = Skips::decode(&mut *input).map_err(decoding_error)?;
            let root_hash = read_hash(input).map_err(decoding_error)?;
            Ok(RootMetadata {
                encoding_type,
                seqno,
                skips,
                root_hash,
            })
        })
    }
}

impl Encode for RootMetadata {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        self.encoding_type.encode_into(dest)?;
        self.seqno.encode_into(dest)?;
        self.skips.encode_into(dest)?;
        dest.write_all(&self.root_hash[..])?;
        Ok(())
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(1 + 8 + self.skips.encoding_length()? + HASH_LENGTH)
    }
}

/// A signed directory state as handed out to clients.
///
/// There is no plain hash of a root. `hash_meta` is the only hash, and it is
/// what later roots link to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    pub seqno: Seqno,
    /// Creation time, in milliseconds since the Unix epoch.
    pub ctime: i64,
    pub hash_meta: Hash,
    pub metadata: Vec<u8>,
}

impl Root {
    /// Encodes `metadata` and hashes it into a new root.
    pub fn new(config: &Config, metadata: &RootMetadata, ctime: i64) -> Result<Self> {
        let bytes = metadata.encode()?;
        let hash_meta = config.hash(&bytes);
        trace!(
            "root {}: hash_meta={}",
            metadata.seqno,
            hex::encode(&hash_meta[..8])
        );
        Ok(Root {
            seqno: metadata.seqno,
            ctime,
            hash_meta,
            metadata: bytes,
        })
    }

    /// Like `new`, stamped with the current time.
    #[cfg(feature = "full")]
    pub fn now(config: &Config, metadata: &RootMetadata) -> Result<Self> {
        let now = time::get_time();
        let ctime = now.sec * 1000 + i64::from(now.nsec) / 1_000_000;
        Root::new(config, metadata, ctime)
    }

    /// Decodes the embedded metadata, which must describe this root's seqno.
    pub fn metadata(&self) -> Result<RootMetadata> {
        let metadata = RootMetadata::decode(&self.metadata)?;
        if metadata.seqno != self.seqno {
            return Err(Error::ConsistencyViolation(format!(
                "Root {} carries metadata for seqno {}",
                self.seqno, metadata.seqno
            )));
        }
        Ok(metadata)
    }

    /// Checks that `hash_meta` is the hash of the embedded metadata bytes.
    pub fn check_hash_meta(&self, config: &Config) -> Result<()> {
        let actual = config.hash(&self.metadata);
        if actual != self.hash_meta {
            return Err(Error::ConsistencyViolation(format!(
                "Root {} hash_meta mismatch\n\tExpected: {}\n\tActual: {}",
                self.seqno,
                hex::encode(self.hash_meta),
                hex::encode(actual)
            )));
        }
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes)
    }
}

impl Encode for Root {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        self.seqno.encode_into(dest)?;
        self.ctime.encode_into(dest)?;
        dest.write_all(&self.hash_meta[..])?;
        write_bytes(&self.metadata, dest)
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(8 + 8 + HASH_LENGTH + bytes_length(&self.metadata))
    }
}

impl Decode for Root {
    fn decode<R: Read>(mut input: R) -> ed::Result<Self> {
        Ok(Root {
            seqno: Decode::decode(&mut input)?,
            ctime: Decode::decode(&mut input)?,
            hash_meta: read_hash(&mut input)?,
            metadata: read_bytes(&mut input)?,
        })
    }
}

impl Terminated for Root {}
