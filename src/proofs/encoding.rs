use std::io::{Read, Write};

use ed::{Decode, Encode, Terminated};

use super::{Block, Path};
use crate::encoding::{
    bytes_length, decode_exact, encode_to_vec, optional_seq_length, read_bytes, read_hash,
    read_optional_seq, write_bytes, write_optional_seq,
};
use crate::error::Result;
use crate::hash::HASH_LENGTH;
use crate::root::Root;

impl Encode for Block {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        dest.write_all(&self.hash[..])?;
        write_bytes(&self.value, dest)
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(HASH_LENGTH + bytes_length(&self.value))
    }
}

impl Decode for Block {
    fn decode<R: Read>(mut input: R) -> ed::Result<Self> {
        Ok(Block {
            hash: read_hash(&mut input)?,
            value: read_bytes(&mut input)?,
        })
    }
}

impl Terminated for Block {}

impl Encode for Path {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        self.current_root.encode_into(dest)?;
        write_optional_seq(self.path.as_ref(), dest)?;
        write_optional_seq(self.skips.as_ref(), dest)
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(self.current_root.encoding_length()?
            + optional_seq_length(self.path.as_ref())?
            + optional_seq_length(self.skips.as_ref())?)
    }
}

impl Decode for Path {
    fn decode<R: Read>(mut input: R) -> ed::Result<Self> {
        let current_root: Root = Decode::decode(&mut input)?;
        let path = read_optional_seq(&mut input)?;
        let skips = read_optional_seq(&mut input)?;
        Ok(Path {
            current_root,
            path,
            skips,
        })
    }
}

impl Terminated for Path {}

impl Path {
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::root::{RootMetadata, Skips};

    fn root(seqno: i64) -> Root {
        let config = Config::default();
        let metadata = RootMetadata::new(&config, seqno, Skips::new(), [seqno as u8; HASH_LENGTH]);
        Root::new(&config, &metadata, 1000 * seqno).unwrap()
    }

    #[test]
    fn encode_block() {
        let block = Block::new([5; HASH_LENGTH], vec![1, 2]);
        let mut bytes = vec![];
        block.encode_into(&mut bytes).unwrap();

        let mut expected = vec![5; HASH_LENGTH];
        expected.extend_from_slice(&[0, 0, 0, 2, 1, 2]);
        assert_eq!(bytes, expected);
        assert_eq!(block.encoding_length().unwrap(), bytes.len());
    }

    #[test]
    fn path_without_optional_parts() {
        let path = Path::new(root(3), None, None);
        let bytes = path.encode().unwrap();
        assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);
        assert_eq!(Path::decode(&bytes).unwrap(), path);
    }

    #[test]
    fn path_with_empty_parts() {
        let path = Path::new(root(3), Some(vec![]), Some(vec![]));
        let bytes = path.encode().unwrap();
        assert_eq!(Path::decode(&bytes).unwrap(), path);
        assert_ne!(
            bytes,
            Path::new(root(3), None, None).encode().unwrap()
        );
    }

    #[test]
    fn path_round_trip() {
        let path = Path::new(
            root(103),
            Some(vec![
                Block::new([1; HASH_LENGTH], vec![1, 2, 3]),
                Block::new([2; HASH_LENGTH], vec![]),
            ]),
            Some(vec![root(101)]),
        );
        let bytes = path.encode().unwrap();
        assert_eq!(path.encoding_length().unwrap(), bytes.len());
        assert_eq!(Path::decode(&bytes).unwrap(), path);
    }

    #[test]
    fn decode_bad_presence_byte() {
        let mut bytes = Path::new(root(3), None, None).encode().unwrap();
        let len = bytes.len();
        bytes[len - 1] = 7;
        assert!(Path::decode(&bytes).unwrap_err().is_decoding());
    }

    #[test]
    fn decode_truncated() {
        let bytes = Path::new(root(3), Some(vec![]), None).encode().unwrap();
        assert!(Path::decode(&bytes[..bytes.len() - 1]).unwrap_err().is_decoding());
    }
}
