use std::io::{Read, Write};

use ed::{Decode, Encode, Terminated};

use crate::encoding::{
    bytes_length, decode_exact, decode_with, decoding_error, encode_to_vec, read_bytes,
    write_bytes,
};
use crate::error::{Error, Result};

/// Identifies the schema of a leaf's serialized bytes.
///
/// Changing the layout of an existing leaf kind breaks every signature over
/// it, so layout changes get a new variant instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafType {
    Chain17v1,
}

impl LeafType {
    pub fn as_u16(self) -> u16 {
        match self {
            LeafType::Chain17v1 => 1,
        }
    }

    /// Parses a wire discriminant. Unrecognized values are an error, never a
    /// default.
    pub fn from_u16(raw: u16) -> Result<Self> {
        match raw {
            1 => Ok(LeafType::Chain17v1),
            other => Err(Error::UnknownLeafType(other)),
        }
    }
}

impl Encode for LeafType {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        self.as_u16().encode_into(dest)
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(2)
    }
}

impl Terminated for LeafType {}

/// A sigchain link leaf: the latest link of a team's signature chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain17v1Leaf {
    pub team_id: Vec<u8>,
    pub sig_id: Vec<u8>,
    pub link_id: Vec<u8>,
    pub seqno: u64,
}

impl Encode for Chain17v1Leaf {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        write_bytes(&self.team_id, dest)?;
        write_bytes(&self.sig_id, dest)?;
        write_bytes(&self.link_id, dest)?;
        self.seqno.encode_into(dest)
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(bytes_length(&self.team_id)
            + bytes_length(&self.sig_id)
            + bytes_length(&self.link_id)
            + 8)
    }
}

impl Decode for Chain17v1Leaf {
    fn decode<R: Read>(mut input: R) -> ed::Result<Self> {
        Ok(Chain17v1Leaf {
            team_id: read_bytes(&mut input)?,
            sig_id: read_bytes(&mut input)?,
            link_id: read_bytes(&mut input)?,
            seqno: Decode::decode(&mut input)?,
        })
    }
}

impl Terminated for Chain17v1Leaf {}

/// A directory leaf. Each variant has exactly one `LeafType` and one byte
/// layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Leaf {
    Chain17v1(Chain17v1Leaf),
}

impl Leaf {
    pub fn leaf_type(&self) -> LeafType {
        match self {
            Leaf::Chain17v1(_) => LeafType::Chain17v1,
        }
    }

    /// Produces the canonical bytes of the leaf, without its type tag.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        match self {
            Leaf::Chain17v1(leaf) => encode_to_vec(leaf),
        }
    }

    /// Decodes leaf bytes according to `leaf_type`. The bytes must be consumed
    /// exactly.
    pub fn deserialize(leaf_type: LeafType, bytes: &[u8]) -> Result<Self> {
        match leaf_type {
            LeafType::Chain17v1 => decode_exact(bytes).map(Leaf::Chain17v1),
        }
    }

    pub fn from_container(container: &LeafContainer) -> Result<Self> {
        Leaf::deserialize(container.leaf_type, &container.leaf_bytes)
    }
}

impl From<Chain17v1Leaf> for Leaf {
    fn from(leaf: Chain17v1Leaf) -> Self {
        Leaf::Chain17v1(leaf)
    }
}

/// Pairs serialized leaf bytes with the type that describes them, so the tree
/// can store heterogeneous leaves behind a single encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafContainer {
    leaf_type: LeafType,
    leaf_bytes: Vec<u8>,
}

impl LeafContainer {
    pub fn new(leaf_type: LeafType, leaf_bytes: Vec<u8>) -> Self {
        LeafContainer {
            leaf_type,
            leaf_bytes,
        }
    }

    #[inline]
    pub fn leaf_type(&self) -> LeafType {
        self.leaf_type
    }

    #[inline]
    pub fn leaf_bytes(&self) -> &[u8] {
        self.leaf_bytes.as_slice()
    }

    /// Encodes the container as `(u16 type, length-prefixed leaf bytes)`.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }

    /// Decodes a serialized container. Fails with `UnknownLeafType` if the tag
    /// is not one this crate knows how to read.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_with(bytes, |input| {
            let raw: u16 = Decode::decode(&mut *input).map_err(decoding_error)?;
            let leaf_type = LeafType::from_u16(raw)?;
            let leaf_bytes = read_bytes(input).map_err(decoding_error)?;
            Ok(LeafContainer::new(leaf_type, leaf_bytes))
        })
    }

    /// Consumes the container and decodes the leaf it carries.
    pub fn into_leaf(self) -> Result<Leaf> {
        Leaf::from_container(&self)
    }
}

impl Encode for LeafContainer {
    fn encode_into<W: Write>(&self, dest: &mut W) -> ed::Result<()> {
        self.leaf_type.encode_into(dest)?;
        write_bytes(&self.leaf_bytes, dest)
    }

    fn encoding_length(&self) -> ed::Result<usize> {
        Ok(2 + bytes_length(&self.leaf_bytes))
    }
}

/// Serializes `leaf` and wraps it with its type. Nothing is wrapped if
/// serialization fails.
pub fn export_leaf(leaf: &Leaf) -> Result<LeafContainer> {
    let bytes = leaf.serialize().map_err(|err| match err {
        Error::Serialization(msg) => {
            Error::Serialization(format!("failed to serialize leaf: {}", msg))
        }
        other => other,
    })?;
    Ok(LeafContainer::new(leaf.leaf_type(), bytes))
}
