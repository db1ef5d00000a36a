//! Positional byte codec shared by every record type.
//!
//! Integers use `ed`'s fixed-width big-endian encoding, byte strings carry a
//! `u32` length prefix and sequences a `u32` count. There are no field tags, so field order
//! is part of each record's schema.

use std::convert::TryFrom;
use std::io::{self, Read, Write};

use ed::{Decode, Encode};

use crate::error::{Error, Result};
use crate::hash::{Hash, HASH_LENGTH};

/// Upper bound on any length-prefixed byte string, checked on both encode and
/// decode.
pub const MAX_BYTES_LENGTH: usize = 1 << 24;

// caps preallocation for counts read off the wire
const MAX_PREALLOCATE: usize = 1024;

pub(crate) fn invalid_data(message: String) -> ed::Error {
    io::Error::new(io::ErrorKind::InvalidData, message).into()
}

pub(crate) fn decoding_error(err: ed::Error) -> Error {
    Error::Decoding(err.to_string())
}

pub(crate) fn serialization_error(err: ed::Error) -> Error {
    Error::Serialization(err.to_string())
}

pub(crate) fn read_hash<R: Read>(input: &mut R) -> ed::Result<Hash> {
    let mut hash = [0; HASH_LENGTH];
    input.read_exact(&mut hash)?;
    Ok(hash)
}

pub(crate) fn write_bytes<W: Write>(bytes: &[u8], out: &mut W) -> ed::Result<()> {
    if bytes.len() > MAX_BYTES_LENGTH {
        return Err(invalid_data(format!(
            "Byte string of length {} exceeds maximum of {}",
            bytes.len(),
            MAX_BYTES_LENGTH
        )));
    }
    // bounded above, cannot truncate
    (bytes.len() as u32).encode_into(out)?;
    out.write_all(bytes)?;
    Ok(())
}

pub(crate) fn read_bytes<R: Read>(input: &mut R) -> ed::Result<Vec<u8>> {
    let len: u32 = Decode::decode(&mut *input)?;
    let len = len as usize;
    if len > MAX_BYTES_LENGTH {
        return Err(invalid_data(format!(
            "Byte string of length {} exceeds maximum of {}",
            len, MAX_BYTES_LENGTH
        )));
    }
    let mut bytes = vec![0; len];
    input.read_exact(bytes.as_mut_slice())?;
    Ok(bytes)
}

#[inline]
pub(crate) fn bytes_length(bytes: &[u8]) -> usize {
    4 + bytes.len()
}

pub(crate) fn write_count<W: Write>(count: usize, out: &mut W) -> ed::Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| invalid_data(format!("Sequence of length {} is too long", count)))?;
    count.encode_into(out)
}

/// Reads a `u32` element count and returns it along with a vector sized for
/// it, without trusting the count for allocation.
pub(crate) fn read_count<R: Read, T>(input: &mut R) -> ed::Result<(usize, Vec<T>)> {
    let count: u32 = Decode::decode(&mut *input)?;
    let count = count as usize;
    Ok((count, Vec::with_capacity(count.min(MAX_PREALLOCATE))))
}

pub(crate) fn write_seq<W: Write, T: Encode>(items: &[T], out: &mut W) -> ed::Result<()> {
    write_count(items.len(), out)?;
    for item in items {
        item.encode_into(out)?;
    }
    Ok(())
}

pub(crate) fn read_seq<R: Read, T: Decode>(input: &mut R) -> ed::Result<Vec<T>> {
    let (count, mut items) = read_count(input)?;
    for _ in 0..count {
        items.push(T::decode(&mut *input)?);
    }
    Ok(items)
}

pub(crate) fn seq_length<T: Encode>(items: &[T]) -> ed::Result<usize> {
    let mut length = 4;
    for item in items {
        length += item.encoding_length()?;
    }
    Ok(length)
}

pub(crate) fn write_optional_seq<W: Write, T: Encode>(
    items: Option<&Vec<T>>,
    out: &mut W,
) -> ed::Result<()> {
    match items {
        None => out.write_all(&[0])?,
        Some(items) => {
            out.write_all(&[1])?;
            write_seq(items, out)?;
        }
    }
    Ok(())
}

pub(crate) fn read_optional_seq<R: Read, T: Decode>(input: &mut R) -> ed::Result<Option<Vec<T>>> {
    let present: u8 = Decode::decode(&mut *input)?;
    match present {
        0 => Ok(None),
        1 => Ok(Some(read_seq(input)?)),
        byte => Err(ed::Error::UnexpectedByte(byte)),
    }
}

pub(crate) fn optional_seq_length<T: Encode>(items: Option<&Vec<T>>) -> ed::Result<usize> {
    Ok(1 + match items {
        None => 0,
        Some(items) => seq_length(items)?,
    })
}

/// Encodes `value` into a freshly allocated buffer.
pub(crate) fn encode_to_vec<T: Encode>(value: &T) -> Result<Vec<u8>> {
    let length = value.encoding_length().map_err(serialization_error)?;
    let mut bytes = Vec::with_capacity(length);
    value
        .encode_into(&mut bytes)
        .map_err(serialization_error)?;
    Ok(bytes)
}

/// Runs `decode` over `bytes` and fails if it leaves anything unread.
pub(crate) fn decode_with<T, F>(bytes: &[u8], decode: F) -> Result<T>
where
    F: FnOnce(&mut &[u8]) -> Result<T>,
{
    let mut input = bytes;
    let value = decode(&mut input)?;
    if !input.is_empty() {
        return Err(Error::Decoding(format!(
            "{} trailing bytes after decoding",
            input.len()
        )));
    }
    Ok(value)
}

/// Decodes a `T` which must span all of `bytes`.
pub(crate) fn decode_exact<T: Decode>(bytes: &[u8]) -> Result<T> {
    decode_with(bytes, |input| T::decode(input).map_err(decoding_error))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bytes_are_length_prefixed() {
        let mut out = vec![];
        write_bytes(&[7, 8, 9], &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 0, 3, 7, 8, 9]);
        assert_eq!(bytes_length(&[7, 8, 9]), out.len());

        let mut input = out.as_slice();
        assert_eq!(read_bytes(&mut input).unwrap(), vec![7, 8, 9]);
        assert!(input.is_empty());
    }

    #[test]
    fn oversized_length_prefix() {
        let bytes = [0xff, 0xff, 0xff, 0xff];
        let mut input = &bytes[..];
        assert!(read_bytes(&mut input).is_err());
    }

    #[test]
    fn short_byte_string() {
        let bytes = [0, 0, 0, 4, 1, 2];
        let mut input = &bytes[..];
        assert!(read_bytes(&mut input).is_err());
    }

    #[test]
    fn sequences_are_counted() {
        let mut out = vec![];
        write_seq(&[-2i64, 258], &mut out).unwrap();
        assert_eq!(
            out,
            vec![
                0, 0, 0, 2, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0, 0, 0, 0, 0, 0, 1,
                2
            ]
        );
        assert_eq!(seq_length(&[-2i64, 258]).unwrap(), out.len());

        let mut input = out.as_slice();
        let items: Vec<i64> = read_seq(&mut input).unwrap();
        assert_eq!(items, vec![-2, 258]);
        assert!(input.is_empty());
    }

    #[test]
    fn truncated_count() {
        let mut input = &[0u8, 0, 1][..];
        let res: ed::Result<Vec<i64>> = read_seq(&mut input);
        assert!(res.is_err());
    }

    #[test]
    fn optional_seq_presence_byte() {
        let mut input = &[2u8][..];
        let res: ed::Result<Option<Vec<u8>>> = read_optional_seq(&mut input);
        assert!(res.is_err());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let res = decode_with(&[1, 2], |input| {
            let byte: u8 = Decode::decode(&mut *input).map_err(decoding_error)?;
            Ok(byte)
        });
        assert!(res.unwrap_err().is_decoding());
    }
}
