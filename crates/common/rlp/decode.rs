use bytes::Bytes;
use ethereum_types::{Address, H160, H256, U256};

use super::{
    constants::{RLP_EMPTY_LIST, RLP_NULL},
    error::RLPDecodeError,
};

/// Max payload size accepted when decoding. RLP itself allows any size, but
/// no well-formed message in this system carries payloads this big, so
/// larger values are either bugs or malicious.
const MAX_RLP_BYTES: usize = 1024 * 1024 * 1024;

/// Trait for types that can be deserialized from RLP.
///
/// Implementors provide [`decode_unfinished`](RLPDecode::decode_unfinished),
/// which returns the decoded value along with the bytes remaining after it.
/// Consumers normally call [`decode`](RLPDecode::decode), which additionally
/// rejects trailing bytes.
pub trait RLPDecode: Sized {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError>;

    fn decode(rlp: &[u8]) -> Result<Self, RLPDecodeError> {
        let (decoded, remaining) = Self::decode_unfinished(rlp)?;
        if !remaining.is_empty() {
            return Err(RLPDecodeError::InvalidLength);
        }
        Ok(decoded)
    }
}

impl RLPDecode for bool {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let first = rlp.first().ok_or(RLPDecodeError::InvalidLength)?;
        let value = match first {
            &RLP_NULL => false,
            0x01 => true,
            b => return Err(RLPDecodeError::MalformedBoolean(*b)),
        };
        Ok((value, &rlp[1..]))
    }
}

macro_rules! impl_decode_uint {
    ($t:ty) => {
        impl RLPDecode for $t {
            fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
                let (bytes, rest) = decode_bytes(rlp)?;
                let padded = static_left_pad(bytes)?;
                Ok((<$t>::from_be_bytes(padded), rest))
            }
        }
    };
}

impl_decode_uint!(u8);
impl_decode_uint!(u16);
impl_decode_uint!(u32);
impl_decode_uint!(u64);
impl_decode_uint!(usize);

impl<const N: usize> RLPDecode for [u8; N] {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let value = bytes
            .try_into()
            .map_err(|_| RLPDecodeError::InvalidLength)?;
        Ok((value, rest))
    }
}

impl RLPDecode for Bytes {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        Ok((Bytes::copy_from_slice(bytes), rest))
    }
}

impl RLPDecode for String {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let value =
            String::from_utf8(bytes.to_vec()).map_err(|_| RLPDecodeError::MalformedData)?;
        Ok((value, rest))
    }
}

impl RLPDecode for H256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (value, rest) = RLPDecode::decode_unfinished(rlp)?;
        Ok((H256(value), rest))
    }
}

impl RLPDecode for Address {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (value, rest) = RLPDecode::decode_unfinished(rlp)?;
        Ok((H160(value), rest))
    }
}

impl RLPDecode for U256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let padded: [u8; 32] = static_left_pad(bytes)?;
        Ok((U256::from_big_endian(&padded), rest))
    }
}

// A Vec<T> is a list of elements of the same type. Byte strings decode via
// Bytes or [u8; N] instead.
impl<T: RLPDecode> RLPDecode for Vec<T> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        if rlp.is_empty() {
            return Err(RLPDecodeError::InvalidLength);
        }
        if rlp[0] == RLP_EMPTY_LIST {
            return Ok((Vec::new(), &rlp[1..]));
        }

        let (is_list, payload, input_rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::UnexpectedString);
        }

        let mut result = Vec::new();
        let mut current = payload;
        while !current.is_empty() {
            let (item, rest) = T::decode_unfinished(current)?;
            result.push(item);
            current = rest;
        }
        Ok((result, input_rest))
    }
}

/// Decodes an RLP item prefix, returning whether the item is a list, its
/// payload without the prefix, and the remaining bytes after the item.
pub fn decode_rlp_item(data: &[u8]) -> Result<(bool, &[u8], &[u8]), RLPDecodeError> {
    let first_byte = *data.first().ok_or(RLPDecodeError::InvalidLength)?;

    match first_byte {
        0..=0x7f => Ok((false, &data[..1], &data[1..])),
        0x80..=0xb7 => {
            let length = (first_byte - 0x80) as usize;
            if data.len() < length + 1 {
                return Err(RLPDecodeError::InvalidLength);
            }
            Ok((false, &data[1..length + 1], &data[length + 1..]))
        }
        0xb8..=0xbf => {
            let (length, offset) = decode_long_length(data, first_byte - 0xb7)?;
            Ok((
                false,
                &data[offset..offset + length],
                &data[offset + length..],
            ))
        }
        RLP_EMPTY_LIST..=0xf7 => {
            let length = (first_byte - RLP_EMPTY_LIST) as usize;
            if data.len() < length + 1 {
                return Err(RLPDecodeError::InvalidLength);
            }
            Ok((true, &data[1..length + 1], &data[length + 1..]))
        }
        0xf8..=0xff => {
            let (length, offset) = decode_long_length(data, first_byte - 0xf7)?;
            Ok((
                true,
                &data[offset..offset + length],
                &data[offset + length..],
            ))
        }
    }
}

// Reads a multi-byte payload length. Returns (payload length, payload offset).
fn decode_long_length(data: &[u8], length_of_length: u8) -> Result<(usize, usize), RLPDecodeError> {
    let length_of_length = length_of_length as usize;
    if data.len() < length_of_length + 1 {
        return Err(RLPDecodeError::InvalidLength);
    }
    let length = usize::from_be_bytes(static_left_pad(&data[1..length_of_length + 1])?);
    if length > MAX_RLP_BYTES || data.len() < length_of_length + length + 1 {
        return Err(RLPDecodeError::InvalidLength);
    }
    Ok((length, length_of_length + 1))
}

/// Splits off the next RLP item, prefix included, returning it along with
/// the remaining bytes after it.
pub fn get_item_with_prefix(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (_, payload, rest) = decode_rlp_item(data)?;
    let item_len = data.len() - rest.len();
    debug_assert!(payload.len() <= item_len);
    Ok((&data[..item_len], rest))
}

/// Decodes the payload of a string item; rejects lists.
pub fn decode_bytes(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (is_list, payload, rest) = decode_rlp_item(data)?;
    if is_list {
        return Err(RLPDecodeError::UnexpectedList);
    }
    Ok((payload, rest))
}

/// Left-pads a big-endian integer payload with zeros to a fixed width.
/// Leading zeros in the payload are malformed (RLP integers are minimal).
#[inline]
pub fn static_left_pad<const N: usize>(data: &[u8]) -> Result<[u8; N], RLPDecodeError> {
    let mut result = [0; N];
    if data.is_empty() {
        return Ok(result);
    }
    if data[0] == 0 {
        return Err(RLPDecodeError::MalformedData);
    }
    if data.len() > N {
        return Err(RLPDecodeError::InvalidLength);
    }
    result[N - data.len()..].copy_from_slice(data);
    Ok(result)
}
