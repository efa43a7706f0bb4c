use bytes::BufMut;

use super::{
    decode::{RLPDecode, decode_rlp_item},
    encode::{RLPEncode, encode_length},
    error::RLPDecodeError,
};

/// # Struct decoding helper
///
/// Decodes a struct that was encoded as an RLP list, one field at a time in
/// declaration order. Each field must implement [`RLPDecode`].
#[derive(Debug)]
#[must_use = "`Decoder` must be consumed with `finish` to perform decoding checks"]
pub struct Decoder<'a> {
    payload: &'a [u8],
    remaining: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, RLPDecodeError> {
        match decode_rlp_item(buf)? {
            (true, payload, remaining) => Ok(Self { payload, remaining }),
            (false, _, _) => Err(RLPDecodeError::UnexpectedString),
        }
    }

    pub fn decode_field<T: RLPDecode>(self, name: &str) -> Result<(T, Self), RLPDecodeError> {
        let (field, rest) = <T as RLPDecode>::decode_unfinished(self.payload)
            .map_err(|err| field_decode_error::<T>(name, err))?;
        Ok((
            field,
            Self {
                payload: rest,
                ..self
            },
        ))
    }

    /// Returns `Some(field)` if there is a field left to decode, `None`
    /// otherwise. Used for optional trailing fields.
    pub fn decode_optional_field<T: RLPDecode>(self) -> (Option<T>, Self) {
        match <T as RLPDecode>::decode_unfinished(self.payload) {
            Ok((field, rest)) => (
                Some(field),
                Self {
                    payload: rest,
                    ..self
                },
            ),
            Err(_) => (None, self),
        }
    }

    /// Finishes decoding the struct and returns the bytes after the item.
    /// Errors if any of the item's payload was left undecoded.
    pub const fn finish(self) -> Result<&'a [u8], RLPDecodeError> {
        if self.payload.is_empty() {
            Ok(self.remaining)
        } else {
            Err(RLPDecodeError::MalformedData)
        }
    }

    /// Returns true if all fields of the item have been decoded.
    pub const fn is_done(&self) -> bool {
        self.payload.is_empty()
    }
}

fn field_decode_error<T>(field_name: &str, err: RLPDecodeError) -> RLPDecodeError {
    let typ = std::any::type_name::<T>();
    RLPDecodeError::Custom(format!(
        "Error decoding field '{field_name}' of type {typ}: {err}"
    ))
}

/// # Struct encoding helper
///
/// Encodes a struct as an RLP list, one field at a time in declaration
/// order. Each field must implement [`RLPEncode`].
#[must_use = "`Encoder` must be consumed with `finish` to perform the encoding"]
pub struct Encoder<'a> {
    buf: &'a mut dyn BufMut,
    temp_buf: Vec<u8>,
}

impl core::fmt::Debug for Encoder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Encoder")
            .field("buf", &"...")
            .field("temp_buf", &self.temp_buf)
            .finish()
    }
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut dyn BufMut) -> Self {
        Self {
            buf,
            temp_buf: Default::default(),
        }
    }

    /// Stores a field to be encoded.
    pub fn encode_field<T: RLPEncode>(mut self, value: &T) -> Self {
        <T as RLPEncode>::encode(value, &mut self.temp_buf);
        self
    }

    /// Stores a field to be encoded as a byte string. Bypasses the list
    /// interpretation a `Vec<u8>` would otherwise get.
    pub fn encode_bytes(mut self, value: &[u8]) -> Self {
        <[u8] as RLPEncode>::encode(value, &mut self.temp_buf);
        self
    }

    /// Finishes encoding the struct and writes the result to the buffer.
    pub fn finish(self) {
        encode_length(self.temp_buf.len(), self.buf);
        self.buf.put_slice(&self.temp_buf);
    }
}
