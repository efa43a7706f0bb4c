use bytes::{BufMut, Bytes};
use ethereum_types::{Address, H256, U256};

use super::constants::RLP_NULL;

/// Trait for types that can be serialized to RLP.
///
/// Implementors only need [`encode`](RLPEncode::encode); struct-shaped types
/// should go through [`Encoder`](crate::structs::Encoder) so the list prefix
/// is computed for them.
pub trait RLPEncode {
    fn encode(&self, buf: &mut dyn BufMut);

    /// Number of bytes [`encode`](RLPEncode::encode) will produce.
    fn length(&self) -> usize {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf.len()
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

impl RLPEncode for bool {
    #[inline(always)]
    fn encode(&self, buf: &mut dyn BufMut) {
        if *self {
            buf.put_u8(0x01);
        } else {
            buf.put_u8(RLP_NULL);
        }
    }

    #[inline(always)]
    fn length(&self) -> usize {
        1
    }
}

// Integers encode as their big-endian bytes with leading zeros dropped;
// zero is the empty string (0x80).
#[inline]
fn encode_integer_be<const N: usize>(value_be: [u8; N], buf: &mut dyn BufMut) {
    let mut i = 0;
    while i < N && value_be[i] == 0 {
        i += 1;
    }

    if i == N {
        buf.put_u8(RLP_NULL);
        return;
    }

    let first = value_be[i];
    if i == N - 1 && first <= 0x7f {
        buf.put_u8(first);
        return;
    }

    let len = N - i;
    buf.put_u8(RLP_NULL + len as u8);
    buf.put_slice(&value_be[i..]);
}

impl RLPEncode for u8 {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_integer_be(self.to_be_bytes(), buf);
    }
}

impl RLPEncode for u16 {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_integer_be(self.to_be_bytes(), buf);
    }
}

impl RLPEncode for u32 {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_integer_be(self.to_be_bytes(), buf);
    }
}

impl RLPEncode for u64 {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_integer_be(self.to_be_bytes(), buf);
    }
}

impl RLPEncode for usize {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_integer_be(self.to_be_bytes(), buf);
    }
}

impl RLPEncode for [u8] {
    #[inline(always)]
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.len() == 1 && self[0] < RLP_NULL {
            buf.put_u8(self[0]);
            return;
        }
        let len = self.len();
        if len < 56 {
            buf.put_u8(RLP_NULL + len as u8);
        } else {
            let be_len = len.to_be_bytes();
            let start = be_len.iter().position(|&x| x != 0).unwrap_or(0);
            buf.put_u8(0xb7 + (be_len.len() - start) as u8);
            buf.put_slice(&be_len[start..]);
        }
        buf.put_slice(self);
    }
}

impl<const N: usize> RLPEncode for [u8; N] {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_ref().encode(buf)
    }
}

impl RLPEncode for Bytes {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_ref().encode(buf)
    }
}

impl RLPEncode for str {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl RLPEncode for &str {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl RLPEncode for String {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl RLPEncode for H256 {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl RLPEncode for Address {
    #[inline]
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl RLPEncode for U256 {
    fn encode(&self, buf: &mut dyn BufMut) {
        let leading_zero_bytes = (self.leading_zeros() / 8) as usize;
        let bytes = self.to_big_endian();
        bytes[leading_zero_bytes..].encode(buf)
    }
}

impl<T: RLPEncode> RLPEncode for Vec<T> {
    #[inline(always)]
    fn encode(&self, buf: &mut dyn BufMut) {
        let payload_len: usize = self.iter().map(|item| item.length()).sum();
        encode_length(payload_len, buf);
        for item in self {
            item.encode(buf);
        }
    }
}

/// Writes the list prefix for a payload of `total_len` bytes.
#[inline]
pub fn encode_length(total_len: usize, buf: &mut dyn BufMut) {
    if total_len < 56 {
        buf.put_u8(0xc0 + total_len as u8);
    } else {
        let be_len = total_len.to_be_bytes();
        let start = be_len.iter().position(|&x| x != 0).unwrap_or(0);
        buf.put_u8(0xf7 + (be_len.len() - start) as u8);
        buf.put_slice(&be_len[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::RLPEncode;
    use bytes::Bytes;
    use ethereum_types::H256;
    use hex_literal::hex;

    #[test]
    fn encode_integers() {
        assert_eq!(0u64.encode_to_vec(), vec![0x80]);
        assert_eq!(1u64.encode_to_vec(), vec![0x01]);
        assert_eq!(0x7fu64.encode_to_vec(), vec![0x7f]);
        assert_eq!(0x80u64.encode_to_vec(), vec![0x81, 0x80]);
        assert_eq!(1024u64.encode_to_vec(), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn encode_strings() {
        assert_eq!("".encode_to_vec(), vec![0x80]);
        assert_eq!("dog".encode_to_vec(), vec![0x83, b'd', b'o', b'g']);
        let long = "a".repeat(60);
        let encoded = long.encode_to_vec();
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 60);
        assert_eq!(&encoded[2..], long.as_bytes());
    }

    #[test]
    fn encode_hash() {
        let hash = H256(hex!(
            "0102030405060708091011121314151617181920212223242526272829303132"
        ));
        let encoded = hash.encode_to_vec();
        assert_eq!(encoded[0], 0xa0);
        assert_eq!(&encoded[1..], hash.as_bytes());
    }

    #[test]
    fn encode_list() {
        let list = vec![Bytes::from_static(b"cat"), Bytes::from_static(b"dog")];
        assert_eq!(
            list.encode_to_vec(),
            vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );
        let empty: Vec<u64> = vec![];
        assert_eq!(empty.encode_to_vec(), vec![0xc0]);
    }
}
