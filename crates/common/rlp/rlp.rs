//! # golembase-rlp
//!
//! Recursive Length Prefix (RLP) encoding and decoding for the GolemBase
//! entity store.
//!
//! RLP is the canonical serialization for everything the store keeps
//! on-chain: entity payloads, annotation pairs, and the storage-update
//! transaction body.
//!
//! ## Core Traits
//!
//! - [`encode::RLPEncode`]: types that can be RLP-encoded
//! - [`decode::RLPDecode`]: types that can be RLP-decoded
//!
//! ## Builder Structs
//!
//! Struct-shaped types encode as lists, field by field:
//!
//! - [`structs::Encoder`]: fluent API for encoding structs
//! - [`structs::Decoder`]: fluent API for decoding structs with error context
//!
//! ```rust
//! use golembase_rlp::{
//!     decode::RLPDecode,
//!     encode::RLPEncode,
//!     error::RLPDecodeError,
//!     structs::{Decoder, Encoder},
//! };
//! use bytes::BufMut;
//!
//! struct Pair {
//!     key: String,
//!     value: u64,
//! }
//!
//! impl RLPEncode for Pair {
//!     fn encode(&self, buf: &mut dyn BufMut) {
//!         Encoder::new(buf)
//!             .encode_field(&self.key)
//!             .encode_field(&self.value)
//!             .finish();
//!     }
//! }
//!
//! impl RLPDecode for Pair {
//!     fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
//!         let decoder = Decoder::new(rlp)?;
//!         let (key, decoder) = decoder.decode_field("key")?;
//!         let (value, decoder) = decoder.decode_field("value")?;
//!         Ok((Self { key, value }, decoder.finish()?))
//!     }
//! }
//! ```

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod structs;
