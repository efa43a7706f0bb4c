use bytes::Bytes;
use ethereum_types::{Address, H256};
use golembase_rlp::{
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    structs::{Decoder, Encoder},
};
use serde::{Deserialize, Serialize};

/// 32-byte identifier of an entity, derived from the creating transaction.
pub type EntityKey = H256;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringAnnotation {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericAnnotation {
    pub key: String,
    pub value: u64,
}

/// Canonical on-chain record of a live entity. This is what the entity's
/// blob decodes to; all secondary indices are derived from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivePayload {
    pub owner: Address,
    pub expires_at_block: u64,
    pub payload: Bytes,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

impl RLPEncode for StringAnnotation {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.key)
            .encode_field(&self.value)
            .finish();
    }
}

impl RLPDecode for StringAnnotation {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (key, decoder) = decoder.decode_field("key")?;
        let (value, decoder) = decoder.decode_field("value")?;
        Ok((Self { key, value }, decoder.finish()?))
    }
}

impl RLPEncode for NumericAnnotation {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.key)
            .encode_field(&self.value)
            .finish();
    }
}

impl RLPDecode for NumericAnnotation {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (key, decoder) = decoder.decode_field("key")?;
        let (value, decoder) = decoder.decode_field("value")?;
        Ok((Self { key, value }, decoder.finish()?))
    }
}

impl RLPEncode for ActivePayload {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.owner)
            .encode_field(&self.expires_at_block)
            .encode_field(&self.payload)
            .encode_field(&self.string_annotations)
            .encode_field(&self.numeric_annotations)
            .finish();
    }
}

impl RLPDecode for ActivePayload {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (owner, decoder) = decoder.decode_field("owner")?;
        let (expires_at_block, decoder) = decoder.decode_field("expires_at_block")?;
        let (payload, decoder) = decoder.decode_field("payload")?;
        let (string_annotations, decoder) = decoder.decode_field("string_annotations")?;
        let (numeric_annotations, decoder) = decoder.decode_field("numeric_annotations")?;
        Ok((
            Self {
                owner,
                expires_at_block,
                payload,
                string_annotations,
                numeric_annotations,
            },
            decoder.finish()?,
        ))
    }
}
