use bytes::Bytes;
use ethereum_types::{Address, H256};
use golembase_rlp::{
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    structs::{Decoder, Encoder},
};
use keccak_hash::keccak;
use serde::{Deserialize, Serialize};

use super::{EntityKey, NumericAnnotation, StringAnnotation};

lazy_static::lazy_static! {
    /// topic0 of the log emitted for every entity created by a storage
    /// transaction; topic1 is the entity key, data the expiry block.
    pub static ref GOLEM_BASE_STORAGE_ENTITY_CREATED: H256 =
        keccak("GolemBaseStorageEntityCreated(uint256,uint256)");
    /// topic0 of the log emitted for every entity updated in place.
    pub static ref GOLEM_BASE_STORAGE_ENTITY_UPDATED: H256 =
        keccak("GolemBaseStorageEntityUpdated(uint256,uint256)");
    /// topic0 of the log emitted when an entity is removed, either by a
    /// storage transaction or by housekeeping.
    pub static ref GOLEM_BASE_STORAGE_ENTITY_DELETED: H256 =
        keccak("GolemBaseStorageEntityDeleted(uint256)");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxType {
    /// User-facing storage-update transaction; its data field carries an
    /// RLP [`StorageTransaction`].
    StorageUpdate = 0x60,
    /// Consensus-injected housekeeping signal, one per block, no payload.
    Housekeeping = 0x61,
}

/// The narrow view of a transaction the entity store consumes. The host
/// chain owns the full envelope (signatures, gas, nonce); none of that
/// reaches the executors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: H256,
    pub from: Address,
    pub tx_type: TxType,
    pub data: Bytes,
}

/// Decoded body of a storage-update transaction: three ordered op lists,
/// executed as all creates, then all updates, then all deletes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageTransaction {
    pub create: Vec<Create>,
    pub update: Vec<Update>,
    pub delete: Vec<EntityKey>,
}

/// A single create op. `expires_at_block` is absolute, `btl` is relative to
/// the executing block; exactly one of the two is expected to be non-zero
/// and `btl` wins when both are set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Create {
    pub payload: Bytes,
    pub expires_at_block: u64,
    pub btl: u64,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

/// A single update op: the named entity is atomically replaced, keeping its
/// key. Expiry fields behave as in [`Create`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Update {
    pub entity_key: EntityKey,
    pub payload: Bytes,
    pub expires_at_block: u64,
    pub btl: u64,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

impl RLPEncode for Create {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.payload)
            .encode_field(&self.expires_at_block)
            .encode_field(&self.btl)
            .encode_field(&self.string_annotations)
            .encode_field(&self.numeric_annotations)
            .finish();
    }
}

impl RLPDecode for Create {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (payload, decoder) = decoder.decode_field("payload")?;
        let (expires_at_block, decoder) = decoder.decode_field("expires_at_block")?;
        let (btl, decoder) = decoder.decode_field("btl")?;
        let (string_annotations, decoder) = decoder.decode_field("string_annotations")?;
        let (numeric_annotations, decoder) = decoder.decode_field("numeric_annotations")?;
        Ok((
            Self {
                payload,
                expires_at_block,
                btl,
                string_annotations,
                numeric_annotations,
            },
            decoder.finish()?,
        ))
    }
}

impl RLPEncode for Update {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.entity_key)
            .encode_field(&self.payload)
            .encode_field(&self.expires_at_block)
            .encode_field(&self.btl)
            .encode_field(&self.string_annotations)
            .encode_field(&self.numeric_annotations)
            .finish();
    }
}

impl RLPDecode for Update {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (entity_key, decoder) = decoder.decode_field("entity_key")?;
        let (payload, decoder) = decoder.decode_field("payload")?;
        let (expires_at_block, decoder) = decoder.decode_field("expires_at_block")?;
        let (btl, decoder) = decoder.decode_field("btl")?;
        let (string_annotations, decoder) = decoder.decode_field("string_annotations")?;
        let (numeric_annotations, decoder) = decoder.decode_field("numeric_annotations")?;
        Ok((
            Self {
                entity_key,
                payload,
                expires_at_block,
                btl,
                string_annotations,
                numeric_annotations,
            },
            decoder.finish()?,
        ))
    }
}

impl RLPEncode for StorageTransaction {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.create)
            .encode_field(&self.update)
            .encode_field(&self.delete)
            .finish();
    }
}

impl RLPDecode for StorageTransaction {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (create, decoder) = decoder.decode_field("create")?;
        let (update, decoder) = decoder.decode_field("update")?;
        let (delete, decoder) = decoder.decode_field("delete")?;
        Ok((
            Self {
                create,
                update,
                delete,
            },
            decoder.finish()?,
        ))
    }
}

impl Transaction {
    pub fn storage_update(hash: H256, from: Address, body: &StorageTransaction) -> Self {
        Self {
            hash,
            from,
            tx_type: TxType::StorageUpdate,
            data: Bytes::from(body.encode_to_vec()),
        }
    }

    pub fn housekeeping(hash: H256) -> Self {
        Self {
            hash,
            from: Address::zero(),
            tx_type: TxType::Housekeeping,
            data: Bytes::new(),
        }
    }
}
