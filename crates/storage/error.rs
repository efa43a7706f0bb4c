use ethereum_types::H256;
use golembase_rlp::error::RLPDecodeError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entity {0:#x} not found")]
    EntityNotFound(H256),
    #[error("failed to decode active payload for entity {key:#x}: {source}")]
    PayloadDecode {
        key: H256,
        source: RLPDecodeError,
    },
    #[error("key set {set:#x} is corrupted: {reason}")]
    CorruptedKeySet { set: H256, reason: String },
}
