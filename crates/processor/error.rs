use ethereum_types::H256;
use golembase_rlp::error::RLPDecodeError;
use golembase_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("failed to decode storage transaction payload: {0}")]
    InvalidPayload(#[from] RLPDecodeError),
    #[error("update of unknown entity {0:#x}")]
    UpdateOfUnknownEntity(H256),
    #[error("op {op} on entity {key:#x} failed: {source}")]
    EntityOp {
        op: &'static str,
        key: H256,
        source: StoreError,
    },
    #[error("expiry of entity {key:#x} at block {block} failed: {source}")]
    Expiry {
        key: H256,
        block: u64,
        source: StoreError,
    },
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("{op} op {index} has no expiry: either expires_at_block or btl must be set")]
    MissingExpiry { op: &'static str, index: usize },
}
