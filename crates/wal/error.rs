use ethereum_types::H256;
use golembase_rlp::error::RLPDecodeError;

#[derive(Debug, thiserror::Error)]
pub enum WalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to decode storage transaction {tx:#x}: {source}")]
    TxDecode {
        tx: H256,
        source: RLPDecodeError,
    },
    #[error("transaction {tx:#x} has {got} receipt logs for its {op} ops, op {index} has none")]
    MissingOpLog {
        tx: H256,
        op: &'static str,
        index: usize,
        got: usize,
    },
    #[error("block has {transactions} transactions but {receipts} receipts")]
    ReceiptCountMismatch {
        transactions: usize,
        receipts: usize,
    },
    #[error("wal file for block {0} has no block info record")]
    MissingBlockInfo(u64),
    #[error("block number mismatch: expected {expected}, got {got}")]
    BlockNumberMismatch { expected: u64, got: u64 },
    #[error("parent hash mismatch at block {block}: expected {expected:#x}, got {got:#x}")]
    ParentHashMismatch {
        block: u64,
        expected: H256,
        got: H256,
    },
}
