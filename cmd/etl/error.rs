use golembase_wal::WalError;

use crate::rpc::RpcClientError;

#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    #[error("database error: {0}")]
    Sql(#[from] libsql::Error),
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcClientError),
    #[error("mirror database schema version is {current}, expected {expected}")]
    VersionMismatch { current: u64, expected: u64 },
    #[error("value does not fit the mirror schema: {0}")]
    Conversion(String),
    #[error("processing of block {0} exceeded the deadline")]
    BlockDeadlineExceeded(u64),
    #[error("no processing status found for network {0}")]
    MissingProcessingStatus(String),
}
