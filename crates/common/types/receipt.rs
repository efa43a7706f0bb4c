use bytes::Bytes;
use ethereum_types::{Address, H256};
use serde::{Deserialize, Serialize};

use super::TxType;

/// Data record produced during the execution of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
    pub block_number: u64,
}

/// Result of a transaction. Gas accounting belongs to the host chain, so a
/// receipt here is just the success flag plus the logs the executors emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_type: TxType,
    pub succeeded: bool,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn new(tx_type: TxType, succeeded: bool, logs: Vec<Log>) -> Self {
        Self {
            tx_type,
            succeeded,
            logs,
        }
    }

    pub fn failed(tx_type: TxType) -> Self {
        Self {
            tx_type,
            succeeded: false,
            logs: Vec::new(),
        }
    }
}
