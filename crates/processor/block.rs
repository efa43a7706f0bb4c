//! Block driver for hosts without a surrounding EVM (tests, dev chains).
//! Executes a block's transactions in order against a clonable state
//! backend, giving each storage transaction revert-on-failure semantics by
//! cloning the state before applying it.

use golembase_rlp::decode::RLPDecode;
use golembase_common::types::{Block, Receipt, StorageTransaction, TxType};
use golembase_storage::StateAccess;
use tracing::warn;

use crate::{
    error::ProcessorError, housekeeping::execute_housekeeping,
    storage_tx::execute_storage_transaction,
};

/// Executes every transaction of `block` and returns their receipts, in
/// order. A storage transaction that fails to decode or apply is reverted
/// and gets a failed receipt without logs; a housekeeping failure aborts
/// the whole block (unrecoverable index corruption).
pub fn execute_block<S: StateAccess + Clone>(
    db: &mut S,
    block: &Block,
) -> Result<Vec<Receipt>, ProcessorError> {
    let mut receipts = Vec::with_capacity(block.transactions.len());

    for tx in &block.transactions {
        match tx.tx_type {
            TxType::StorageUpdate => {
                let snapshot = db.clone();
                let result = StorageTransaction::decode(&tx.data)
                    .map_err(ProcessorError::from)
                    .and_then(|stx| {
                        execute_storage_transaction(db, block.number, tx.hash, tx.from, &stx)
                    });

                match result {
                    Ok(logs) => receipts.push(Receipt::new(tx.tx_type, true, logs)),
                    Err(error) => {
                        warn!(tx = %tx.hash, %error, "storage transaction reverted");
                        *db = snapshot;
                        receipts.push(Receipt::failed(tx.tx_type));
                    }
                }
            }
            TxType::Housekeeping => {
                let logs = execute_housekeeping(db, block.number)?;
                receipts.push(Receipt::new(tx.tx_type, true, logs));
            }
        }
    }

    Ok(receipts)
}
