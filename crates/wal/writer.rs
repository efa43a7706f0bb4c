//! Writes one WAL file per executed block, reconstructing the logical
//! operation stream from the block's transactions and their receipts.
//!
//! Crash safety: everything goes to `<final>.temp` first, is fsynced, and
//! only then renamed into place. A half-written `.temp` is removed on every
//! failure path and swept up by [`clean_temp_files`] on the next startup.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use ethereum_types::U256;
use golembase_common::types::{
    Block, GOLEM_BASE_STORAGE_ENTITY_CREATED, GOLEM_BASE_STORAGE_ENTITY_DELETED,
    GOLEM_BASE_STORAGE_ENTITY_UPDATED, Log, Receipt, StorageTransaction, TxType,
};
use golembase_rlp::decode::RLPDecode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    block_number_to_filename,
    error::WalError,
    record::{BlockInfo, Create, Operation, Update},
};

// Removes the temp file unless the rename committed it.
struct TempFileGuard {
    path: PathBuf,
    committed: bool,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn expires_at_block_from(log: &Log) -> u64 {
    U256::from_big_endian(&log.data).low_u64()
}

/// Rebuilds the ordered operation stream of a block from its receipts and
/// transaction payloads. Failed transactions contribute nothing. Storage
/// transactions rely on positional pairing: the `i`-th create (update) op
/// of the payload matches the `i`-th created (updated) log of the receipt,
/// which is exactly the order the executor emits them in.
pub fn operations_for_block(block: &Block, receipts: &[Receipt]) -> Result<Vec<Operation>, WalError> {
    if block.transactions.len() != receipts.len() {
        return Err(WalError::ReceiptCountMismatch {
            transactions: block.transactions.len(),
            receipts: receipts.len(),
        });
    }

    let mut operations = Vec::new();

    for (tx, receipt) in block.transactions.iter().zip(receipts) {
        if !receipt.succeeded {
            continue;
        }

        match tx.tx_type {
            TxType::Housekeeping => {
                for log in &receipt.logs {
                    if log.topics.len() != 2 {
                        continue;
                    }
                    if log.topics[0] != *GOLEM_BASE_STORAGE_ENTITY_DELETED {
                        continue;
                    }
                    operations.push(Operation::Delete(log.topics[1]));
                }
            }
            TxType::StorageUpdate => {
                let stx = StorageTransaction::decode(&tx.data)
                    .map_err(|source| WalError::TxDecode { tx: tx.hash, source })?;

                let mut created_logs = Vec::new();
                let mut updated_logs = Vec::new();
                for log in &receipt.logs {
                    if log.topics.len() < 2 {
                        continue;
                    }
                    if log.topics[0] == *GOLEM_BASE_STORAGE_ENTITY_CREATED {
                        created_logs.push(log);
                    }
                    if log.topics[0] == *GOLEM_BASE_STORAGE_ENTITY_UPDATED {
                        updated_logs.push(log);
                    }
                }

                for (index, create) in stx.create.iter().enumerate() {
                    let log = created_logs.get(index).ok_or(WalError::MissingOpLog {
                        tx: tx.hash,
                        op: "create",
                        index,
                        got: created_logs.len(),
                    })?;
                    operations.push(Operation::Create(Create {
                        entity_key: log.topics[1],
                        expires_at_block: expires_at_block_from(log),
                        payload: create.payload.clone(),
                        string_annotations: create.string_annotations.clone(),
                        numeric_annotations: create.numeric_annotations.clone(),
                    }));
                }

                for (index, update) in stx.update.iter().enumerate() {
                    let log = updated_logs.get(index).ok_or(WalError::MissingOpLog {
                        tx: tx.hash,
                        op: "update",
                        index,
                        got: updated_logs.len(),
                    })?;
                    operations.push(Operation::Update(Update {
                        entity_key: log.topics[1],
                        expires_at_block: expires_at_block_from(log),
                        payload: update.payload.clone(),
                        string_annotations: update.string_annotations.clone(),
                        numeric_annotations: update.numeric_annotations.clone(),
                    }));
                }

                for entity_key in &stx.delete {
                    operations.push(Operation::Delete(*entity_key));
                }
            }
        }
    }

    Ok(operations)
}

fn write_record<W: Write, T: Serialize>(writer: &mut W, record: &T) -> Result<(), WalError> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes the WAL file for an executed block into `dir`, atomically.
pub fn write_log_for_block(
    dir: &Path,
    block: &Block,
    receipts: &[Receipt],
) -> Result<(), WalError> {
    let operations = operations_for_block(block, receipts)?;

    let final_name = block_number_to_filename(block.number);
    let final_path = dir.join(&final_name);
    let mut guard = TempFileGuard {
        path: dir.join(format!("{final_name}.temp")),
        committed: false,
    };

    let file = File::create(&guard.path)?;
    let mut writer = BufWriter::new(file);

    write_record(
        &mut writer,
        &BlockInfo {
            number: block.number,
            hash: block.hash,
            parent_hash: block.parent_hash,
        },
    )?;
    for operation in &operations {
        write_record(&mut writer, operation)?;
    }

    writer.flush()?;
    writer.get_ref().sync_all()?;
    drop(writer);

    fs::rename(&guard.path, &final_path)?;
    guard.committed = true;

    debug!(
        block = block.number,
        operations = operations.len(),
        path = %final_path.display(),
        "wal file written"
    );
    Ok(())
}

/// Removes stale `.temp` leftovers from interrupted writes. Called on
/// startup before any WAL consumer touches the directory.
pub fn clean_temp_files(dir: &Path) -> Result<usize, WalError> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "temp") {
            warn!(path = %path.display(), "removing stale wal temp file");
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
