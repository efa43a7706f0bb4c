//! Executor for storage-update transactions. Ops run in payload order,
//! creates first, then updates, then deletes, and one log is emitted per op
//! in execution order. The WAL writer pairs payload ops with these logs
//! positionally, so the emission order is part of the contract.

use ethereum_types::{Address, BigEndianHash, H256, U256};
use golembase_common::{
    Bytes,
    constants::STORAGE_PROCESSOR_ADDRESS,
    types::{
        ActivePayload, GOLEM_BASE_STORAGE_ENTITY_CREATED, GOLEM_BASE_STORAGE_ENTITY_DELETED,
        GOLEM_BASE_STORAGE_ENTITY_UPDATED, Log, StorageTransaction,
    },
};
use golembase_storage::{StateAccess, StoreError, entity};
use keccak_hash::keccak;
use tracing::debug;

use crate::error::ProcessorError;

/// Derives the key of the `create_index`-th entity created by the
/// transaction with hash `tx_hash`. Keys are globally unique because
/// transaction hashes are.
pub fn entity_key(tx_hash: H256, create_index: u32) -> H256 {
    keccak([tx_hash.as_bytes(), &create_index.to_be_bytes()].concat())
}

fn resolve_expiry(
    op: &'static str,
    index: usize,
    block_number: u64,
    expires_at_block: u64,
    btl: u64,
) -> Result<u64, ProcessorError> {
    if btl != 0 {
        return Ok(block_number.saturating_add(btl));
    }
    if expires_at_block == 0 {
        return Err(ProcessorError::MissingExpiry { op, index });
    }
    Ok(expires_at_block)
}

fn entity_log(topic: H256, key: H256, data: Bytes, block_number: u64) -> Log {
    Log {
        address: *STORAGE_PROCESSOR_ADDRESS,
        topics: vec![topic, key],
        data,
        block_number,
    }
}

fn expiry_log_data(expires_at_block: u64) -> Bytes {
    Bytes::copy_from_slice(H256::from_uint(&U256::from(expires_at_block)).as_bytes())
}

/// Applies one decoded storage transaction and returns the logs it emitted.
/// On error the caller reverts the transaction; nothing is emitted.
pub fn execute_storage_transaction<S: StateAccess>(
    db: &mut S,
    block_number: u64,
    tx_hash: H256,
    sender: Address,
    stx: &StorageTransaction,
) -> Result<Vec<Log>, ProcessorError> {
    let mut logs = Vec::with_capacity(stx.create.len() + stx.update.len() + stx.delete.len());

    for (index, create) in stx.create.iter().enumerate() {
        let key = entity_key(tx_hash, index as u32);
        let expires_at_block = resolve_expiry(
            "create",
            index,
            block_number,
            create.expires_at_block,
            create.btl,
        )?;

        let ap = ActivePayload {
            owner: sender,
            expires_at_block,
            payload: create.payload.clone(),
            string_annotations: create.string_annotations.clone(),
            numeric_annotations: create.numeric_annotations.clone(),
        };
        entity::store_entity(db, key, sender, &ap).map_err(|source| {
            ProcessorError::EntityOp {
                op: "create",
                key,
                source,
            }
        })?;
        debug!(entity = %key, expires_at_block, "entity created");

        logs.push(entity_log(
            *GOLEM_BASE_STORAGE_ENTITY_CREATED,
            key,
            expiry_log_data(expires_at_block),
            block_number,
        ));
    }

    for (index, update) in stx.update.iter().enumerate() {
        let key = update.entity_key;
        let expires_at_block = resolve_expiry(
            "update",
            index,
            block_number,
            update.expires_at_block,
            update.btl,
        )?;

        // an update is a delete plus a re-insert under the same key
        entity::delete_entity(db, key).map_err(|source| match source {
            StoreError::EntityNotFound(_) => ProcessorError::UpdateOfUnknownEntity(key),
            source => ProcessorError::EntityOp {
                op: "update",
                key,
                source,
            },
        })?;

        let ap = ActivePayload {
            owner: sender,
            expires_at_block,
            payload: update.payload.clone(),
            string_annotations: update.string_annotations.clone(),
            numeric_annotations: update.numeric_annotations.clone(),
        };
        entity::store_entity(db, key, sender, &ap).map_err(|source| {
            ProcessorError::EntityOp {
                op: "update",
                key,
                source,
            }
        })?;
        debug!(entity = %key, expires_at_block, "entity updated");

        logs.push(entity_log(
            *GOLEM_BASE_STORAGE_ENTITY_UPDATED,
            key,
            expiry_log_data(expires_at_block),
            block_number,
        ));
    }

    for key in &stx.delete {
        entity::delete_entity(db, *key).map_err(|source| ProcessorError::EntityOp {
            op: "delete",
            key: *key,
            source,
        })?;
        debug!(entity = %key, "entity deleted");

        logs.push(entity_log(
            *GOLEM_BASE_STORAGE_ENTITY_DELETED,
            *key,
            Bytes::new(),
            block_number,
        ));
    }

    Ok(logs)
}
