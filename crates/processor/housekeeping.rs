//! Executor for the per-block housekeeping sweep: every entity whose expiry
//! equals the current block is deleted, one deletion log per entity.

use golembase_common::{
    Bytes,
    constants::STORAGE_PROCESSOR_ADDRESS,
    types::{GOLEM_BASE_STORAGE_ENTITY_DELETED, Log},
};
use golembase_storage::{StateAccess, entity, entityexpiration, keyset};
use tracing::debug;

use crate::error::ProcessorError;

/// Purges every entity scheduled to expire at `block_number` and reclaims
/// the expiration set itself. Any individual failure is fatal to the block:
/// an entity that is indexed for expiry but cannot be deleted means the
/// invariants no longer hold.
pub fn execute_housekeeping<S: StateAccess>(
    db: &mut S,
    block_number: u64,
) -> Result<Vec<Log>, ProcessorError> {
    let expiration_key = entityexpiration::entities_to_expire_at_block_key(block_number);

    // Deleting an entity shrinks this very set, so snapshot the members
    // before the first deletion.
    let expired = keyset::members(db, expiration_key)?;
    let mut logs = Vec::with_capacity(expired.len());

    for key in expired {
        entity::delete_entity(db, key).map_err(|source| ProcessorError::Expiry {
            key,
            block: block_number,
            source,
        })?;

        logs.push(Log {
            address: *STORAGE_PROCESSOR_ADDRESS,
            topics: vec![*GOLEM_BASE_STORAGE_ENTITY_DELETED, key],
            data: Bytes::new(),
            block_number,
        });
    }

    // The deletions above already emptied the set; this reclaims any
    // residual slots so an emptied block root leaves no storage behind.
    keyset::clear(db, expiration_key)?;

    if !logs.is_empty() {
        debug!(block = block_number, expired = logs.len(), "housekeeping purged entities");
    }

    Ok(logs)
}
