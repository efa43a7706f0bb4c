//! Per-block expiration index: the keyset at block `N`'s root holds every
//! entity that must be purged while processing block `N`.

use ethereum_types::H256;
use keccak_hash::keccak;

use crate::{api::StateAccess, error::StoreError, keyset};

pub const BLOCK_EXPIRATION_SALT: &[u8] = b"golemBaseExpiresAtBlock";

/// Root of the expiration set for `block_number`. The block number is
/// hashed as its minimal big-endian bytes (empty for zero), matching the
/// on-chain u256 byte representation.
pub fn entities_to_expire_at_block_key(block_number: u64) -> H256 {
    let be = block_number.to_be_bytes();
    let first_non_zero = be.iter().position(|b| *b != 0).unwrap_or(be.len());
    keccak([BLOCK_EXPIRATION_SALT, &be[first_non_zero..]].concat())
}

pub fn add_to_entities_to_expire_at_block<S: StateAccess>(
    db: &mut S,
    block_number: u64,
    entity_key: H256,
) -> Result<(), StoreError> {
    keyset::add_value(db, entities_to_expire_at_block_key(block_number), entity_key)
}

pub fn remove_from_entities_to_expire<S: StateAccess>(
    db: &mut S,
    block_number: u64,
    entity_key: H256,
) -> Result<(), StoreError> {
    keyset::remove_value(db, entities_to_expire_at_block_key(block_number), entity_key)
}

pub fn contains_entity<S: StateAccess + ?Sized>(
    db: &S,
    block_number: u64,
    entity_key: H256,
) -> bool {
    keyset::contains_value(db, entities_to_expire_at_block_key(block_number), entity_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_numbers_hash_to_distinct_roots() {
        assert_ne!(
            entities_to_expire_at_block_key(0),
            entities_to_expire_at_block_key(1)
        );
        assert_ne!(
            entities_to_expire_at_block_key(255),
            entities_to_expire_at_block_key(256)
        );
    }

    #[test]
    fn minimal_big_endian_derivation() {
        // block 256 hashes as [0x01, 0x00], not as 8 padded bytes
        let expected = keccak([BLOCK_EXPIRATION_SALT, [0x01, 0x00].as_slice()].concat());
        assert_eq!(entities_to_expire_at_block_key(256), expected);
    }
}
