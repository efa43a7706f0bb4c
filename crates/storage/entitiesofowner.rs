//! Per-owner entity index: one keyset per owner address.

use ethereum_types::{Address, H256};
use keccak_hash::keccak;

use crate::{api::StateAccess, error::StoreError, keyset};

pub const ENTITIES_OF_OWNER_SALT: &[u8] = b"golemBaseEntitiesOfOwner";

pub fn entities_of_owner_key(owner: Address) -> H256 {
    keccak([ENTITIES_OF_OWNER_SALT, owner.as_bytes()].concat())
}

pub fn add_entity<S: StateAccess>(
    db: &mut S,
    owner: Address,
    entity_key: H256,
) -> Result<(), StoreError> {
    keyset::add_value(db, entities_of_owner_key(owner), entity_key)
}

pub fn remove_entity<S: StateAccess>(
    db: &mut S,
    owner: Address,
    entity_key: H256,
) -> Result<(), StoreError> {
    keyset::remove_value(db, entities_of_owner_key(owner), entity_key)
}

pub fn contains_entity<S: StateAccess + ?Sized>(
    db: &S,
    owner: Address,
    entity_key: H256,
) -> bool {
    keyset::contains_value(db, entities_of_owner_key(owner), entity_key)
}

pub fn entities<S: StateAccess + ?Sized>(
    db: &S,
    owner: Address,
) -> Result<Vec<H256>, StoreError> {
    keyset::members(db, entities_of_owner_key(owner))
}
