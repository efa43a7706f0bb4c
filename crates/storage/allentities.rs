//! Index of every live entity key, a single keyset under a fixed root.

use ethereum_types::H256;
use keccak_hash::keccak;

use crate::{api::StateAccess, error::StoreError, keyset};

pub const ALL_ENTITIES_SALT: &[u8] = b"golemBaseAllEntities";

lazy_static::lazy_static! {
    static ref ALL_ENTITIES_KEY: H256 = keccak(ALL_ENTITIES_SALT);
}

pub fn add_entity<S: StateAccess>(db: &mut S, entity_key: H256) -> Result<(), StoreError> {
    keyset::add_value(db, *ALL_ENTITIES_KEY, entity_key)
}

pub fn remove_entity<S: StateAccess>(db: &mut S, entity_key: H256) -> Result<(), StoreError> {
    keyset::remove_value(db, *ALL_ENTITIES_KEY, entity_key)
}

pub fn contains_entity<S: StateAccess + ?Sized>(db: &S, entity_key: H256) -> bool {
    keyset::contains_value(db, *ALL_ENTITIES_KEY, entity_key)
}

pub fn count<S: StateAccess + ?Sized>(db: &S) -> Result<u64, StoreError> {
    keyset::size(db, *ALL_ENTITIES_KEY)
}

pub fn entities<S: StateAccess + ?Sized>(db: &S) -> Result<Vec<H256>, StoreError> {
    keyset::members(db, *ALL_ENTITIES_KEY)
}
