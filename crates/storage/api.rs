use ethereum_types::{Address, H256};
use golembase_common::constants::STORAGE_PROCESSOR_ADDRESS;

/// The capability the entity store needs from the host's account state: a
/// flat word-addressed map per account. Writing the zero word deletes the
/// slot; reading an absent slot yields the zero word. Backends are expected
/// to instantiate an account lazily on its first non-zero write.
pub trait StateAccess {
    fn get_state(&self, address: Address, slot: H256) -> H256;
    fn set_state(&mut self, address: Address, slot: H256, value: H256);
}

/// Reads a word from the storage-processor account.
pub fn get_word<S: StateAccess + ?Sized>(db: &S, slot: H256) -> H256 {
    db.get_state(*STORAGE_PROCESSOR_ADDRESS, slot)
}

/// Writes a word to the storage-processor account; the zero word deletes.
pub fn set_word<S: StateAccess + ?Sized>(db: &mut S, slot: H256, value: H256) {
    db.set_state(*STORAGE_PROCESSOR_ADDRESS, slot, value);
}
