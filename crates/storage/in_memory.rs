use std::collections::HashMap;

use ethereum_types::{Address, H256};

use crate::api::StateAccess;

/// In-memory account-state backend. Accounts appear on first non-zero write
/// and vanish when their last slot is zeroed, so [`entry_count`]
/// (`InMemoryState::entry_count`) counting makes the zero-leak property of
/// the store directly observable in tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryState {
    storage: HashMap<Address, HashMap<H256, H256>>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-zero) slots held by the given account.
    pub fn entry_count(&self, address: Address) -> usize {
        self.storage.get(&address).map(HashMap::len).unwrap_or(0)
    }
}

impl StateAccess for InMemoryState {
    fn get_state(&self, address: Address, slot: H256) -> H256 {
        self.storage
            .get(&address)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or_default()
    }

    fn set_state(&mut self, address: Address, slot: H256, value: H256) {
        if value.is_zero() {
            if let Some(slots) = self.storage.get_mut(&address) {
                slots.remove(&slot);
                if slots.is_empty() {
                    self.storage.remove(&address);
                }
            }
            return;
        }
        self.storage.entry(address).or_default().insert(slot, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_write_deletes_the_slot() {
        let mut state = InMemoryState::new();
        let addr = Address::repeat_byte(1);
        let slot = H256::repeat_byte(2);

        state.set_state(addr, slot, H256::repeat_byte(3));
        assert_eq!(state.get_state(addr, slot), H256::repeat_byte(3));
        assert_eq!(state.entry_count(addr), 1);

        state.set_state(addr, slot, H256::zero());
        assert_eq!(state.get_state(addr, slot), H256::zero());
        assert_eq!(state.entry_count(addr), 0);
    }

    #[test]
    fn absent_slot_reads_zero() {
        let state = InMemoryState::new();
        assert_eq!(
            state.get_state(Address::repeat_byte(1), H256::repeat_byte(2)),
            H256::zero()
        );
    }
}
