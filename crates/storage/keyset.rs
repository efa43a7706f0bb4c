//! Set of 32-byte values addressed by a root key, encoded into flat state:
//!
//! - the member count lives at the root key itself,
//! - member `i` lives at `keccak(root ‖ be_u64(i))`,
//! - `keccak(root ‖ value)` holds `index + 1`, so the zero word doubles as
//!   "absent".
//!
//! Removal swaps the last member into the vacated index, so member order is
//! not stable across removals; only membership and size are contractual.

use ethereum_types::{BigEndianHash, H256, U256};
use keccak_hash::keccak;

use crate::{
    api::{StateAccess, get_word, set_word},
    error::StoreError,
};

fn index_slot(set_key: H256, index: u64) -> H256 {
    keccak([set_key.as_bytes(), &index.to_be_bytes()].concat())
}

fn value_slot(set_key: H256, value: H256) -> H256 {
    keccak([set_key.as_bytes(), value.as_bytes()].concat())
}

fn word_from_u64(value: u64) -> H256 {
    H256::from_uint(&U256::from(value))
}

fn word_to_u64(set_key: H256, word: H256) -> Result<u64, StoreError> {
    let value = word.into_uint();
    if value > U256::from(u64::MAX) {
        return Err(StoreError::CorruptedKeySet {
            set: set_key,
            reason: format!("slot holds {value} which exceeds u64"),
        });
    }
    Ok(value.as_u64())
}

/// Number of members in the set.
pub fn size<S: StateAccess + ?Sized>(db: &S, set_key: H256) -> Result<u64, StoreError> {
    word_to_u64(set_key, get_word(db, set_key))
}

pub fn contains_value<S: StateAccess + ?Sized>(db: &S, set_key: H256, value: H256) -> bool {
    !get_word(db, value_slot(set_key, value)).is_zero()
}

/// Adds `value` to the set. Adding a present value is a no-op.
pub fn add_value<S: StateAccess>(
    db: &mut S,
    set_key: H256,
    value: H256,
) -> Result<(), StoreError> {
    if contains_value(db, set_key, value) {
        return Ok(());
    }

    let size = size(db, set_key)?;
    let new_size = size.checked_add(1).ok_or(StoreError::CorruptedKeySet {
        set: set_key,
        reason: "size overflow".to_string(),
    })?;

    set_word(db, index_slot(set_key, size), value);
    set_word(db, value_slot(set_key, value), word_from_u64(new_size));
    set_word(db, set_key, word_from_u64(new_size));
    Ok(())
}

/// Removes `value` from the set by swapping the last member into its place.
/// Removing an absent value is a no-op.
pub fn remove_value<S: StateAccess>(
    db: &mut S,
    set_key: H256,
    value: H256,
) -> Result<(), StoreError> {
    let index_word = get_word(db, value_slot(set_key, value));
    if index_word.is_zero() {
        return Ok(());
    }
    let index = word_to_u64(set_key, index_word)? - 1;

    let size = size(db, set_key)?;
    if index >= size {
        return Err(StoreError::CorruptedKeySet {
            set: set_key,
            reason: format!("member index {index} out of range for size {size}"),
        });
    }

    let last_index = size - 1;
    if index != last_index {
        let last_value = get_word(db, index_slot(set_key, last_index));
        set_word(db, index_slot(set_key, index), last_value);
        set_word(db, value_slot(set_key, last_value), word_from_u64(index + 1));
    }

    set_word(db, index_slot(set_key, last_index), H256::zero());
    set_word(db, value_slot(set_key, value), H256::zero());
    set_word(db, set_key, word_from_u64(last_index));
    Ok(())
}

/// Lazy member iterator, in index order. Only valid while the set is not
/// mutated; callers that mutate while walking must snapshot with
/// [`members`] first.
pub struct KeySetIter<'a, S: StateAccess + ?Sized> {
    db: &'a S,
    set_key: H256,
    index: u64,
    size: u64,
}

impl<S: StateAccess + ?Sized> Iterator for KeySetIter<'_, S> {
    type Item = H256;

    fn next(&mut self) -> Option<H256> {
        if self.index >= self.size {
            return None;
        }
        let value = get_word(self.db, index_slot(self.set_key, self.index));
        self.index += 1;
        Some(value)
    }
}

pub fn iter<S: StateAccess + ?Sized>(
    db: &S,
    set_key: H256,
) -> Result<KeySetIter<'_, S>, StoreError> {
    let size = size(db, set_key)?;
    Ok(KeySetIter {
        db,
        set_key,
        index: 0,
        size,
    })
}

/// Snapshot of the member list, safe to walk while mutating the set.
pub fn members<S: StateAccess + ?Sized>(db: &S, set_key: H256) -> Result<Vec<H256>, StoreError> {
    Ok(iter(db, set_key)?.collect())
}

/// Zeroes every member slot, every reverse-index slot, and the size slot.
/// Leaves no residual storage behind.
pub fn clear<S: StateAccess>(db: &mut S, set_key: H256) -> Result<(), StoreError> {
    for member in members(db, set_key)? {
        set_word(db, value_slot(set_key, member), H256::zero());
    }
    let size = size(db, set_key)?;
    for index in 0..size {
        set_word(db, index_slot(set_key, index), H256::zero());
    }
    set_word(db, set_key, H256::zero());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryState;
    use golembase_common::constants::STORAGE_PROCESSOR_ADDRESS;

    fn set_key() -> H256 {
        H256::from_low_u64_be(1)
    }

    fn value(n: u64) -> H256 {
        H256::from_low_u64_be(n)
    }

    #[test]
    fn add_and_check_value_in_empty_set() {
        let mut db = InMemoryState::new();
        assert!(!contains_value(&db, set_key(), value(2)));

        add_value(&mut db, set_key(), value(2)).unwrap();
        assert!(contains_value(&db, set_key(), value(2)));
    }

    #[test]
    fn add_duplicate_value() {
        let mut db = InMemoryState::new();
        add_value(&mut db, set_key(), value(2)).unwrap();
        add_value(&mut db, set_key(), value(2)).unwrap();

        assert!(contains_value(&db, set_key(), value(2)));
        assert_eq!(size(&db, set_key()).unwrap(), 1);
    }

    #[test]
    fn remove_value_from_set() {
        let mut db = InMemoryState::new();
        add_value(&mut db, set_key(), value(2)).unwrap();

        remove_value(&mut db, set_key(), value(2)).unwrap();
        assert!(!contains_value(&db, set_key(), value(2)));
        assert_eq!(size(&db, set_key()).unwrap(), 0);
    }

    #[test]
    fn remove_nonexistent_value_is_a_noop() {
        let mut db = InMemoryState::new();
        remove_value(&mut db, set_key(), value(2)).unwrap();
        assert!(!contains_value(&db, set_key(), value(2)));
    }

    #[test]
    fn remove_twice_leaves_empty_storage() {
        let mut db = InMemoryState::new();
        add_value(&mut db, set_key(), value(2)).unwrap();
        remove_value(&mut db, set_key(), value(2)).unwrap();
        remove_value(&mut db, set_key(), value(2)).unwrap();

        assert_eq!(size(&db, set_key()).unwrap(), 0);
        assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
    }

    #[test]
    fn multiple_values_and_middle_removal() {
        let mut db = InMemoryState::new();
        for n in 2..=4 {
            add_value(&mut db, set_key(), value(n)).unwrap();
            assert_eq!(size(&db, set_key()).unwrap(), n - 1);
        }

        remove_value(&mut db, set_key(), value(3)).unwrap();

        assert!(contains_value(&db, set_key(), value(2)));
        assert!(!contains_value(&db, set_key(), value(3)));
        assert!(contains_value(&db, set_key(), value(4)));
        assert_eq!(size(&db, set_key()).unwrap(), 2);
    }

    #[test]
    fn iteration_yields_all_members() {
        let mut db = InMemoryState::new();
        let values: Vec<H256> = (2..=6).map(value).collect();
        for v in &values {
            add_value(&mut db, set_key(), *v).unwrap();
        }

        let mut seen = members(&db, set_key()).unwrap();
        seen.sort();
        assert_eq!(seen, values);
    }

    #[test]
    fn iteration_survives_swap_with_last_removals() {
        let mut db = InMemoryState::new();
        for n in 2..=6 {
            add_value(&mut db, set_key(), value(n)).unwrap();
        }
        remove_value(&mut db, set_key(), value(2)).unwrap();
        remove_value(&mut db, set_key(), value(5)).unwrap();

        let mut seen = members(&db, set_key()).unwrap();
        seen.sort();
        assert_eq!(seen, vec![value(3), value(4), value(6)]);
    }

    #[test]
    fn clear_empty_set() {
        let mut db = InMemoryState::new();
        clear(&mut db, set_key()).unwrap();
        assert_eq!(size(&db, set_key()).unwrap(), 0);
        assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
    }

    #[test]
    fn clear_set_with_values_leaves_empty_storage() {
        let mut db = InMemoryState::new();
        let values: Vec<H256> = (2..=6).map(value).collect();
        for v in &values {
            add_value(&mut db, set_key(), *v).unwrap();
        }
        assert!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS) > 0);

        clear(&mut db, set_key()).unwrap();

        for v in &values {
            assert!(!contains_value(&db, set_key(), *v));
        }
        assert_eq!(size(&db, set_key()).unwrap(), 0);
        assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
    }

    #[test]
    fn clear_and_readd_values() {
        let mut db = InMemoryState::new();
        add_value(&mut db, set_key(), value(2)).unwrap();
        add_value(&mut db, set_key(), value(3)).unwrap();

        clear(&mut db, set_key()).unwrap();
        assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);

        add_value(&mut db, set_key(), value(2)).unwrap();
        add_value(&mut db, set_key(), value(3)).unwrap();
        assert!(contains_value(&db, set_key(), value(2)));
        assert!(contains_value(&db, set_key(), value(3)));
        assert_eq!(size(&db, set_key()).unwrap(), 2);
    }
}
