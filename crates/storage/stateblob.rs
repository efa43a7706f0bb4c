//! Variable-length blobs addressed by a 32-byte key: the byte length lives
//! at the key itself, chunk `i` (32 bytes each) at `keccak(key ‖ be_u64(i))`.

use ethereum_types::{BigEndianHash, H256, U256};
use keccak_hash::keccak;

use crate::api::{StateAccess, get_word, set_word};

fn chunk_slot(key: H256, index: u64) -> H256 {
    keccak([key.as_bytes(), &index.to_be_bytes()].concat())
}

fn chunk_count(len: usize) -> u64 {
    len.div_ceil(32) as u64
}

/// Stores `bytes` under `key`, overwriting any previous blob and zeroing
/// chunks the new value no longer covers.
pub fn set_blob<S: StateAccess>(db: &mut S, key: H256, bytes: &[u8]) {
    let old_chunks = chunk_count(get_word(db, key).into_uint().as_usize());
    let new_chunks = chunk_count(bytes.len());

    set_word(db, key, H256::from_uint(&U256::from(bytes.len())));

    for (index, chunk) in bytes.chunks(32).enumerate() {
        let mut word = [0u8; 32];
        word[..chunk.len()].copy_from_slice(chunk);
        set_word(db, chunk_slot(key, index as u64), H256(word));
    }

    for index in new_chunks..old_chunks {
        set_word(db, chunk_slot(key, index), H256::zero());
    }
}

/// Reads the blob stored under `key`; empty if there is none.
pub fn get_blob<S: StateAccess + ?Sized>(db: &S, key: H256) -> Vec<u8> {
    let len = get_word(db, key).into_uint().as_usize();
    let mut bytes = Vec::with_capacity(chunk_count(len) as usize * 32);
    for index in 0..chunk_count(len) {
        bytes.extend_from_slice(get_word(db, chunk_slot(key, index)).as_bytes());
    }
    bytes.truncate(len);
    bytes
}

/// Removes the blob stored under `key`, leaving no residual slots.
pub fn delete_blob<S: StateAccess>(db: &mut S, key: H256) {
    let len = get_word(db, key).into_uint().as_usize();
    for index in 0..chunk_count(len) {
        set_word(db, chunk_slot(key, index), H256::zero());
    }
    set_word(db, key, H256::zero());
}
