//! Root-key derivations for the annotation indices. The sets themselves are
//! plain keysets; callers pass these roots straight to [`crate::keyset`].

use ethereum_types::H256;
use keccak_hash::keccak;

pub const STRING_ANNOTATION_INDEX_SALT: &[u8] = b"golemBaseStringAnnotation";
pub const NUMERIC_ANNOTATION_INDEX_SALT: &[u8] = b"golemBaseNumericAnnotation";

pub fn string_annotation_index_key(key: &str, value: &str) -> H256 {
    keccak([STRING_ANNOTATION_INDEX_SALT, key.as_bytes(), value.as_bytes()].concat())
}

pub fn numeric_annotation_index_key(key: &str, value: u64) -> H256 {
    keccak([NUMERIC_ANNOTATION_INDEX_SALT, key.as_bytes(), &value.to_be_bytes()].concat())
}
