//! # golembase-wal
//!
//! Per-block, crash-safe, append-only log of the logical operations a block
//! applied to the entity store, written for downstream mirrors to replay.
//!
//! Each block becomes one JSON-lines file named
//! `block-<20-digit-number>.json`: a [`record::BlockInfo`] line followed by
//! one [`record::Operation`] line per op. Files are published atomically
//! (`.temp` + rename), and the [`iterator::WalIterator`] verifies
//! block-number and parent-hash continuity before handing a block to the
//! consumer.

pub mod error;
pub mod iterator;
pub mod record;
pub mod writer;

pub use error::WalError;

/// Name of the WAL file for the given block.
pub fn block_number_to_filename(block_number: u64) -> String {
    format!("block-{block_number:020}.json")
}
