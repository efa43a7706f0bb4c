//! # golembase-storage
//!
//! The entity-store state engine. Everything here is layered over the flat
//! `(address, slot) -> word` map exposed by [`api::StateAccess`], with all
//! slots living under the reserved storage-processor account:
//!
//! - [`keyset`]: O(1) sets of 32-byte values (size slot + index slots +
//!   reverse-index slots, swap-with-last removal)
//! - [`stateblob`]: variable-length blobs chunked across 32-byte slots
//! - [`allentities`], [`entitiesofowner`], [`annotationindex`],
//!   [`entityexpiration`]: the secondary indices, thin keyset derivations
//!   under salted keccak roots
//! - [`entity`]: the lifecycle operations that keep blob and indices
//!   consistent

pub mod allentities;
pub mod annotationindex;
pub mod api;
pub mod entitiesofowner;
pub mod entity;
pub mod entityexpiration;
pub mod error;
pub mod in_memory;
pub mod keyset;
pub mod stateblob;

pub use api::StateAccess;
pub use error::StoreError;
pub use in_memory::InMemoryState;
