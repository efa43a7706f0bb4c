//! # golembase-processor
//!
//! The transaction executors that drive the entity store:
//!
//! - [`storage_tx`]: applies one storage-update transaction (creates, then
//!   updates, then deletes) and emits the per-op logs the WAL writer pairs
//!   positionally with the transaction payload
//! - [`housekeeping`]: the per-block sweep that purges every entity whose
//!   expiry equals the current block
//! - [`block`]: a driver that executes a whole block against a clonable
//!   state backend, reverting failed transactions
//!
//! Executors are strictly sequential within a block; atomicity is inherited
//! from the host's block-execution boundary.

pub mod block;
pub mod error;
pub mod housekeeping;
pub mod storage_tx;

pub use error::ProcessorError;
