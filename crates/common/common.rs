pub use bytes::Bytes;
pub use ethereum_types::{Address, H160, H256, U256};

pub mod base64;
pub mod constants;
pub mod serde_utils;
pub mod types;
