use ethereum_types::H256;
use serde::{Deserialize, Serialize};

use super::Transaction;

pub type BlockNumber = u64;
pub type BlockHash = H256;

/// The slice of a block the entity store consumes: identity, chain linkage,
/// and the ordered transaction list. Headers, state roots and the rest of
/// the consensus envelope stay with the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: BlockNumber,
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub transactions: Vec<Transaction>,
}
