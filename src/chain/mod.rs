//! Chain Module
//!
//! Lookups the collation engine needs from the main chain and the shard chains.
//! The engine only consumes these traits; `memory` holds in-process
//! implementations backing the binary and the tests.

mod memory;

pub use memory::{InMemoryMainChain, InMemoryShardChain};

use crate::error::Result;
use crate::state::ShardState;
use crate::{Block, ShardId};
use ethers::types::H256;

/// Shard chain - outbound port
pub trait ShardChain {
    fn shard_id(&self) -> ShardId;

    /// Fresh, independently owned post-state of a known collation
    ///
    /// `H256::zero()` names the shard's genesis state.
    fn mk_poststate_of_collation_hash(&self, collation_hash: H256) -> Result<ShardState>;
}

/// Main chain - outbound port
pub trait MainChain {
    fn has_shard(&self, shard_id: ShardId) -> bool;

    fn shard(&self, shard_id: ShardId) -> Option<&dyn ShardChain>;

    /// Period the next collations belong to
    fn get_expected_period_number(&self) -> u64;

    /// Hash of the block preceding `period`'s first block, if mined
    fn get_period_start_prevhash(&self, period: u64) -> Option<H256>;

    fn get_block(&self, hash: &H256) -> Option<Block>;
}
