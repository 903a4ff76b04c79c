use super::{ConsensusStrategy, credit_reward, seed_period};
use crate::error::Result;
use crate::state::ShardState;
use crate::{Block, CollationHeader};
use ethers::types::Address;

/// Fixed-difficulty strategy
///
/// Every collation pays `block_reward` to its coinbase. The seal holds when
/// the header links to the period start block it was applied against.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDifficulty;

impl ConsensusStrategy for FixedDifficulty {
    fn name(&self) -> &'static str {
        "FixedDifficulty"
    }

    fn initialize(&self, state: &mut ShardState, period_start_prevblock: &Block) -> Result<()> {
        seed_period(state, period_start_prevblock);
        Ok(())
    }

    fn finalize(&self, state: &mut ShardState, coinbase: Address) -> Result<()> {
        credit_reward(self.name(), state, coinbase)
    }

    fn check_seal(
        &self,
        _state: &ShardState,
        header: &CollationHeader,
        period_start_prevblock: &Block,
    ) -> bool {
        header.period_start_prevhash == period_start_prevblock.hash
    }
}
