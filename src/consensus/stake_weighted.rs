use super::{ConsensusStrategy, credit_reward, seed_period};
use crate::error::Result;
use crate::state::ShardState;
use crate::{Block, CollationHeader};
use ethers::types::Address;

/// Stake-weighted strategy
///
/// The coinbase's balance is its stake. A coinbase without stake earns no
/// reward and cannot seal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StakeWeighted;

impl StakeWeighted {
    fn has_stake(state: &ShardState, coinbase: &Address) -> bool {
        !state.get_balance(coinbase).is_zero()
    }
}

impl ConsensusStrategy for StakeWeighted {
    fn name(&self) -> &'static str {
        "StakeWeighted"
    }

    fn initialize(&self, state: &mut ShardState, period_start_prevblock: &Block) -> Result<()> {
        seed_period(state, period_start_prevblock);
        Ok(())
    }

    fn finalize(&self, state: &mut ShardState, coinbase: Address) -> Result<()> {
        if !Self::has_stake(state, &coinbase) {
            return Ok(());
        }
        credit_reward(self.name(), state, coinbase)
    }

    fn check_seal(
        &self,
        state: &ShardState,
        header: &CollationHeader,
        period_start_prevblock: &Block,
    ) -> bool {
        header.period_start_prevhash == period_start_prevblock.hash
            && Self::has_stake(state, &header.coinbase)
    }
}
