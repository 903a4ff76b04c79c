//! Consensus Strategy Module
//!
//! Per-collation setup and teardown, selected from the shard state's
//! configuration using the Strategy design pattern:
//! - FixedDifficulty: unconditional coinbase reward
//! - StakeWeighted: reward and seal both require the coinbase to hold stake
//!
//! This core only sequences the calls; what a strategy does to the state is
//! its own business.

mod fixed_difficulty;
mod stake_weighted;

pub use fixed_difficulty::FixedDifficulty;
pub use stake_weighted::StakeWeighted;

use crate::config::{ConsensusKind, StateConfig};
use crate::error::{CollatorError, Result};
use crate::state::ShardState;
use crate::{Block, CollationHeader};
use ethers::types::{Address, U256};

/// Consensus strategy trait
pub trait ConsensusStrategy: Send + Sync {
    /// Name of the strategy (for logging and errors)
    fn name(&self) -> &'static str;

    /// Per-period setup before any transaction runs
    fn initialize(&self, state: &mut ShardState, period_start_prevblock: &Block) -> Result<()>;

    /// End-of-collation rewards and bookkeeping
    fn finalize(&self, state: &mut ShardState, coinbase: Address) -> Result<()>;

    /// Whether the collation is sealed correctly against its period start block
    fn check_seal(
        &self,
        state: &ShardState,
        header: &CollationHeader,
        period_start_prevblock: &Block,
    ) -> bool;
}

/// Registry lookup: the strategy a state configuration runs under
pub fn strategy_for(config: &StateConfig) -> &'static dyn ConsensusStrategy {
    match config.consensus {
        ConsensusKind::FixedDifficulty => &FixedDifficulty,
        ConsensusKind::StakeWeighted => &StakeWeighted,
    }
}

/// Setup shared by every strategy: fresh receipts and gas counter, and the
/// period start block registered in the block-hash registry
fn seed_period(state: &mut ShardState, period_start_prevblock: &Block) {
    state.begin_collation();
    state.set_block_hash(period_start_prevblock.number, period_start_prevblock.hash);
}

fn credit_reward(strategy: &'static str, state: &mut ShardState, coinbase: Address) -> Result<()> {
    let reward = U256::from(state.config().block_reward);
    state
        .add_balance(coinbase, reward)
        .ok_or_else(|| CollatorError::Consensus {
            strategy,
            reason: format!("coinbase balance overflow crediting {}", reward),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::H256;

    #[test]
    fn test_registry_selects_by_config() {
        let mut config = StateConfig::default();
        assert_eq!(strategy_for(&config).name(), "FixedDifficulty");
        config.consensus = ConsensusKind::StakeWeighted;
        assert_eq!(strategy_for(&config).name(), "StakeWeighted");
    }

    #[test]
    fn test_seed_period_resets_collation_bookkeeping() {
        let mut state = ShardState::new(StateConfig::default());
        state.add_gas_used(100);
        let block = Block::new(4, H256::repeat_byte(3), Address::zero(), 0);

        seed_period(&mut state, &block);
        assert_eq!(state.gas_used(), 0);
        assert_eq!(state.block_hash(4), Some(block.hash));
    }

    #[test]
    fn test_reward_overflow_is_consensus_error() {
        let coinbase = Address::repeat_byte(5);
        let mut state = ShardState::with_balances(StateConfig::default(), &[(coinbase, U256::MAX)]);
        let err = credit_reward("FixedDifficulty", &mut state, coinbase).unwrap_err();
        assert!(matches!(err, CollatorError::Consensus { .. }));
        assert_eq!(state.get_balance(&coinbase), U256::MAX);
    }
}
