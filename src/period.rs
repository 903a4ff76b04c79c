//! Period Context Resolution
//!
//! Derives the main-chain block a shard period references. Resolution only
//! reads the chain, so two calls against the same chain state agree.

use crate::chain::MainChain;
use crate::error::{CollatorError, Result};
use crate::{Block, PeriodContext};

/// Block whose hash the chain reports as the start reference of `period`
pub fn resolve_period_start(chain: &dyn MainChain, period: u64) -> Result<Block> {
    chain
        .get_period_start_prevhash(period)
        .and_then(|hash| chain.get_block(&hash))
        .ok_or(CollatorError::MissingPeriodStartBlock { period })
}

/// Period start reference for collations whose expected period is
/// `expected_period_number`: the start block of the period before it
pub fn resolve_for_expected_period(
    chain: &dyn MainChain,
    expected_period_number: u64,
) -> Result<PeriodContext> {
    let previous = expected_period_number
        .checked_sub(1)
        .ok_or(CollatorError::MissingPeriodStartBlock { period: 0 })?;
    let block = resolve_period_start(chain, previous)?;

    Ok(PeriodContext {
        expected_period_number,
        period_start_prevhash: block.hash,
        period_start_prevblock: block,
    })
}

/// Context for a collation built now, from the chain's current period
pub fn resolve_period_context(chain: &dyn MainChain) -> Result<PeriodContext> {
    resolve_for_expected_period(chain, chain.get_expected_period_number())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::InMemoryMainChain;
    use ethers::types::Address;

    fn chain(blocks: u64) -> InMemoryMainChain {
        let mut chain = InMemoryMainChain::new(5);
        for i in 0..blocks {
            chain.mine_block(Address::repeat_byte(1), 1_000 + i);
        }
        chain
    }

    #[test]
    fn test_resolves_previous_period_start() {
        let chain = chain(10);
        let context = resolve_period_context(&chain).unwrap();
        assert_eq!(context.expected_period_number, 2);
        assert_eq!(context.period_start_prevblock.number, 4);
        assert_eq!(context.period_start_prevhash, context.period_start_prevblock.hash);
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let chain = chain(12);
        assert_eq!(
            resolve_period_context(&chain).unwrap(),
            resolve_period_context(&chain).unwrap()
        );
    }

    #[test]
    fn test_first_periods_have_no_start_block() {
        // expected period 0 has no predecessor, period 1 would need period 0's start
        for blocks in [0, 3, 4, 8] {
            let err = resolve_period_context(&chain(blocks)).unwrap_err();
            assert!(matches!(err, CollatorError::MissingPeriodStartBlock { .. }));
        }
    }

    #[test]
    fn test_unmined_period() {
        let err = resolve_period_start(&chain(3), 4).unwrap_err();
        assert!(matches!(err, CollatorError::MissingPeriodStartBlock { period: 4 }));
    }
}
