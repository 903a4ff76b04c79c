//! Transition Applier
//!
//! Replays a collation someone else built and checks every commitment in its
//! header. The whole replay runs under one `StateGuard`: on any error the
//! state is exactly what it was before the call.

use super::commitments::{validate_transaction_tree, verify_execution_results};
use crate::chain::MainChain;
use crate::consensus::strategy_for;
use crate::diagnostics::{CollationEvent, DiagnosticsSink};
use crate::error::{CollatorError, Result};
use crate::execution::TransactionExecutor;
use crate::period::resolve_for_expected_period;
use crate::state::{ShardState, StateGuard};
use crate::{Block, Collation};
use ethers::types::H256;
use tracing::error;

/// Apply a collation to `state`, atomically
///
/// Steps: consensus initialize, seal check, transaction tree check,
/// transactions in order, consensus finalize, state and receipt root check.
///
/// # Returns
/// * `Ok(state)` now holding the collation's post-state
/// * `Err` with `state` untouched
pub fn apply_collation<'s>(
    state: &'s mut ShardState,
    collation: &Collation,
    period_start_prevblock: &Block,
    executor: &dyn TransactionExecutor,
    sink: &dyn DiagnosticsSink,
) -> Result<&'s mut ShardState> {
    let collation_hash = collation.hash();
    sink.record(CollationEvent::ApplyStarted {
        collation_hash,
        tx_count: collation.transactions.len(),
    });

    let mut guard = StateGuard::new(state);
    match run_transition(
        &mut guard,
        collation,
        collation_hash,
        period_start_prevblock,
        executor,
        sink,
    ) {
        Ok(()) => {
            guard.commit()?;
            sink.record(CollationEvent::ApplySucceeded {
                collation_hash,
                state_root: state.state_root(),
            });
            Ok(state)
        }
        Err(e) => {
            if let Err(revert_err) = guard.rollback() {
                error!("Failed to revert collation {:?}: {}", collation_hash, revert_err);
            }
            sink.record(CollationEvent::ApplyReverted {
                collation_hash,
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

fn run_transition(
    state: &mut ShardState,
    collation: &Collation,
    collation_hash: H256,
    period_start_prevblock: &Block,
    executor: &dyn TransactionExecutor,
    sink: &dyn DiagnosticsSink,
) -> Result<()> {
    let strategy = strategy_for(state.config());
    strategy.initialize(state, period_start_prevblock)?;

    if !strategy.check_seal(state, &collation.header, period_start_prevblock) {
        if state.config().enforce_seal {
            return Err(CollatorError::InvalidSeal {
                strategy: strategy.name(),
            });
        }
        sink.record(CollationEvent::SealAdvisory {
            collation_hash,
            strategy: strategy.name(),
        });
    }

    validate_transaction_tree(collation)?;

    for (index, tx) in collation.transactions.iter().enumerate() {
        executor
            .apply(state, tx)
            .map_err(|source| CollatorError::TransactionExecutionFailed {
                index,
                tx_hash: tx.hash(),
                source,
            })?;
    }

    strategy.finalize(state, collation.header.coinbase)?;
    verify_execution_results(state, &collation.header)
}

/// Verify a received collation against the main chain
///
/// Resolves the period start block the header's expected period references
/// and checks the header links to it before touching `state`.
pub fn verify_collation<'s>(
    chain: &dyn MainChain,
    state: &'s mut ShardState,
    collation: &Collation,
    executor: &dyn TransactionExecutor,
    sink: &dyn DiagnosticsSink,
) -> Result<&'s mut ShardState> {
    let context = resolve_for_expected_period(chain, collation.header.expected_period_number)?;

    if context.period_start_prevhash != collation.header.period_start_prevhash {
        return Err(CollatorError::PeriodStartMismatch {
            claimed: collation.header.period_start_prevhash,
            resolved: context.period_start_prevhash,
        });
    }

    apply_collation(
        state,
        collation,
        &context.period_start_prevblock,
        executor,
        sink,
    )
}
