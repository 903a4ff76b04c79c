//! Collation Builder
//!
//! Assembles a new collation on top of a parent collation's post-state:
//! 1. Materialize the parent post-state from the shard chain
//! 2. Resolve the period start block from the main chain
//! 3. Initialize the state through the consensus strategy
//! 4. Greedily apply queued transactions, dropping the ones that fail
//! 5. Finalize, commit roots and stamp linkage metadata
//!
//! Signing the result is left to the caller.

use super::commitments::set_execution_results;
use crate::chain::MainChain;
use crate::config::CollationConfig;
use crate::consensus::strategy_for;
use crate::diagnostics::{CollationEvent, DiagnosticsSink};
use crate::error::{CollatorError, Result, TransactionError};
use crate::execution::TransactionExecutor;
use crate::period::resolve_period_context;
use crate::pool::{QueuedTransaction, TransactionQueue};
use crate::state::{ShardState, StateGuard};
use crate::{Collation, CollationHeader, ShardId};
use ethers::types::{Address, H256};

/// Finished (unsigned) collation plus the post-state it commits to
#[derive(Debug, Clone)]
pub struct BuiltCollation {
    pub collation: Collation,
    pub poststate: ShardState,
}

/// Collation builder
///
/// Bundles the settings that stay fixed across builds: size limits, the
/// transaction executor and the diagnostics sink.
pub struct CollationBuilder<'a> {
    /// Limits on transaction count and declared gas
    config: CollationConfig,
    executor: &'a dyn TransactionExecutor,
    sink: &'a dyn DiagnosticsSink,
}

impl<'a> CollationBuilder<'a> {
    pub fn new(
        config: CollationConfig,
        executor: &'a dyn TransactionExecutor,
        sink: &'a dyn DiagnosticsSink,
    ) -> Self {
        Self {
            config,
            executor,
            sink,
        }
    }

    /// Build a collation for `shard_id` on top of `parent_collation_hash`
    ///
    /// Included and failing transactions leave `queue`; transactions that
    /// would exceed the gas budget (declared here or enforced by the
    /// executor) stay in it. On error nothing is returned
    /// and included transactions are put back.
    pub fn build(
        &self,
        chain: &dyn MainChain,
        shard_id: ShardId,
        parent_collation_hash: H256,
        coinbase: Address,
        queue: &mut TransactionQueue,
    ) -> Result<BuiltCollation> {
        if !chain.has_shard(shard_id) {
            return Err(CollatorError::UnknownShard(shard_id));
        }
        let shard = chain
            .shard(shard_id)
            .ok_or(CollatorError::UnknownShard(shard_id))?;

        self.sink.record(CollationEvent::BuildStarted {
            shard_id,
            parent_collation_hash,
        });

        let mut temp_state = shard.mk_poststate_of_collation_hash(parent_collation_hash)?;
        let context = resolve_period_context(chain)?;

        let strategy = strategy_for(temp_state.config());
        strategy.initialize(&mut temp_state, &context.period_start_prevblock)?;

        let mut collation = Collation::new(CollationHeader::new(coinbase));
        let included = self.add_transactions(&mut temp_state, &mut collation, queue)?;

        if let Err(e) = strategy.finalize(&mut temp_state, coinbase) {
            queue.requeue(included);
            return Err(e);
        }

        set_execution_results(&temp_state, &mut collation);

        collation.header.shard_id = shard_id;
        collation.header.parent_collation_hash = parent_collation_hash;
        collation.header.expected_period_number = context.expected_period_number;
        collation.header.period_start_prevhash = context.period_start_prevhash;

        temp_state.commit_journal();
        self.sink.record(CollationEvent::BuildFinished {
            collation_hash: collation.hash(),
            tx_count: collation.transactions.len(),
        });

        Ok(BuiltCollation {
            collation,
            poststate: temp_state,
        })
    }

    /// Apply queued transactions one by one, each under its own checkpoint
    ///
    /// Returns the included transactions with their queue positions.
    fn add_transactions(
        &self,
        state: &mut ShardState,
        collation: &mut Collation,
        queue: &mut TransactionQueue,
    ) -> Result<Vec<QueuedTransaction>> {
        let mut included = Vec::new();
        let mut deferred = Vec::new();
        let mut gas_declared: u64 = 0;

        while collation.transactions.len() < self.config.max_transactions {
            let Some(queued) = queue.pop_next() else {
                break;
            };
            let tx_hash = queued.tx.hash();

            if gas_declared.saturating_add(queued.tx.gas_limit) > self.config.max_gas {
                self.sink
                    .record(CollationEvent::TransactionDeferred { tx_hash });
                deferred.push(queued);
                continue;
            }

            let mut guard = StateGuard::new(state);
            match self.executor.apply(&mut guard, &queued.tx) {
                Ok(receipt) => {
                    guard.commit()?;
                    gas_declared += queued.tx.gas_limit;
                    self.sink.record(CollationEvent::TransactionIncluded {
                        tx_hash,
                        gas_used: receipt.gas_used,
                    });
                    collation.transactions.push(queued.tx.clone());
                    included.push(queued);
                }
                Err(TransactionError::GasLimitReached { .. }) => {
                    guard.rollback()?;
                    self.sink
                        .record(CollationEvent::TransactionDeferred { tx_hash });
                    deferred.push(queued);
                }
                Err(e) => {
                    guard.rollback()?;
                    self.sink.record(CollationEvent::TransactionDropped {
                        tx_hash,
                        reason: e.to_string(),
                    });
                }
            }
        }

        queue.requeue(deferred);
        Ok(included)
    }
}

/// Build a collation with default limits and return it unsigned
pub fn create_collation(
    chain: &dyn MainChain,
    shard_id: ShardId,
    parent_collation_hash: H256,
    coinbase: Address,
    queue: &mut TransactionQueue,
    executor: &dyn TransactionExecutor,
    sink: &dyn DiagnosticsSink,
) -> Result<Collation> {
    CollationBuilder::new(CollationConfig::default(), executor, sink)
        .build(chain, shard_id, parent_collation_hash, coinbase, queue)
        .map(|built| built.collation)
}
