//! Diagnostics Module
//!
//! Both collation entry points report what they do to an explicit sink
//! instead of a process-wide logger. `TracingSink` forwards to `tracing`;
//! `RecordingSink` keeps the events for inspection.

use crate::ShardId;
use ethers::types::H256;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Events emitted while applying or building a collation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollationEvent {
    ApplyStarted {
        collation_hash: H256,
        tx_count: usize,
    },
    ApplySucceeded {
        collation_hash: H256,
        state_root: H256,
    },
    ApplyReverted {
        collation_hash: H256,
        reason: String,
    },
    SealAdvisory {
        collation_hash: H256,
        strategy: &'static str,
    },
    BuildStarted {
        shard_id: ShardId,
        parent_collation_hash: H256,
    },
    TransactionIncluded {
        tx_hash: H256,
        gas_used: u64,
    },
    TransactionDropped {
        tx_hash: H256,
        reason: String,
    },
    TransactionDeferred {
        tx_hash: H256,
    },
    BuildFinished {
        collation_hash: H256,
        tx_count: usize,
    },
}

/// Receiver of collation diagnostics
pub trait DiagnosticsSink {
    fn record(&self, event: CollationEvent);
}

/// Sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: CollationEvent) {
        match event {
            CollationEvent::ApplyStarted {
                collation_hash,
                tx_count,
            } => debug!("Applying collation {:?} with {} transactions", collation_hash, tx_count),
            CollationEvent::ApplySucceeded {
                collation_hash,
                state_root,
            } => info!("Applied collation {:?}, state root {:?}", collation_hash, state_root),
            CollationEvent::ApplyReverted {
                collation_hash,
                reason,
            } => warn!("Reverted collation {:?}: {}", collation_hash, reason),
            CollationEvent::SealAdvisory {
                collation_hash,
                strategy,
            } => warn!("Seal check failed for {:?} under {} (advisory)", collation_hash, strategy),
            CollationEvent::BuildStarted {
                shard_id,
                parent_collation_hash,
            } => info!("Creating a collation on shard {} over {:?}", shard_id, parent_collation_hash),
            CollationEvent::TransactionIncluded { tx_hash, gas_used } => {
                debug!("Included transaction {:?} ({} gas)", tx_hash, gas_used)
            }
            CollationEvent::TransactionDropped { tx_hash, reason } => {
                warn!("Dropped transaction {:?}: {}", tx_hash, reason)
            }
            CollationEvent::TransactionDeferred { tx_hash } => {
                debug!("Deferred transaction {:?} to a later collation", tx_hash)
            }
            CollationEvent::BuildFinished {
                collation_hash,
                tx_count,
            } => info!("Created collation {:?} with {} transactions", collation_hash, tx_count),
        }
    }
}

/// Sink that stores every event
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CollationEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far; a poisoned lock still yields them
    pub fn events(&self) -> Vec<CollationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn record(&self, event: CollationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
