//! Transaction Queue Module
//!
//! This module implements the queue of pending shard transactions.
//! Transactions are stored in arrival order and handed out by a scheduling policy.

use crate::Transaction;
use crate::scheduler::{SchedulingPolicy, SchedulingPolicyType, create_policy};
use ethers::types::H256;

/// Transaction together with its arrival position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTransaction {
    pub sequence: u64,
    pub tx: Transaction,
}

/// Queue of pending transactions
///
/// Popped transactions leave the queue; the builder hands back the ones it
/// defers through [`TransactionQueue::requeue`], which restores their
/// arrival position.
pub struct TransactionQueue {
    /// Pending transactions, sorted by `sequence`
    pending: Vec<QueuedTransaction>,
    /// Next arrival number to assign
    next_sequence: u64,
    policy: Box<dyn SchedulingPolicy>,
}

impl TransactionQueue {
    /// Creates a new empty queue ordered by the given policy
    pub fn new(policy_type: SchedulingPolicyType) -> Self {
        Self {
            pending: Vec::new(),
            next_sequence: 0,
            policy: create_policy(policy_type),
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Add a transaction at the back of the arrival order
    pub fn add(&mut self, tx: Transaction) {
        self.pending.push(QueuedTransaction {
            sequence: self.next_sequence,
            tx,
        });
        self.next_sequence += 1;
    }

    /// Remove and return the transaction the policy offers next
    pub fn pop_next(&mut self) -> Option<QueuedTransaction> {
        let index = self.policy.select(&self.pending)?;
        Some(self.pending.remove(index))
    }

    /// Put previously popped transactions back at their arrival position
    pub fn requeue(&mut self, transactions: Vec<QueuedTransaction>) {
        for queued in transactions {
            let index = self
                .pending
                .partition_point(|pending| pending.sequence < queued.sequence);
            self.pending.insert(index, queued);
        }
    }

    pub fn contains(&self, tx_hash: &H256) -> bool {
        self.pending.iter().any(|queued| queued.tx.hash() == *tx_hash)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
