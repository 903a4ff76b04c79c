//! Scheduling Policies Module
//!
//! Each policy picks the next transaction out of the pending set. Ties are
//! always broken by arrival order so selection is deterministic.

use crate::pool::QueuedTransaction;
use serde::{Deserialize, Serialize};

/// Policy selector, as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingPolicyType {
    #[serde(rename = "FCFS")]
    Fcfs,
    FeePriority,
}

/// Scheduling policy trait
pub trait SchedulingPolicy: Send + Sync {
    /// Name of the policy (for logging)
    fn name(&self) -> &'static str;

    /// Index into `pending` of the transaction to offer next
    ///
    /// `pending` is sorted by arrival.
    fn select(&self, pending: &[QueuedTransaction]) -> Option<usize>;
}

/// First-Come-First-Served
#[derive(Debug, Clone, Copy, Default)]
pub struct FcfsPolicy;

impl SchedulingPolicy for FcfsPolicy {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn select(&self, pending: &[QueuedTransaction]) -> Option<usize> {
        if pending.is_empty() { None } else { Some(0) }
    }
}

/// Highest gas price first
#[derive(Debug, Clone, Copy, Default)]
pub struct FeePriorityPolicy;

impl SchedulingPolicy for FeePriorityPolicy {
    fn name(&self) -> &'static str {
        "FeePriority"
    }

    fn select(&self, pending: &[QueuedTransaction]) -> Option<usize> {
        // `max_by_key` keeps the last maximum; reverse so the earliest arrival wins ties
        pending
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, queued)| queued.tx.gas_price)
            .map(|(index, _)| index)
    }
}

/// Factory for policy instances
pub fn create_policy(policy_type: SchedulingPolicyType) -> Box<dyn SchedulingPolicy> {
    match policy_type {
        SchedulingPolicyType::Fcfs => Box::new(FcfsPolicy),
        SchedulingPolicyType::FeePriority => Box::new(FeePriorityPolicy),
    }
}
