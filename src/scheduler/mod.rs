//! Transaction Scheduling Module
//!
//! This module implements scheduling policies that determine the order in which
//! queued transactions are offered to the collation builder, using the Strategy
//! design pattern:
//! - FCFS (First-Come-First-Served): Transactions ordered by arrival
//! - FeePriority: Transactions ordered by gas price (highest first)

mod policies;


pub use policies::{
    FcfsPolicy, FeePriorityPolicy, SchedulingPolicy, SchedulingPolicyType, create_policy,
};
