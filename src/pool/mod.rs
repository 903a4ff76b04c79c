//! Transaction Pool Module
//!
//! This module holds pending transactions waiting to be included in a collation.

mod tx_pool;

pub use tx_pool::{QueuedTransaction, TransactionQueue};
