//! Transaction Execution Module
//!
//! This module applies single transactions to a shard state.
//! The collation applier and builder only see the `TransactionExecutor` trait;
//! `TransferExecutor` is the value-transfer implementation shipped with the crate.

mod executor;
pub use executor::{INTRINSIC_GAS, TransferExecutor, intrinsic_gas};

use crate::error::TransactionError;
use crate::state::ShardState;
use crate::{Receipt, Transaction};

/// Single-transaction executor
///
/// On error the executor may have mutated `state`; callers revert through
/// their own checkpoint.
pub trait TransactionExecutor {
    fn apply(&self, state: &mut ShardState, tx: &Transaction) -> Result<Receipt, TransactionError>;
}
