//! Error Module
//!
//! Typed errors for collation application and construction. Callers can tell
//! an invalid collation apart from a chain context that could not be resolved
//! through [`CollatorError::is_invalid_collation`].

use crate::ShardId;
use ethers::types::{H256, U256};
use thiserror::Error;

/// Classification of a single-transaction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The transaction carries a value the state cannot accept (nonce, balance, gas)
    InvalidValue,
    /// The transaction violates a hard assertion (signature, gas budget)
    AssertionFailed,
}

/// Single-transaction execution error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Invalid transaction signature")]
    InvalidSignature,

    #[error("Invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("Gas limit {gas_limit} below intrinsic gas {intrinsic}")]
    IntrinsicGas { gas_limit: u64, intrinsic: u64 },

    #[error("Collation gas limit reached: {used} used, {requested} requested, {limit} allowed")]
    GasLimitReached { used: u64, requested: u64, limit: u64 },

    #[error("Arithmetic overflow while applying transaction")]
    Overflow,
}

impl TransactionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TransactionError::InvalidSignature | TransactionError::GasLimitReached { .. } => {
                ErrorClass::AssertionFailed
            }
            TransactionError::InvalidNonce { .. }
            | TransactionError::InsufficientBalance { .. }
            | TransactionError::IntrinsicGas { .. }
            | TransactionError::Overflow => ErrorClass::InvalidValue,
        }
    }
}

/// Which committed root disagreed with the recomputed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootField {
    StateRoot,
    ReceiptRoot,
}

impl std::fmt::Display for RootField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootField::StateRoot => write!(f, "state_root"),
            RootField::ReceiptRoot => write!(f, "receipt_root"),
        }
    }
}

/// Collation state-transition errors
#[derive(Debug, Error)]
pub enum CollatorError {
    #[error("Invalid transaction tree: header commits {expected:?}, transactions hash to {computed:?}")]
    InvalidTransactionTree { expected: H256, computed: H256 },

    #[error("Execution result mismatch on {field}: header commits {expected:?}, computed {computed:?}")]
    ExecutionResultMismatch {
        field: RootField,
        expected: H256,
        computed: H256,
    },

    #[error("Transaction #{index} ({tx_hash:?}) failed: {source}")]
    TransactionExecutionFailed {
        index: usize,
        tx_hash: H256,
        #[source]
        source: TransactionError,
    },

    #[error("Unknown shard: {0}")]
    UnknownShard(ShardId),

    #[error("Unknown collation {hash:?} on shard {shard_id}")]
    UnknownCollation { shard_id: ShardId, hash: H256 },

    #[error("Missing period start block for period {period}")]
    MissingPeriodStartBlock { period: u64 },

    #[error("Period start mismatch: header references {claimed:?}, chain resolves {resolved:?}")]
    PeriodStartMismatch { claimed: H256, resolved: H256 },

    #[error("Invalid collation seal under {strategy} consensus")]
    InvalidSeal { strategy: &'static str },

    #[error("Consensus {strategy} failed: {reason}")]
    Consensus {
        strategy: &'static str,
        reason: String,
    },

    #[error("Stale checkpoint {id}: already reverted or released")]
    StaleCheckpoint { id: u64 },
}

impl CollatorError {
    /// `true` when the collation itself is at fault, `false` when the shard
    /// or main-chain context could not be resolved
    pub fn is_invalid_collation(&self) -> bool {
        matches!(
            self,
            CollatorError::InvalidTransactionTree { .. }
                | CollatorError::ExecutionResultMismatch { .. }
                | CollatorError::TransactionExecutionFailed { .. }
                | CollatorError::PeriodStartMismatch { .. }
                | CollatorError::InvalidSeal { .. }
                | CollatorError::Consensus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CollatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_error_classes() {
        assert_eq!(TransactionError::InvalidSignature.class(), ErrorClass::AssertionFailed);
        assert_eq!(
            TransactionError::InvalidNonce { expected: 1, got: 0 }.class(),
            ErrorClass::InvalidValue
        );
    }

    #[test]
    fn test_invalid_collation_vs_context() {
        let tree = CollatorError::InvalidTransactionTree {
            expected: H256::zero(),
            computed: H256::repeat_byte(1),
        };
        assert!(tree.is_invalid_collation());
        assert!(!CollatorError::UnknownShard(7).is_invalid_collation());
        assert!(!CollatorError::MissingPeriodStartBlock { period: 0 }.is_invalid_collation());
    }

    #[test]
    fn test_error_messages() {
        let err = CollatorError::MissingPeriodStartBlock { period: 4 };
        assert!(err.to_string().contains("period 4"));

        let err = CollatorError::TransactionExecutionFailed {
            index: 2,
            tx_hash: H256::zero(),
            source: TransactionError::InvalidNonce { expected: 3, got: 5 },
        };
        assert!(err.to_string().contains("#2"));
        assert!(err.to_string().contains("expected 3, got 5"));
    }
}
