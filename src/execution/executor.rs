use super::TransactionExecutor;
use crate::error::TransactionError;
use crate::state::ShardState;
use crate::{Receipt, Transaction};
use ethers::types::U256;
use tracing::{debug, warn};

/// Base gas charged for every transaction
pub const INTRINSIC_GAS: u64 = 21_000;

const GAS_PER_ZERO_BYTE: u64 = 4;
const GAS_PER_NONZERO_BYTE: u64 = 16;

/// Gas a transaction burns before doing anything
pub fn intrinsic_gas(tx: &Transaction) -> u64 {
    tx.data.iter().fold(INTRINSIC_GAS, |gas, byte| {
        gas + if *byte == 0 {
            GAS_PER_ZERO_BYTE
        } else {
            GAS_PER_NONZERO_BYTE
        }
    })
}

/// Value-transfer executor
///
/// Verifies signature, nonce, intrinsic gas, balance and the collation gas
/// budget, then charges `intrinsic_gas * gas_price` (burned), moves `value`
/// and bumps the sender nonce. Checks run before any mutation.
#[derive(Debug, Clone)]
pub struct TransferExecutor {
    /// Total gas all transactions of one collation may use
    collation_gas_limit: u64,
}

impl TransferExecutor {
    pub fn new(collation_gas_limit: u64) -> Self {
        Self {
            collation_gas_limit,
        }
    }

    /// Verify the transaction signature
    fn verify_signature(&self, tx: &Transaction) -> Result<(), TransactionError> {
        let recovered = tx.sender().map_err(|_| TransactionError::InvalidSignature)?;

        if recovered != tx.from {
            warn!("Signature verification failed: signer mismatch");
            return Err(TransactionError::InvalidSignature);
        }

        Ok(())
    }

    /// Check the nonce is exactly the sender's current nonce
    fn check_nonce(&self, state: &ShardState, tx: &Transaction) -> Result<(), TransactionError> {
        let expected = state.get_nonce(&tx.from);

        if tx.nonce != expected {
            debug!(
                "Nonce check failed for {:?}: expected {}, got {}",
                tx.from, expected, tx.nonce
            );
            return Err(TransactionError::InvalidNonce {
                expected,
                got: tx.nonce,
            });
        }

        Ok(())
    }

    /// Check the sender can pay for value plus the full gas allowance
    fn check_balance(&self, state: &ShardState, tx: &Transaction) -> Result<(), TransactionError> {
        let available = state.get_balance(&tx.from);
        let required = U256::from(tx.gas_limit)
            .checked_mul(tx.gas_price)
            .and_then(|gas_cost| gas_cost.checked_add(tx.value))
            .ok_or(TransactionError::Overflow)?;

        if available < required {
            debug!(
                "Insufficient balance for {:?}: required {}, available {}",
                tx.from, required, available
            );
            return Err(TransactionError::InsufficientBalance {
                required,
                available,
            });
        }

        Ok(())
    }

    fn check_gas_budget(&self, state: &ShardState, tx: &Transaction) -> Result<(), TransactionError> {
        let used = state.gas_used();
        if used.saturating_add(tx.gas_limit) > self.collation_gas_limit {
            return Err(TransactionError::GasLimitReached {
                used,
                requested: tx.gas_limit,
                limit: self.collation_gas_limit,
            });
        }
        Ok(())
    }
}

impl Default for TransferExecutor {
    fn default() -> Self {
        Self::new(crate::config::CollationConfig::default().max_gas)
    }
}

impl TransactionExecutor for TransferExecutor {
    fn apply(&self, state: &mut ShardState, tx: &Transaction) -> Result<Receipt, TransactionError> {
        self.verify_signature(tx)?;
        self.check_nonce(state, tx)?;

        let gas_used = intrinsic_gas(tx);
        if tx.gas_limit < gas_used {
            return Err(TransactionError::IntrinsicGas {
                gas_limit: tx.gas_limit,
                intrinsic: gas_used,
            });
        }

        self.check_balance(state, tx)?;
        self.check_gas_budget(state, tx)?;

        let fee = U256::from(gas_used)
            .checked_mul(tx.gas_price)
            .ok_or(TransactionError::Overflow)?;
        state
            .sub_balance(tx.from, fee)
            .ok_or(TransactionError::Overflow)?;
        state
            .sub_balance(tx.from, tx.value)
            .ok_or(TransactionError::Overflow)?;
        state
            .add_balance(tx.to, tx.value)
            .ok_or(TransactionError::Overflow)?;
        state.increment_nonce(tx.from);
        state.add_gas_used(gas_used);

        let receipt = Receipt {
            tx_hash: tx.hash(),
            success: true,
            gas_used,
            cumulative_gas_used: state.gas_used(),
        };
        state.push_receipt(receipt.clone());

        Ok(receipt)
    }
}
