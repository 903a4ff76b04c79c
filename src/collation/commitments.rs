//! Commitments a collation header carries over its transactions and the
//! state they produce.

use crate::error::{CollatorError, Result, RootField};
use crate::merkle::committed_root;
use crate::state::ShardState;
use crate::{Collation, CollationHeader, Transaction};
use ethers::types::H256;

/// Commitment to the ordered transaction list
pub fn tx_list_root(transactions: &[Transaction]) -> H256 {
    let leaves: Vec<H256> = transactions.iter().map(Transaction::hash).collect();
    committed_root(&leaves)
}

/// Check the header's `tx_list_root` binds the collation's transactions
pub fn validate_transaction_tree(collation: &Collation) -> Result<()> {
    let computed = tx_list_root(&collation.transactions);
    if computed != collation.header.tx_list_root {
        return Err(CollatorError::InvalidTransactionTree {
            expected: collation.header.tx_list_root,
            computed,
        });
    }
    Ok(())
}

/// Check the post-state matches the roots the header commits to
pub fn verify_execution_results(state: &ShardState, header: &CollationHeader) -> Result<()> {
    let state_root = state.state_root();
    if state_root != header.state_root {
        return Err(CollatorError::ExecutionResultMismatch {
            field: RootField::StateRoot,
            expected: header.state_root,
            computed: state_root,
        });
    }

    let receipt_root = state.receipt_root();
    if receipt_root != header.receipt_root {
        return Err(CollatorError::ExecutionResultMismatch {
            field: RootField::ReceiptRoot,
            expected: header.receipt_root,
            computed: receipt_root,
        });
    }

    Ok(())
}

/// Write state, receipt and transaction roots into the header
pub fn set_execution_results(state: &ShardState, collation: &mut Collation) {
    collation.header.state_root = state.state_root();
    collation.header.receipt_root = state.receipt_root();
    collation.header.tx_list_root = tx_list_root(&collation.transactions);
}
