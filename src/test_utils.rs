//! Shared fixtures for unit tests

use crate::Transaction;
use crate::execution::INTRINSIC_GAS;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, Signature, U256};

/// Deterministic wallet derived from a small seed
pub fn wallet(seed: u64) -> LocalWallet {
    LocalWallet::from_bytes(H256::from_low_u64_be(seed).as_bytes()).unwrap()
}

pub fn signed_tx(
    signer: &LocalWallet,
    to: Address,
    value: u64,
    nonce: u64,
    gas_price: u64,
    gas_limit: u64,
    data: Vec<u8>,
) -> Transaction {
    let mut tx = Transaction {
        from: signer.address(),
        to,
        value: U256::from(value),
        nonce,
        gas_price: U256::from(gas_price),
        gas_limit,
        data,
        signature: Signature {
            r: U256::zero(),
            s: U256::zero(),
            v: 0,
        },
    };
    tx.signature = signer.sign_hash(tx.signing_hash()).unwrap();
    tx
}

/// Plain transfer at gas price 1 with exactly the intrinsic gas allowance
pub fn signed_transfer(signer: &LocalWallet, to: Address, value: u64, nonce: u64) -> Transaction {
    signed_tx(signer, to, value, nonce, 1, INTRINSIC_GAS, Vec::new())
}
