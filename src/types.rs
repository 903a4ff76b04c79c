use ethers::types::{Address, H256, Signature, SignatureError, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

/// Shard identifier
pub type ShardId = u64;

fn push_u256(data: &mut Vec<u8>, value: U256) {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    data.extend_from_slice(&bytes);
}

/// Transaction submitted to a shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub data: Vec<u8>,
    pub signature: Signature,
}

impl Transaction {
    /// Hash signed by the sender
    ///
    /// Covers every field except the signature itself.
    pub fn signing_hash(&self) -> H256 {
        let mut data = Vec::with_capacity(128 + self.data.len());
        data.extend_from_slice(self.from.as_bytes());
        data.extend_from_slice(self.to.as_bytes());
        push_u256(&mut data, self.value);
        data.extend_from_slice(&self.nonce.to_be_bytes());
        push_u256(&mut data, self.gas_price);
        data.extend_from_slice(&self.gas_limit.to_be_bytes());
        data.extend_from_slice(&(self.data.len() as u64).to_be_bytes());
        data.extend_from_slice(&self.data);

        H256::from(keccak256(data))
    }

    /// Identity of the signed transaction, used as the leaf of `tx_list_root`
    pub fn hash(&self) -> H256 {
        let mut data = self.signing_hash().as_bytes().to_vec();
        data.extend_from_slice(&self.signature.to_vec());
        H256::from(keccak256(data))
    }

    /// Recover the address that produced `signature`
    pub fn sender(&self) -> Result<Address, SignatureError> {
        self.signature.recover(self.signing_hash())
    }
}

/// Account entry of a shard state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: U256,
    pub nonce: u64,
}

/// Outcome of one applied transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: H256,
    pub success: bool,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
}

impl Receipt {
    pub fn hash(&self) -> H256 {
        let mut data = Vec::with_capacity(49);
        data.extend_from_slice(self.tx_hash.as_bytes());
        data.push(self.success as u8);
        data.extend_from_slice(&self.gas_used.to_be_bytes());
        data.extend_from_slice(&self.cumulative_gas_used.to_be_bytes());
        H256::from(keccak256(data))
    }
}

/// Collation header
///
/// Roots are placeholders (`H256::zero()`) until the builder commits the
/// execution results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollationHeader {
    pub shard_id: ShardId,
    pub parent_collation_hash: H256,
    pub coinbase: Address,
    pub expected_period_number: u64,
    pub period_start_prevhash: H256,
    pub state_root: H256,
    pub receipt_root: H256,
    pub tx_list_root: H256,
}

impl CollationHeader {
    /// Skeleton header bound to a coinbase, everything else unset
    pub fn new(coinbase: Address) -> Self {
        Self {
            coinbase,
            ..Default::default()
        }
    }

    /// Identity of the collation in its shard chain
    pub fn hash(&self) -> H256 {
        let mut data = Vec::with_capacity(220);
        data.extend_from_slice(&self.shard_id.to_be_bytes());
        data.extend_from_slice(self.parent_collation_hash.as_bytes());
        data.extend_from_slice(self.coinbase.as_bytes());
        data.extend_from_slice(&self.expected_period_number.to_be_bytes());
        data.extend_from_slice(self.period_start_prevhash.as_bytes());
        data.extend_from_slice(self.state_root.as_bytes());
        data.extend_from_slice(self.receipt_root.as_bytes());
        data.extend_from_slice(self.tx_list_root.as_bytes());
        H256::from(keccak256(data))
    }
}

/// Header plus the ordered transaction list
///
/// Replay must use `transactions` in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collation {
    pub header: CollationHeader,
    pub transactions: Vec<Transaction>,
}

impl Collation {
    pub fn new(header: CollationHeader) -> Self {
        Self {
            header,
            transactions: Vec::new(),
        }
    }

    pub fn hash(&self) -> H256 {
        self.header.hash()
    }
}

/// Main-chain block, as far as collations reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub hash: H256,
    pub parent_hash: H256,
    pub coinbase: Address,
    pub timestamp: u64,
}

impl Block {
    pub fn new(number: u64, parent_hash: H256, coinbase: Address, timestamp: u64) -> Self {
        let mut data = Vec::with_capacity(80);
        data.extend_from_slice(&number.to_be_bytes());
        data.extend_from_slice(parent_hash.as_bytes());
        data.extend_from_slice(coinbase.as_bytes());
        data.extend_from_slice(&timestamp.to_be_bytes());

        Self {
            number,
            hash: H256::from(keccak256(data)),
            parent_hash,
            coinbase,
            timestamp,
        }
    }
}

/// Main-chain checkpoint a shard period references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodContext {
    pub expected_period_number: u64,
    pub period_start_prevhash: H256,
    pub period_start_prevblock: Block,
}
