use super::journal::{Checkpoint, Journal, JournalEntry};
use crate::config::StateConfig;
use crate::error::{CollatorError, Result};
use crate::merkle::{committed_root, merkle_root};
use crate::{Account, Receipt};
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use std::collections::BTreeMap;
use tracing::warn;

/// Account state of one shard
///
/// Every mutation is recorded in the journal, so `revert` restores accounts,
/// receipts, the block-hash registry and the gas counter no matter which code
/// path (executor, consensus strategy) made the change.
#[derive(Debug, Clone)]
pub struct ShardState {
    config: StateConfig,
    accounts: BTreeMap<Address, Account>,
    receipts: Vec<Receipt>,
    block_hashes: BTreeMap<u64, H256>,
    gas_used: u64,
    journal: Journal,
}

impl ShardState {
    pub fn new(config: StateConfig) -> Self {
        Self {
            config,
            accounts: BTreeMap::new(),
            receipts: Vec::new(),
            block_hashes: BTreeMap::new(),
            gas_used: 0,
            journal: Journal::default(),
        }
    }

    /// Genesis state with pre-funded accounts
    pub fn with_balances(config: StateConfig, balances: &[(Address, U256)]) -> Self {
        let mut state = Self::new(config);
        for (address, balance) in balances {
            state.accounts.insert(
                *address,
                Account {
                    balance: *balance,
                    nonce: 0,
                },
            );
        }
        state
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn account(&self, address: &Address) -> Account {
        self.accounts.get(address).copied().unwrap_or_default()
    }

    pub fn get_balance(&self, address: &Address) -> U256 {
        self.account(address).balance
    }

    pub fn get_nonce(&self, address: &Address) -> u64 {
        self.account(address).nonce
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn gas_used(&self) -> u64 {
        self.gas_used
    }

    pub fn block_hash(&self, number: u64) -> Option<H256> {
        self.block_hashes.get(&number).copied()
    }

    /// Capture the current state; O(1)
    pub fn snapshot(&mut self) -> Checkpoint {
        self.journal.checkpoint()
    }

    /// Undo every mutation made since `checkpoint`
    ///
    /// Checkpoints taken after `checkpoint` are invalidated along with it.
    pub fn revert(&mut self, checkpoint: Checkpoint) -> Result<()> {
        let entries = self
            .journal
            .rewind(checkpoint)
            .ok_or(CollatorError::StaleCheckpoint { id: checkpoint.id() })?;

        for entry in entries.into_iter().rev() {
            match entry {
                JournalEntry::Account { address, previous } => match previous {
                    Some(account) => {
                        self.accounts.insert(address, account);
                    }
                    None => {
                        self.accounts.remove(&address);
                    }
                },
                JournalEntry::ReceiptPushed => {
                    self.receipts.pop();
                }
                JournalEntry::ReceiptsCleared { previous } => self.receipts = previous,
                JournalEntry::BlockHash { number, previous } => match previous {
                    Some(hash) => {
                        self.block_hashes.insert(number, hash);
                    }
                    None => {
                        self.block_hashes.remove(&number);
                    }
                },
                JournalEntry::GasUsed { previous } => self.gas_used = previous,
            }
        }

        Ok(())
    }

    /// Keep the mutations made since `checkpoint` but stop tracking it
    ///
    /// Enclosing checkpoints can still revert these mutations.
    pub fn release(&mut self, checkpoint: Checkpoint) -> Result<()> {
        if self.journal.release(checkpoint) {
            Ok(())
        } else {
            Err(CollatorError::StaleCheckpoint { id: checkpoint.id() })
        }
    }

    /// Drop the whole journal once the state is accepted as canonical
    ///
    /// Refused while a checkpoint is live: an enclosing transition must
    /// still be able to revert.
    pub(crate) fn commit_journal(&mut self) -> bool {
        if self.journal.has_live_checkpoints() {
            warn!("Journal commit refused: {} live checkpoint changes", self.journal.len());
            return false;
        }
        self.journal.clear();
        true
    }

    /// Number of mutations tracked by live checkpoints
    pub fn pending_changes(&self) -> usize {
        self.journal.len()
    }

    fn write_account(&mut self, address: Address, account: Account) {
        let previous = self.accounts.insert(address, account);
        self.journal.record(JournalEntry::Account { address, previous });
    }

    pub fn set_balance(&mut self, address: Address, balance: U256) {
        let account = Account {
            balance,
            ..self.account(&address)
        };
        self.write_account(address, account);
    }

    pub fn add_balance(&mut self, address: Address, amount: U256) -> Option<()> {
        let balance = self.get_balance(&address).checked_add(amount)?;
        self.set_balance(address, balance);
        Some(())
    }

    pub fn sub_balance(&mut self, address: Address, amount: U256) -> Option<()> {
        let balance = self.get_balance(&address).checked_sub(amount)?;
        self.set_balance(address, balance);
        Some(())
    }

    pub fn increment_nonce(&mut self, address: Address) {
        let current = self.account(&address);
        self.write_account(
            address,
            Account {
                nonce: current.nonce + 1,
                ..current
            },
        );
    }

    pub fn add_gas_used(&mut self, gas: u64) {
        self.journal.record(JournalEntry::GasUsed {
            previous: self.gas_used,
        });
        self.gas_used += gas;
    }

    pub fn push_receipt(&mut self, receipt: Receipt) {
        self.receipts.push(receipt);
        self.journal.record(JournalEntry::ReceiptPushed);
    }

    pub fn set_block_hash(&mut self, number: u64, hash: H256) {
        let previous = self.block_hashes.insert(number, hash);
        self.journal.record(JournalEntry::BlockHash { number, previous });
    }

    /// Reset per-collation bookkeeping (receipts, gas counter)
    pub fn begin_collation(&mut self) {
        let previous = std::mem::take(&mut self.receipts);
        self.journal.record(JournalEntry::ReceiptsCleared { previous });
        self.journal.record(JournalEntry::GasUsed {
            previous: self.gas_used,
        });
        self.gas_used = 0;
    }

    /// Commitment to accounts and the block-hash registry
    ///
    /// Empty accounts (zero balance, zero nonce) are not committed.
    pub fn state_root(&self) -> H256 {
        let account_leaves: Vec<H256> = self
            .accounts
            .iter()
            .filter(|(_, account)| **account != Account::default())
            .map(|(address, account)| {
                let mut data = Vec::with_capacity(60);
                data.extend_from_slice(address.as_bytes());
                let mut balance = [0u8; 32];
                account.balance.to_big_endian(&mut balance);
                data.extend_from_slice(&balance);
                data.extend_from_slice(&account.nonce.to_be_bytes());
                H256::from(keccak256(data))
            })
            .collect();

        let registry_leaves: Vec<H256> = self
            .block_hashes
            .iter()
            .map(|(number, hash)| {
                let mut data = Vec::with_capacity(40);
                data.extend_from_slice(&number.to_be_bytes());
                data.extend_from_slice(hash.as_bytes());
                H256::from(keccak256(data))
            })
            .collect();

        let mut data = [0u8; 64];
        data[..32].copy_from_slice(merkle_root(&account_leaves).as_bytes());
        data[32..].copy_from_slice(merkle_root(&registry_leaves).as_bytes());
        H256::from(keccak256(data))
    }

    /// Commitment to the receipts of the current collation
    pub fn receipt_root(&self) -> H256 {
        let leaves: Vec<H256> = self.receipts.iter().map(Receipt::hash).collect();
        committed_root(&leaves)
    }
}

/// Equality over observable fields; the journal is bookkeeping
impl PartialEq for ShardState {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.accounts == other.accounts
            && self.receipts == other.receipts
            && self.block_hashes == other.block_hashes
            && self.gas_used == other.gas_used
    }
}

impl Eq for ShardState {}
