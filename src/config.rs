//! Configuration Module
//!
//! This module defines all configuration structures for the collator.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::scheduler::SchedulingPolicyType;
use serde::{Deserialize, Serialize};
use std::fs;

/// Main configuration structure
///
/// Contains all configuration sections for the collator.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [state]
/// consensus = "FixedDifficulty"
/// block_reward = 5000
/// enforce_seal = false
///
/// [collation]
/// max_transactions = 100
/// max_gas = 3000000
///
/// [chain]
/// period_length = 5
///
/// [scheduling]
/// policy_type = "FeePriority"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub state: StateConfig,
    pub collation: CollationConfig,
    pub chain: ChainConfig,
    pub scheduling: SchedulingConfig,
}

/// Consensus strategy a shard state runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsensusKind {
    FixedDifficulty,
    StakeWeighted,
}

/// Shard state configuration
///
/// Travels with every `ShardState` and selects its consensus strategy.
///
/// # Fields
/// - `consensus`: Which consensus strategy initializes and finalizes collations
/// - `block_reward`: Amount credited to the coinbase on finalize
/// - `enforce_seal`: Reject collations whose seal check fails instead of only reporting it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    pub consensus: ConsensusKind,
    pub block_reward: u64,
    #[serde(default)]
    pub enforce_seal: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusKind::FixedDifficulty,
            block_reward: 5_000,
            enforce_seal: false,
        }
    }
}

/// Collation building configuration
///
/// Bounds how much of the transaction queue a single collation absorbs.
///
/// # Fields
/// - `max_transactions`: Maximum number of transactions per collation
/// - `max_gas`: Maximum total gas the collation's transactions may declare
#[derive(Debug, Clone, Deserialize)]
pub struct CollationConfig {
    pub max_transactions: usize,
    pub max_gas: u64,
}

impl Default for CollationConfig {
    fn default() -> Self {
        Self {
            max_transactions: 100,
            max_gas: 3_000_000,
        }
    }
}

/// Main chain configuration
///
/// # Fields
/// - `period_length`: Number of main-chain blocks per shard period
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub period_length: u64,
}

/// Transaction scheduling configuration
///
/// Determines the order in which queued transactions are offered to the builder.
///
/// # Supported Policies
/// - `"FCFS"`: First-Come-First-Served (transactions ordered by arrival)
/// - `"FeePriority"`: Fee-based priority (highest gas price first)
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    pub policy_type: SchedulingPolicyType,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.chain.period_length == 0 {
            anyhow::bail!("chain.period_length must be greater than zero");
        }

        Ok(config)
    }
}
