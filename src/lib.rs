//! This crate implements the collation state-transition engine for a sharded ledger.
//! It validates collations received from other nodes by replaying them atomically,
//! and assembles new collations from a pending transaction queue against a parent state.

pub mod types; // Defines common data structures: transactions, receipts, collations, blocks.
pub mod error; // Typed errors for collation application and construction.
pub mod config; // Defines and loads system configuration.
pub mod merkle; // Keccak Merkle roots behind every commitment.
pub mod state; // Journaled shard state with snapshot and revert.
pub mod execution; // Applies single transactions to a shard state.
pub mod consensus; // Per-collation consensus setup and rewards.
pub mod chain; // Main-chain and shard-chain lookups.
pub mod period; // Resolves the main-chain block a shard period references.
pub mod pool; // Queue of pending transactions.
pub mod scheduler; // Orders queued transactions for inclusion.
pub mod collation; // Applies and builds collations.
pub mod diagnostics; // Explicit sink for collation events.

#[cfg(test)]
mod test_utils;

// Re-export commonly used types and entry points for easier access.
pub use types::*;
pub use config::Config;
pub use error::{CollatorError, Result};
pub use collation::{apply_collation, create_collation, verify_collation, CollationBuilder};
