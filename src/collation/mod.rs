//! Collation Module
//!
//! This module validates and assembles collations:
//! - Applier: replays a received collation atomically and checks its commitments
//! - Builder: assembles a new collation from a transaction queue
//! - Commitments: transaction, state and receipt roots shared by both

mod applier;
mod builder;
pub mod commitments;


pub use applier::{apply_collation, verify_collation};
pub use builder::{BuiltCollation, CollationBuilder, create_collation};
pub use commitments::{
    set_execution_results, tx_list_root, validate_transaction_tree, verify_execution_results,
};
