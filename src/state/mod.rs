//! State Management Module
//!
//! This module provides the journaled shard state that collations are applied to.
//! Snapshots are O(1) checkpoints; reverting replays the change log backwards.

mod guard;
mod journal;
mod shard_state;

pub use guard::StateGuard;
pub use journal::Checkpoint;
pub use shard_state::ShardState;
