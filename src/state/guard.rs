use super::{Checkpoint, ShardState};
use crate::error::Result;
use std::ops::{Deref, DerefMut};
use tracing::error;

/// Scoped checkpoint over a `ShardState`
///
/// Dropping the guard reverts every mutation made through it; only
/// [`StateGuard::commit`] keeps them.
pub struct StateGuard<'a> {
    state: &'a mut ShardState,
    checkpoint: Option<Checkpoint>,
}

impl<'a> StateGuard<'a> {
    pub fn new(state: &'a mut ShardState) -> Self {
        let checkpoint = state.snapshot();
        Self {
            state,
            checkpoint: Some(checkpoint),
        }
    }

    /// Keep the mutations
    pub fn commit(mut self) -> Result<()> {
        match self.checkpoint.take() {
            Some(checkpoint) => self.state.release(checkpoint),
            None => Ok(()),
        }
    }

    /// Revert now instead of on drop, surfacing a stale checkpoint
    pub fn rollback(mut self) -> Result<()> {
        match self.checkpoint.take() {
            Some(checkpoint) => self.state.revert(checkpoint),
            None => Ok(()),
        }
    }
}

impl Deref for StateGuard<'_> {
    type Target = ShardState;

    fn deref(&self) -> &ShardState {
        &*self.state
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut ShardState {
        &mut *self.state
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if let Some(checkpoint) = self.checkpoint.take() {
            if let Err(e) = self.state.revert(checkpoint) {
                error!("State guard failed to revert: {}", e);
            }
        }
    }
}
