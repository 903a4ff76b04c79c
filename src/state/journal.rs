use crate::Receipt;
use ethers::types::{Address, H256};

/// Point-in-time marker returned by `ShardState::snapshot`
///
/// Ids are never reused, so a checkpoint invalidated by an earlier revert
/// cannot alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    id: u64,
    journal_len: usize,
}

impl Checkpoint {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Undo record for one mutation
#[derive(Debug, Clone)]
pub(crate) enum JournalEntry {
    Account {
        address: Address,
        previous: Option<crate::Account>,
    },
    ReceiptPushed,
    ReceiptsCleared {
        previous: Vec<Receipt>,
    },
    BlockHash {
        number: u64,
        previous: Option<H256>,
    },
    GasUsed {
        previous: u64,
    },
}

/// Change log of the keys touched since the oldest live checkpoint
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal {
    entries: Vec<JournalEntry>,
    checkpoints: Vec<Checkpoint>,
    next_id: u64,
}

impl Journal {
    pub fn checkpoint(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            id: self.next_id,
            journal_len: self.entries.len(),
        };
        self.next_id += 1;
        self.checkpoints.push(checkpoint);
        checkpoint
    }

    /// Mutations outside any checkpoint cannot be reverted and are not kept
    pub fn record(&mut self, entry: JournalEntry) {
        if !self.checkpoints.is_empty() {
            self.entries.push(entry);
        }
    }

    fn position(&self, checkpoint: Checkpoint) -> Option<usize> {
        self.checkpoints.iter().rposition(|live| *live == checkpoint)
    }

    /// Remove and return the entries recorded after `checkpoint`, oldest first
    pub fn rewind(&mut self, checkpoint: Checkpoint) -> Option<Vec<JournalEntry>> {
        let position = self.position(checkpoint)?;
        self.checkpoints.truncate(position);
        let undone = self.entries.split_off(checkpoint.journal_len);
        self.compact();
        Some(undone)
    }

    pub fn release(&mut self, checkpoint: Checkpoint) -> bool {
        match self.position(checkpoint) {
            Some(position) => {
                self.checkpoints.truncate(position);
                self.compact();
                true
            }
            None => false,
        }
    }

    pub fn has_live_checkpoints(&self) -> bool {
        !self.checkpoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.checkpoints.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn compact(&mut self) {
        if self.checkpoints.is_empty() {
            self.entries.clear();
        }
    }
}
