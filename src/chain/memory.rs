use super::{MainChain, ShardChain};
use crate::error::{CollatorError, Result};
use crate::state::ShardState;
use crate::{Block, Collation, ShardId};
use ethers::types::{Address, H256};
use std::collections::HashMap;
use tracing::debug;

/// Shard chain holding post-states keyed by collation hash
#[derive(Debug, Clone)]
pub struct InMemoryShardChain {
    shard_id: ShardId,
    collations: HashMap<H256, Collation>,
    poststates: HashMap<H256, ShardState>,
    head: H256,
}

impl InMemoryShardChain {
    pub fn new(shard_id: ShardId, mut genesis: ShardState) -> Self {
        genesis.commit_journal();
        let mut poststates = HashMap::new();
        poststates.insert(H256::zero(), genesis);

        Self {
            shard_id,
            collations: HashMap::new(),
            poststates,
            head: H256::zero(),
        }
    }

    /// Hash of the latest added collation, `H256::zero()` before any
    pub fn head(&self) -> H256 {
        self.head
    }

    pub fn get_collation(&self, hash: &H256) -> Option<&Collation> {
        self.collations.get(hash)
    }

    /// Record a collation and the post-state it produced
    ///
    /// The parent must already be known.
    pub fn add_collation(&mut self, collation: Collation, mut poststate: ShardState) -> Result<H256> {
        let parent = collation.header.parent_collation_hash;
        if !self.poststates.contains_key(&parent) {
            return Err(CollatorError::UnknownCollation {
                shard_id: self.shard_id,
                hash: parent,
            });
        }

        let hash = collation.hash();
        poststate.commit_journal();
        self.poststates.insert(hash, poststate);
        self.collations.insert(hash, collation);
        self.head = hash;

        debug!("Shard {} head is now {:?}", self.shard_id, hash);
        Ok(hash)
    }
}

impl ShardChain for InMemoryShardChain {
    fn shard_id(&self) -> ShardId {
        self.shard_id
    }

    fn mk_poststate_of_collation_hash(&self, collation_hash: H256) -> Result<ShardState> {
        self.poststates
            .get(&collation_hash)
            .cloned()
            .ok_or(CollatorError::UnknownCollation {
                shard_id: self.shard_id,
                hash: collation_hash,
            })
    }
}

/// Main chain kept as a single canonical list of blocks
#[derive(Debug, Clone)]
pub struct InMemoryMainChain {
    period_length: u64,
    blocks: Vec<Block>,
    by_hash: HashMap<H256, usize>,
    shards: HashMap<ShardId, InMemoryShardChain>,
}

impl InMemoryMainChain {
    /// Chain holding only the genesis block
    pub fn new(period_length: u64) -> Self {
        let genesis = Block::new(0, H256::zero(), Address::zero(), 0);
        let mut by_hash = HashMap::new();
        by_hash.insert(genesis.hash, 0);

        Self {
            period_length: period_length.max(1),
            blocks: vec![genesis],
            by_hash,
            shards: HashMap::new(),
        }
    }

    pub fn period_length(&self) -> u64 {
        self.period_length
    }

    pub fn head(&self) -> &Block {
        // the genesis block is never removed
        &self.blocks[self.blocks.len() - 1]
    }

    /// Append a block on top of the head
    pub fn mine_block(&mut self, coinbase: Address, timestamp: u64) -> &Block {
        let head = self.head();
        let block = Block::new(head.number + 1, head.hash, coinbase, timestamp);
        self.by_hash.insert(block.hash, self.blocks.len());
        self.blocks.push(block);
        self.head()
    }

    pub fn get_block_by_number(&self, number: u64) -> Option<&Block> {
        usize::try_from(number).ok().and_then(|index| self.blocks.get(index))
    }

    pub fn add_shard(&mut self, shard_id: ShardId, genesis: ShardState) {
        self.shards
            .insert(shard_id, InMemoryShardChain::new(shard_id, genesis));
    }

    pub fn shard_mut(&mut self, shard_id: ShardId) -> Option<&mut InMemoryShardChain> {
        self.shards.get_mut(&shard_id)
    }
}

impl MainChain for InMemoryMainChain {
    fn has_shard(&self, shard_id: ShardId) -> bool {
        self.shards.contains_key(&shard_id)
    }

    fn shard(&self, shard_id: ShardId) -> Option<&dyn ShardChain> {
        self.shards
            .get(&shard_id)
            .map(|shard| shard as &dyn ShardChain)
    }

    fn get_expected_period_number(&self) -> u64 {
        (self.head().number + 1) / self.period_length
    }

    fn get_period_start_prevhash(&self, period: u64) -> Option<H256> {
        let number = period.checked_mul(self.period_length)?.checked_sub(1)?;
        self.get_block_by_number(number).map(|block| block.hash)
    }

    fn get_block(&self, hash: &H256) -> Option<Block> {
        self.by_hash
            .get(hash)
            .and_then(|index| self.blocks.get(*index))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateConfig;
    use crate::CollationHeader;

    fn chain_with_blocks(count: u64) -> InMemoryMainChain {
        let mut chain = InMemoryMainChain::new(5);
        for i in 0..count {
            chain.mine_block(Address::zero(), i);
        }
        chain
    }

    #[test]
    fn test_expected_period_number() {
        assert_eq!(chain_with_blocks(0).get_expected_period_number(), 0);
        assert_eq!(chain_with_blocks(3).get_expected_period_number(), 0);
        assert_eq!(chain_with_blocks(4).get_expected_period_number(), 1);
        assert_eq!(chain_with_blocks(10).get_expected_period_number(), 2);
    }

    #[test]
    fn test_period_start_prevhash() {
        let chain = chain_with_blocks(10);
        assert_eq!(chain.get_period_start_prevhash(0), None);
        assert_eq!(
            chain.get_period_start_prevhash(1),
            chain.get_block_by_number(4).map(|b| b.hash)
        );
        assert_eq!(
            chain.get_period_start_prevhash(2),
            chain.get_block_by_number(9).map(|b| b.hash)
        );
        assert_eq!(chain.get_period_start_prevhash(3), None);
    }

    #[test]
    fn test_get_block_by_hash() {
        let chain = chain_with_blocks(2);
        let head = chain.head().clone();
        assert_eq!(chain.get_block(&head.hash), Some(head));
        assert_eq!(chain.get_block(&H256::repeat_byte(1)), None);
    }

    #[test]
    fn test_shard_poststates() {
        let mut chain = chain_with_blocks(0);
        chain.add_shard(2, ShardState::new(StateConfig::default()));
        assert!(chain.has_shard(2));
        assert!(!chain.has_shard(3));

        let shard = chain.shard(2).unwrap();
        assert!(shard.mk_poststate_of_collation_hash(H256::zero()).is_ok());
        let err = shard
            .mk_poststate_of_collation_hash(H256::repeat_byte(1))
            .unwrap_err();
        assert!(matches!(err, CollatorError::UnknownCollation { shard_id: 2, .. }));
    }

    #[test]
    fn test_add_collation_requires_known_parent() {
        let mut shard = InMemoryShardChain::new(0, ShardState::new(StateConfig::default()));
        let mut header = CollationHeader::new(Address::zero());
        header.parent_collation_hash = H256::repeat_byte(7);

        let result = shard.add_collation(Collation::new(header.clone()), ShardState::new(StateConfig::default()));
        assert!(result.is_err());

        header.parent_collation_hash = H256::zero();
        let hash = shard
            .add_collation(Collation::new(header), ShardState::new(StateConfig::default()))
            .unwrap();
        assert_eq!(shard.head(), hash);
        assert!(shard.get_collation(&hash).is_some());
    }
}
