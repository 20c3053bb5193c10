//! Deterministic block factory.

use crate::block::NullBlock;
use crate::clock::NullClock;
use snowfall_types::BlockId;

/// Hands out blocks with unique ids, correct heights and increasing
/// timestamps, all descending from one genesis id.
pub struct ChainBuilder {
    next: u64,
    genesis: BlockId,
    clock: NullClock,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            next: 2,
            genesis: Self::id_for(1),
            clock: NullClock::new(1_700_000_000),
        }
    }

    /// Id of the accepted block every chain starts from, at height 0.
    pub fn genesis(&self) -> BlockId {
        self.genesis
    }

    pub fn child_of_genesis(&mut self) -> NullBlock {
        let parent = self.genesis;
        self.block(parent, 1)
    }

    pub fn child(&mut self, parent: &NullBlock) -> NullBlock {
        self.block(parent.id, parent.height + 1)
    }

    fn block(&mut self, parent: BlockId, height: u64) -> NullBlock {
        let id = Self::id_for(self.next);
        self.next += 1;
        NullBlock::new(id, parent, height, self.clock.tick())
    }

    /// Big-endian counter in the leading bytes, so ids order like the
    /// counter and differ in their high bits.
    fn id_for(n: u64) -> BlockId {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        BlockId::new(bytes)
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowfall_consensus::Block;

    #[test]
    fn children_link_to_parent() {
        let mut chain = ChainBuilder::new();
        let a = chain.child_of_genesis();
        let b = chain.child(&a);

        assert_eq!(a.parent(), chain.genesis());
        assert_eq!(a.height(), 1);
        assert_eq!(b.parent(), a.id());
        assert_eq!(b.height(), 2);
        assert!(b.timestamp() > a.timestamp());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut chain = ChainBuilder::new();
        let a = chain.child_of_genesis();
        let b = chain.child_of_genesis();
        assert_ne!(a.id(), b.id());
        assert!(chain.genesis() < a.id());
        assert!(a.id() < b.id());
    }
}
