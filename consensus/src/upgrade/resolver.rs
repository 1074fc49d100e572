use blockdag_consensus_core::{
    BlockId,
    block::PhantomBlock,
    errors::upgrade::{ReferenceKind, UpgradeError, UpgradeResult},
};
use blockdag_hashes::{BlockHashMap, Hash};
use std::{collections::hash_map::Entry, sync::Arc};

/// Read access to the blocks decoded so far in an upgrade pass
pub trait BlockResolverReader {
    fn lookup(&self, hash: &Hash) -> Option<&Arc<PhantomBlock>>;

    fn get(&self, hash: &Hash, kind: ReferenceKind) -> UpgradeResult<&Arc<PhantomBlock>> {
        self.lookup(hash).ok_or(UpgradeError::UnresolvedReference(kind, *hash))
    }

    fn resolve_id(&self, hash: &Hash, kind: ReferenceKind) -> UpgradeResult<BlockId> {
        Ok(self.get(hash, kind)?.id())
    }
}

/// Maps block hashes to the blocks decoded so far. Entries are only ever added,
/// and the whole table is released at once with [`BlockResolver::clear`].
#[derive(Default)]
pub struct BlockResolver {
    blocks: BlockHashMap<Arc<PhantomBlock>>,
}

impl BlockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { blocks: BlockHashMap::with_capacity_and_hasher(capacity, Default::default()) }
    }

    /// Registers a fully decoded block. The first registration of a hash wins
    pub fn put(&mut self, hash: Hash, block: Arc<PhantomBlock>) -> UpgradeResult<()> {
        match self.blocks.entry(hash) {
            Entry::Occupied(_) => Err(UpgradeError::DuplicateHash(hash)),
            Entry::Vacant(e) => {
                e.insert(block);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drops all entries and releases the table's memory
    pub fn clear(&mut self) {
        self.blocks = Default::default();
    }

    /// Returns all registered blocks sorted by id
    pub fn sorted_blocks(&self) -> Vec<Arc<PhantomBlock>> {
        let mut blocks = self.blocks.values().cloned().collect::<Vec<_>>();
        blocks.sort_unstable_by_key(|b| b.id());
        blocks
    }
}

impl BlockResolverReader for BlockResolver {
    fn lookup(&self, hash: &Hash) -> Option<&Arc<PhantomBlock>> {
        self.blocks.get(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::phantom_block;
    use blockdag_core::assert_match;

    #[test]
    fn test_put_get() {
        let mut resolver = BlockResolver::with_capacity(4);
        let block = phantom_block(0, Hash::from_u64_word(1));
        resolver.put(block.hash(), block.clone()).unwrap();

        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve_id(&Hash::from_u64_word(1), ReferenceKind::Parent).unwrap(), 0);
        assert_match!(
            resolver.get(&Hash::from_u64_word(2), ReferenceKind::MainParent),
            Err(UpgradeError::UnresolvedReference(ReferenceKind::MainParent, h)) if h == Hash::from_u64_word(2)
        );
    }

    #[test]
    fn test_first_writer_wins() {
        let mut resolver = BlockResolver::new();
        let hash = Hash::from_u64_word(7);
        resolver.put(hash, phantom_block(0, hash)).unwrap();
        assert_match!(resolver.put(hash, phantom_block(1, hash)), Err(UpgradeError::DuplicateHash(h)) if h == hash);
        assert_eq!(resolver.resolve_id(&hash, ReferenceKind::Parent).unwrap(), 0);
    }

    #[test]
    fn test_sorted_and_clear() {
        let mut resolver = BlockResolver::new();
        for id in [5, 2, 9, 0] {
            let hash = Hash::from_u64_word(id as u64 + 1);
            resolver.put(hash, phantom_block(id, hash)).unwrap();
        }
        let ids = resolver.sorted_blocks().iter().map(|b| b.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 2, 5, 9]);

        resolver.clear();
        assert!(resolver.is_empty());
        assert!(resolver.lookup(&Hash::from_u64_word(1)).is_none());
    }
}
