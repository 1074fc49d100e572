use super::BlockIdKey;
use blockdag_consensus_core::{BlockId, block::PhantomBlock};
use blockdag_database::{
    prelude::{BatchDbWriter, CachePolicy, CachedDbAccess, DB, StoreError, StoreResult},
    registry::DatabaseStorePrefixes,
};
use rocksdb::WriteBatch;
use std::{error::Error, sync::Arc};

/// Reader API for `DbBlockIndexStore`.
pub trait BlockIndexStoreReader {
    fn get(&self, id: BlockId) -> StoreResult<Arc<PhantomBlock>>;
    fn has(&self, id: BlockId) -> StoreResult<bool>;
}

/// Write API for the current-format block index. Blocks arrive in id order during an upgrade.
pub trait BlockIndexWriter {
    fn write_block(&mut self, block: &Arc<PhantomBlock>) -> StoreResult<()>;
}

/// A DB + cache implementation of the current-format block index
#[derive(Clone)]
pub struct DbBlockIndexStore {
    access: CachedDbAccess<BlockIdKey, Arc<PhantomBlock>>,
}

impl DbBlockIndexStore {
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy) -> Self {
        Self { access: CachedDbAccess::new(db, cache_policy, DatabaseStorePrefixes::BlockIndex.into()) }
    }

    /// Stages the block into `batch`. The entry overwrites whatever is stored under the same id once committed
    pub fn write_batch(&self, batch: &mut WriteBatch, block: Arc<PhantomBlock>) -> StoreResult<()> {
        self.access.write(BatchDbWriter::new(batch), block.id().into(), block)
    }

    /// Iterates all current-format blocks in id order
    pub fn iterator(&self) -> impl Iterator<Item = Result<(BlockId, Arc<PhantomBlock>), Box<dyn Error>>> + '_ {
        self.access.iterator().map(|res| {
            let (key, block) = res?;
            let key = BlockIdKey::try_from(&key[..])?;
            Ok((key.into(), block))
        })
    }
}

impl BlockIndexStoreReader for DbBlockIndexStore {
    fn get(&self, id: BlockId) -> StoreResult<Arc<PhantomBlock>> {
        self.access.read(id.into())
    }

    fn has(&self, id: BlockId) -> StoreResult<bool> {
        self.access.has(id.into())
    }
}

/// Writes blocks into a caller-owned batch, so nothing is visible until the caller commits it
pub struct BlockIndexBatchWriter<'a> {
    store: &'a DbBlockIndexStore,
    batch: &'a mut WriteBatch,
}

impl<'a> BlockIndexBatchWriter<'a> {
    pub fn new(store: &'a DbBlockIndexStore, batch: &'a mut WriteBatch) -> Self {
        Self { store, batch }
    }
}

impl BlockIndexWriter for BlockIndexBatchWriter<'_> {
    fn write_block(&mut self, block: &Arc<PhantomBlock>) -> StoreResult<()> {
        self.store.write_batch(self.batch, block.clone())
    }
}

/// Collects written blocks in memory. Can be set to fail on a given block id
#[derive(Default)]
pub struct MemoryBlockIndexWriter {
    blocks: Vec<Arc<PhantomBlock>>,
    fail_on: Option<BlockId>,
}

impl MemoryBlockIndexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(id: BlockId) -> Self {
        Self { blocks: Vec::new(), fail_on: Some(id) }
    }

    pub fn blocks(&self) -> &[Arc<PhantomBlock>] {
        &self.blocks
    }
}

impl BlockIndexWriter for MemoryBlockIndexWriter {
    fn write_block(&mut self, block: &Arc<PhantomBlock>) -> StoreResult<()> {
        if self.fail_on == Some(block.id()) {
            return Err(StoreError::DataInconsistency(format!("refusing to write block {}", block.id())));
        }
        self.blocks.push(block.clone());
        Ok(())
    }
}
