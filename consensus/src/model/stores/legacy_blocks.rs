use super::BlockIdKey;
use blockdag_consensus_core::BlockId;
use blockdag_database::{
    prelude::{DB, DbKey, DbWriter, StoreError, StoreResult},
    registry::DatabaseStorePrefixes,
};
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};

/// Reader API for raw legacy block records
pub trait LegacyBlockReader {
    /// Returns the raw record stored under `id`, or `None` if there is none
    fn read_legacy(&self, id: BlockId) -> StoreResult<Option<Vec<u8>>>;
}

/// Legacy records live under the block index prefix, keyed by big-endian id. They are
/// opaque bytes rather than bincode data, so the store bypasses `CachedDbAccess`.
#[derive(Clone)]
pub struct DbLegacyBlockStore {
    db: Arc<DB>,
    prefix: Vec<u8>,
}

impl DbLegacyBlockStore {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db, prefix: DatabaseStorePrefixes::BlockIndex.into() }
    }

    /// Stores a raw legacy record. Used for seeding databases in tests and tooling
    pub fn insert_raw(&self, mut writer: impl DbWriter, id: BlockId, record: &[u8]) -> StoreResult<()> {
        writer.put(DbKey::new(&self.prefix, BlockIdKey::from(id)), record)?;
        Ok(())
    }
}

impl LegacyBlockReader for DbLegacyBlockStore {
    fn read_legacy(&self, id: BlockId) -> StoreResult<Option<Vec<u8>>> {
        let key = DbKey::new(&self.prefix, BlockIdKey::from(id));
        Ok(self.db.get_pinned(key)?.map(|slice| slice.to_vec()))
    }
}

/// In-memory legacy records which also counts the reads made against it
#[derive(Default)]
pub struct MemoryLegacyBlockStore {
    records: BTreeMap<BlockId, Vec<u8>>,
    reads: Mutex<usize>,
}

impl MemoryLegacyBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: BlockId, record: Vec<u8>) {
        self.records.insert(id, record);
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(BlockId, Vec<u8>)> for MemoryLegacyBlockStore {
    fn from_iter<T: IntoIterator<Item = (BlockId, Vec<u8>)>>(iter: T) -> Self {
        Self { records: iter.into_iter().collect(), reads: Default::default() }
    }
}

impl LegacyBlockReader for MemoryLegacyBlockStore {
    fn read_legacy(&self, id: BlockId) -> StoreResult<Option<Vec<u8>>> {
        *self.reads.lock() += 1;
        Ok(self.records.get(&id).cloned())
    }
}

/// A reader whose every read fails. Used to exercise storage error paths
pub struct FailingLegacyBlockReader;

impl LegacyBlockReader for FailingLegacyBlockReader {
    fn read_legacy(&self, id: BlockId) -> StoreResult<Option<Vec<u8>>> {
        Err(StoreError::DataInconsistency(format!("legacy record {id} is unreadable")))
    }
}
