use blockdag_database::{
    prelude::{BatchDbWriter, CachedDbItem, DB, DirectDbWriter, StoreError, StoreResult},
    registry::DatabaseStorePrefixes,
};
use rocksdb::WriteBatch;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The DB scheme version whose block index holds hash-referencing legacy records
pub const LEGACY_DB_VERSION: u32 = 1;

/// The DB scheme version whose block index holds id-referencing current records
pub const LATEST_DB_VERSION: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagMetadata {
    /// The DB scheme version
    pub version: u32,
    /// Number of blocks in the block index
    pub block_total: u64,
}

impl DagMetadata {
    pub fn new(version: u32, block_total: u64) -> Self {
        Self { version, block_total }
    }
}

impl Default for DagMetadata {
    fn default() -> Self {
        Self { version: LATEST_DB_VERSION, block_total: 0 }
    }
}

#[derive(Clone)]
pub struct DagMetadataStore {
    db: Arc<DB>,
    access: CachedDbItem<DagMetadata>,
}

impl DagMetadataStore {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db: Arc::clone(&db), access: CachedDbItem::new(db, DatabaseStorePrefixes::DagMetadata.into()) }
    }

    pub fn get(&self) -> StoreResult<DagMetadata> {
        self.access.read()
    }

    /// Returns the current version of this database
    pub fn version(&self) -> StoreResult<u32> {
        Ok(self.access.read()?.version)
    }

    /// A database without metadata is either empty or not ours, so there is nothing to upgrade
    pub fn should_upgrade(&self) -> StoreResult<bool> {
        match self.access.read() {
            Ok(data) => Ok(data.version != LATEST_DB_VERSION),
            Err(StoreError::KeyNotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn set(&mut self, metadata: DagMetadata) -> StoreResult<()> {
        self.access.write(DirectDbWriter::new(&self.db), &metadata)
    }

    pub fn set_batch(&mut self, batch: &mut WriteBatch, metadata: DagMetadata) -> StoreResult<()> {
        self.access.write(BatchDbWriter::new(batch), &metadata)
    }
}
