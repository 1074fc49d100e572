use super::driver::{BlockIndexUpgrade, UpgradeSummary};
use crate::model::stores::{
    block_index::{BlockIndexBatchWriter, DbBlockIndexStore},
    legacy_blocks::DbLegacyBlockStore,
    metadata::{DagMetadata, DagMetadataStore, LATEST_DB_VERSION, LEGACY_DB_VERSION},
};
use blockdag_consensus_core::{
    config::UpgradeConfig,
    errors::upgrade::{UpgradeError, UpgradeResult},
};
use blockdag_core::{info, warn};
use blockdag_database::prelude::{CachePolicy, DB, StoreError};
use rocksdb::WriteBatch;
use std::sync::Arc;

fn store_error(err: StoreError) -> UpgradeError {
    UpgradeError::Store(err.to_string())
}

/// Upgrades a whole database from the legacy block index format. The migrated
/// records and the version bump are committed together in one write batch, so
/// a failed upgrade leaves the database as it was.
pub struct DbUpgrader {
    db: Arc<DB>,
    config: UpgradeConfig,
}

impl DbUpgrader {
    pub fn new(db: Arc<DB>, config: UpgradeConfig) -> Self {
        Self { db, config }
    }

    /// A read store over the current-format block index, cached per the upgrade config
    pub fn block_index_store(&self) -> DbBlockIndexStore {
        DbBlockIndexStore::new(self.db.clone(), CachePolicy::Count(self.config.block_index_cache_size))
    }

    /// Upgrades the database if its metadata marks it as legacy. Returns `None` if there was nothing to do
    pub fn upgrade_if_needed(&self) -> UpgradeResult<Option<UpgradeSummary>> {
        self.upgrade_with_block_total(None)
    }

    /// Same as [`Self::upgrade_if_needed`], optionally migrating `block_total` records instead of
    /// the count recorded in the metadata. The override may only extend the recorded count, since
    /// records past the migrated range would stay in the legacy layout under a latest-version DB.
    pub fn upgrade_with_block_total(&self, block_total: Option<u64>) -> UpgradeResult<Option<UpgradeSummary>> {
        // Fresh stores per run so no cache outlives a dropped batch
        let mut metadata_store = DagMetadataStore::new(self.db.clone());
        if !metadata_store.should_upgrade().map_err(store_error)? {
            info!("Database has no legacy block index, no upgrade needed");
            return Ok(None);
        }
        let metadata = metadata_store.get().map_err(store_error)?;
        if metadata.version != LEGACY_DB_VERSION {
            return Err(UpgradeError::UnsupportedVersion(metadata.version));
        }

        let block_total = match block_total {
            Some(requested) if requested < metadata.block_total => {
                return Err(UpgradeError::BlockTotalBelowRecorded { requested, recorded: metadata.block_total });
            }
            Some(requested) => {
                if requested != metadata.block_total {
                    warn!("Overriding recorded block total {} with {}", metadata.block_total, requested);
                }
                requested
            }
            None => metadata.block_total,
        };
        info!("Upgrading database from version {} to {}", metadata.version, LATEST_DB_VERSION);

        let legacy_store = DbLegacyBlockStore::new(self.db.clone());
        let block_index_store = DbBlockIndexStore::new(self.db.clone(), CachePolicy::Empty);
        let mut batch = WriteBatch::default();
        let summary = {
            let mut writer = BlockIndexBatchWriter::new(&block_index_store, &mut batch);
            BlockIndexUpgrade::new(self.config.clone()).run(&legacy_store, &mut writer, block_total)?
        };
        metadata_store.set_batch(&mut batch, DagMetadata::new(LATEST_DB_VERSION, block_total)).map_err(store_error)?;
        self.db.write(batch).map_err(|err| store_error(err.into()))?;

        info!("Database upgraded to version {}", LATEST_DB_VERSION);
        Ok(Some(summary))
    }
}
