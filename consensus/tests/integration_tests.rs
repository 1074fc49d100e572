//!
//! Integration tests
//!

mod common;

use blockdag_consensus::{
    model::stores::{
        block_index::{BlockIndexStoreReader, DbBlockIndexStore, MemoryBlockIndexWriter},
        legacy_blocks::{DbLegacyBlockStore, LegacyBlockReader, MemoryLegacyBlockStore},
        metadata::{DagMetadata, DagMetadataStore, LATEST_DB_VERSION, LEGACY_DB_VERSION},
    },
    test_helpers::{generate_legacy_dag, legacy_store_from},
    upgrade::{BlockIndexUpgrade, DbUpgrader, LegacyBlockRecord, UpgradeSummary, encode_legacy_block},
};
use blockdag_consensus_core::{
    BlockId, NONE_ID,
    config::UpgradeConfig,
    errors::upgrade::{ReferenceKind, UpgradeError},
};
use blockdag_core::assert_match;
use blockdag_database::{
    create_temp_db,
    prelude::{CachePolicy, ConnBuilder},
};
use blockdag_hashes::{Hash, ZERO_HASH};
use common::{h, seed_database, three_block_dag};

#[test]
fn test_db_upgrade_three_blocks() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    seed_database(&db, &three_block_dag(), LEGACY_DB_VERSION, 3);

    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default().with_block_index_cache_size(8));
    let summary = upgrader.upgrade_if_needed().unwrap();
    assert_eq!(summary, Some(UpgradeSummary { blocks_read: 3, blocks_written: 3 }));

    let metadata_store = DagMetadataStore::new(db.clone());
    assert_eq!(metadata_store.get().unwrap(), DagMetadata::new(LATEST_DB_VERSION, 3));
    assert!(!metadata_store.should_upgrade().unwrap());

    let store = upgrader.block_index_store();
    let root = store.get(0).unwrap();
    assert_eq!(root.hash(), h(1));
    assert_eq!(root.block.main_parent, NONE_ID);
    assert!(root.block.parents.is_empty());

    let b1 = store.get(1).unwrap();
    assert_eq!(b1.block.main_parent(), Some(0));
    assert_eq!(b1.block.parents.iter().copied().collect::<Vec<_>>(), vec![0]);

    let b2 = store.get(2).unwrap();
    assert_eq!(b2.block.main_parent(), Some(1));
    assert_eq!(b2.block.parents.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(b2.blue_diff_anticone.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(), vec![(0, 0)]);
    assert_eq!(b2.red_diff_anticone.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(), vec![(1, 1)]);

    // Legacy records were replaced in place
    assert_eq!(store.iterator().count(), 3);

    // A second run finds nothing to do
    assert_eq!(upgrader.upgrade_if_needed().unwrap(), None);
}

#[test]
fn test_db_upgrade_failure_leaves_db_untouched() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    let mut records = three_block_dag();
    records[2].red_anticone = vec![(h(77), 3)];
    seed_database(&db, &records, LEGACY_DB_VERSION, 3);

    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default());
    assert_match!(
        upgrader.upgrade_if_needed(),
        Err(UpgradeError::UnresolvedReference(ReferenceKind::RedAnticone, hash)) if hash == h(77)
    );

    let metadata_store = DagMetadataStore::new(db.clone());
    assert_eq!(metadata_store.version().unwrap(), LEGACY_DB_VERSION);
    let legacy_store = DbLegacyBlockStore::new(db.clone());
    for record in records.iter() {
        assert_eq!(legacy_store.read_legacy(record.id).unwrap(), Some(record.encode()));
    }
}

#[test]
fn test_db_upgrade_zero_blocks() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    seed_database(&db, &[], LEGACY_DB_VERSION, 0);

    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default());
    assert_eq!(upgrader.upgrade_if_needed().unwrap(), Some(UpgradeSummary::default()));
    assert_eq!(DagMetadataStore::new(db.clone()).version().unwrap(), LATEST_DB_VERSION);
}

#[test]
fn test_db_upgrade_versions() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default());
    // No metadata at all
    assert_eq!(upgrader.upgrade_if_needed().unwrap(), None);

    DagMetadataStore::new(db.clone()).set(DagMetadata::new(7, 0)).unwrap();
    assert_match!(upgrader.upgrade_if_needed(), Err(UpgradeError::UnsupportedVersion(7)));
}

#[test]
fn test_db_upgrade_block_total_below_recorded_is_rejected() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    let records = three_block_dag();
    seed_database(&db, &records, LEGACY_DB_VERSION, 3);

    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default());
    assert_match!(
        upgrader.upgrade_with_block_total(Some(2)),
        Err(UpgradeError::BlockTotalBelowRecorded { requested: 2, recorded: 3 })
    );

    assert_eq!(DagMetadataStore::new(db.clone()).get().unwrap(), DagMetadata::new(LEGACY_DB_VERSION, 3));
    let legacy_store = DbLegacyBlockStore::new(db.clone());
    for record in records.iter() {
        assert_eq!(legacy_store.read_legacy(record.id).unwrap(), Some(record.encode()));
    }

    // The full upgrade still goes through afterwards
    assert_eq!(upgrader.upgrade_if_needed().unwrap().unwrap().blocks_written, 3);
}

#[test]
fn test_db_upgrade_block_total_override_extends_recorded() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    seed_database(&db, &three_block_dag(), LEGACY_DB_VERSION, 2);

    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default());
    let summary = upgrader.upgrade_with_block_total(Some(3)).unwrap().unwrap();
    assert_eq!(summary, UpgradeSummary { blocks_read: 3, blocks_written: 3 });
    assert_eq!(DagMetadataStore::new(db.clone()).get().unwrap(), DagMetadata::new(LATEST_DB_VERSION, 3));

    let store = DbBlockIndexStore::new(db.clone(), CachePolicy::Empty);
    assert_eq!(store.get(2).unwrap().block.main_parent(), Some(1));
}

#[test]
fn test_db_upgrade_generated_dag() {
    let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
    let records = generate_legacy_dag(500, 1);
    seed_database(&db, &records, LEGACY_DB_VERSION, records.len() as u64);

    let upgrader = DbUpgrader::new(db.clone(), UpgradeConfig::default().with_progress_log_interval(100));
    assert_eq!(upgrader.upgrade_if_needed().unwrap().unwrap().blocks_written, 500);

    let store = DbBlockIndexStore::new(db.clone(), CachePolicy::Empty);
    let migrated = store.iterator().map(|r| r.unwrap()).collect::<Vec<_>>();
    assert_eq!(migrated.len(), records.len());
    for ((id, block), record) in migrated.iter().zip(records.iter()) {
        assert_eq!(*id, record.id);
        assert_eq!(block.hash(), record.hash);
    }
}

/// Decoding, re-encoding in the legacy layout and decoding again yields the same graph
#[test]
fn test_reencode_roundtrip_is_isomorphic() {
    let records = generate_legacy_dag(300, 99);

    let mut first = MemoryBlockIndexWriter::new();
    BlockIndexUpgrade::new(UpgradeConfig::default()).run(&legacy_store_from(&records), &mut first, records.len() as u64).unwrap();

    let hashes = first.blocks().iter().map(|b| b.hash()).collect::<Vec<_>>();
    let hash_of = |id: BlockId| hashes[id as usize];
    let reencoded = first
        .blocks()
        .iter()
        .map(|b| (b.id(), encode_legacy_block(b, hash_of)))
        .collect::<MemoryLegacyBlockStore>();

    let mut second = MemoryBlockIndexWriter::new();
    BlockIndexUpgrade::new(UpgradeConfig::default()).run(&reencoded, &mut second, records.len() as u64).unwrap();
    assert_eq!(first.blocks(), second.blocks());

    // Hash identity: every reference points at the same hashes as the source records
    for (record, block) in records.iter().zip(second.blocks()) {
        let back = LegacyBlockRecord::from_block(block, hash_of);
        assert_eq!(&back, record);
        assert_eq!(block.block.main_parent().map_or(ZERO_HASH, hash_of), record.main_parent);
        assert!(record.parents.iter().all(|p: &Hash| block.block.parents.contains(&block_id_of(&hashes, p))));
    }
}

fn block_id_of(hashes: &[Hash], hash: &Hash) -> BlockId {
    hashes.iter().position(|h| h == hash).unwrap() as BlockId
}
