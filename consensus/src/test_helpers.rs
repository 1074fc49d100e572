use crate::{
    model::stores::legacy_blocks::{DbLegacyBlockStore, MemoryLegacyBlockStore},
    upgrade::legacy::LegacyBlockRecord,
};
use blockdag_consensus_core::{
    BlockId, NONE_ID,
    block::{AnticoneMap, Block, PhantomBlock},
    blockstatus::BlockStatus,
};
use blockdag_database::prelude::{BatchDbWriter, DB, StoreResult};
use blockdag_hashes::{Hash, ZERO_HASH};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index::sample};
use rocksdb::WriteBatch;
use std::sync::Arc;

/// A parentless block with empty anticones
pub fn phantom_block(id: BlockId, hash: Hash) -> Arc<PhantomBlock> {
    let block = Block {
        id,
        hash,
        parents: Default::default(),
        main_parent: NONE_ID,
        weight: 1,
        order: id,
        layer: 0,
        height: 0,
        status: BlockStatus::VALID,
    };
    Arc::new(PhantomBlock::new(block, 0, AnticoneMap::new(), AnticoneMap::new()))
}

/// The hash given to block `id` by [`generate_legacy_dag`]
pub fn generated_hash(id: BlockId) -> Hash {
    Hash::from_u64_word(id as u64 + 1)
}

/// Generates `block_total` legacy records forming a random DAG. Every reference
/// points to a block with a smaller id.
pub fn generate_legacy_dag(block_total: BlockId, seed: u64) -> Vec<LegacyBlockRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut heights: Vec<u32> = Vec::with_capacity(block_total as usize);
    let mut records = Vec::with_capacity(block_total as usize);
    for id in 0..block_total {
        let past = id as usize;
        let parent_ids = if past == 0 {
            Vec::new()
        } else {
            let amount = rng.gen_range(1..=past.min(3));
            sample(&mut rng, past, amount).into_vec()
        };
        let height = parent_ids.iter().map(|&p| heights[p] + 1).max().unwrap_or(0);
        heights.push(height);

        let anticone = |rng: &mut StdRng| -> Vec<(Hash, u32)> {
            let amount = rng.gen_range(0..=past.min(2));
            sample(&mut *rng, past, amount).into_iter().map(|a| (generated_hash(a as BlockId), rng.gen_range(0..1000))).collect()
        };
        let blue_anticone = anticone(&mut rng);
        let red_anticone = anticone(&mut rng);

        records.push(LegacyBlockRecord {
            id,
            hash: generated_hash(id),
            parents: parent_ids.iter().map(|&p| generated_hash(p as BlockId)).collect(),
            main_parent: parent_ids.first().map_or(ZERO_HASH, |&p| generated_hash(p as BlockId)),
            weight: rng.gen_range(1..1_000_000),
            order: id,
            layer: height,
            height,
            status: rng.gen_range(0..=BlockStatus::all().bits()),
            blue_num: rng.gen_range(0..10),
            blue_anticone,
            red_anticone,
        });
    }
    records
}

/// An in-memory legacy store holding each record under its own id
pub fn legacy_store_from(records: &[LegacyBlockRecord]) -> MemoryLegacyBlockStore {
    records.iter().map(|r| (r.id, r.encode())).collect()
}

/// Writes legacy records into the DB under their own ids
pub fn seed_legacy_db(db: &Arc<DB>, records: &[LegacyBlockRecord]) -> StoreResult<()> {
    let store = DbLegacyBlockStore::new(db.clone());
    let mut batch = WriteBatch::default();
    for record in records {
        store.insert_raw(BatchDbWriter::new(&mut batch), record.id, &record.encode())?;
    }
    db.write(batch)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_dag_is_forward_consistent() {
        let records = generate_legacy_dag(64, 7);
        assert_eq!(records.len(), 64);
        assert!(records[0].parents.is_empty());
        assert_eq!(records[0].main_parent, ZERO_HASH);
        for record in records.iter().skip(1) {
            assert!(!record.parents.is_empty());
            assert_eq!(record.main_parent, record.parents[0]);
            let anticone = record.blue_anticone.iter().chain(record.red_anticone.iter()).map(|(h, _)| h);
            for hash in record.parents.iter().chain(anticone) {
                let referenced = hash.to_le_u64()[3] - 1;
                assert!(referenced < record.id as u64);
            }
        }
        // Same seed, same DAG
        assert_eq!(generate_legacy_dag(64, 7), records);
    }
}
