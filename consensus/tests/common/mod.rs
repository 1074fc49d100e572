use blockdag_consensus::{
    model::stores::metadata::{DagMetadata, DagMetadataStore},
    test_helpers::seed_legacy_db,
    upgrade::LegacyBlockRecord,
};
use blockdag_database::prelude::DB;
use blockdag_hashes::Hash;
use std::sync::Arc;

/// Writes the legacy records and metadata marking the DB with `version`
pub fn seed_database(db: &Arc<DB>, records: &[LegacyBlockRecord], version: u32, block_total: u64) {
    seed_legacy_db(db, records).unwrap();
    DagMetadataStore::new(db.clone()).set(DagMetadata::new(version, block_total)).unwrap();
}

pub fn h(word: u64) -> Hash {
    Hash::from_u64_word(word)
}

/// Root H1 at id 0, H2 on top of it, and H3 on top of both with H2 as main parent.
/// H3 has H1 in its blue anticone and H2 in its red one.
pub fn three_block_dag() -> Vec<LegacyBlockRecord> {
    let mut b1 = LegacyBlockRecord::root(1, h(2));
    b1.parents = vec![h(1)];
    b1.main_parent = h(1);
    b1.height = 1;
    let mut b2 = LegacyBlockRecord::root(2, h(3));
    b2.parents = vec![h(1), h(2)];
    b2.main_parent = h(2);
    b2.height = 2;
    b2.blue_num = 1;
    b2.blue_anticone = vec![(h(1), 0)];
    b2.red_anticone = vec![(h(2), 1)];
    vec![LegacyBlockRecord::root(0, h(1)), b1, b2]
}
