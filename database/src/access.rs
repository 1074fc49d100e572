use crate::{cache::CachePolicy, db::DB, errors::StoreError};

use super::prelude::{Cache, DbKey, DbWriter};
use blockdag_utils::mem_size::MemSizeEstimator;
use rocksdb::{Direction, IteratorMode, ReadOptions};
use serde::{Serialize, de::DeserializeOwned};
use std::{collections::hash_map::RandomState, error::Error, hash::BuildHasher, sync::Arc};

/// A concurrent DB store access with typed caching.
#[derive(Clone)]
pub struct CachedDbAccess<TKey, TData, S = RandomState>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync + MemSizeEstimator,
{
    db: Arc<DB>,

    // Cache
    cache: Cache<TKey, TData, S>,

    // DB bucket/path
    prefix: Vec<u8>,
}

pub type KeyDataResult<TData> = Result<(Box<[u8]>, TData), Box<dyn Error>>;

impl<TKey, TData, S> CachedDbAccess<TKey, TData, S>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync + MemSizeEstimator,
    S: BuildHasher + Default,
{
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy, prefix: Vec<u8>) -> Self {
        Self { db, cache: Cache::new(cache_policy), prefix }
    }

    pub fn has(&self, key: TKey) -> Result<bool, StoreError>
    where
        TKey: AsRef<[u8]>,
    {
        Ok(self.cache.contains_key(&key) || self.db.get_pinned(DbKey::new(&self.prefix, key))?.is_some())
    }

    pub fn read(&self, key: TKey) -> Result<TData, StoreError>
    where
        TKey: AsRef<[u8]>,
        TData: DeserializeOwned, // We need `DeserializeOwned` since the slice coming from `db.get_pinned` has short lifetime
    {
        if let Some(data) = self.cache.get(&key) {
            Ok(data)
        } else {
            let db_key = DbKey::new(&self.prefix, key.clone());
            if let Some(slice) = self.db.get_pinned(&db_key)? {
                let data: TData = bincode::deserialize(&slice)?;
                self.cache.insert(key, data.clone());
                Ok(data)
            } else {
                Err(StoreError::KeyNotFound(db_key))
            }
        }
    }

    /// Iterates all entries under this prefix in key order, bypassing the cache
    pub fn iterator(&self) -> impl Iterator<Item = KeyDataResult<TData>> + '_
    where
        TData: DeserializeOwned,
    {
        let prefix_key = DbKey::prefix_only(&self.prefix);
        let mut read_opts = ReadOptions::default();
        read_opts.set_iterate_range(rocksdb::PrefixRange(prefix_key.as_ref()));
        self.db.iterator_opt(IteratorMode::From(prefix_key.as_ref(), Direction::Forward), read_opts).map(move |iter_result| {
            match iter_result {
                Ok((key, data_bytes)) => match bincode::deserialize(&data_bytes) {
                    Ok(data) => Ok((key[prefix_key.prefix_len()..].into(), data)),
                    Err(e) => Err(e.into()),
                },
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn write(&self, mut writer: impl DbWriter, key: TKey, data: TData) -> Result<(), StoreError>
    where
        TKey: AsRef<[u8]>,
        TData: Serialize,
    {
        let bin_data = bincode::serialize(&data)?;
        self.cache.insert(key.clone(), data);
        writer.put(DbKey::new(&self.prefix, key), bin_data)?;
        Ok(())
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        create_temp_db,
        prelude::{BatchDbWriter, ConnBuilder, DirectDbWriter, MemoryWriter},
    };
    use rocksdb::WriteBatch;

    #[test]
    fn test_read_write() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
        let access = CachedDbAccess::<[u8; 4], u64>::new(db.clone(), CachePolicy::Count(2), vec![1]);

        assert!(!access.has(7u32.to_be_bytes()).unwrap());
        assert!(matches!(access.read(7u32.to_be_bytes()), Err(StoreError::KeyNotFound(_))));

        access.write(DirectDbWriter::new(&db), 7u32.to_be_bytes(), 70).unwrap();
        assert!(access.has(7u32.to_be_bytes()).unwrap());
        assert_eq!(access.read(7u32.to_be_bytes()).unwrap(), 70);

        // A fresh access has a cold cache and must hit the DB
        let cold = CachedDbAccess::<[u8; 4], u64>::new(db.clone(), CachePolicy::Empty, vec![1]);
        assert_eq!(cold.read(7u32.to_be_bytes()).unwrap(), 70);
    }

    #[test]
    fn test_batch_writes_are_invisible_until_commit() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
        let access = CachedDbAccess::<[u8; 4], u64>::new(db.clone(), CachePolicy::Empty, vec![1, 2]);

        let mut batch = WriteBatch::default();
        for i in 0..16u32 {
            access.write(BatchDbWriter::new(&mut batch), i.to_be_bytes(), i as u64 * 2).unwrap();
        }
        assert_eq!(0, access.iterator().count());
        db.write(batch).unwrap();

        let entries = access.iterator().map(|r| r.unwrap()).collect::<Vec<_>>();
        assert_eq!(entries.len(), 16);
        // Big-endian keys iterate in numeric order
        for (i, (key, value)) in entries.into_iter().enumerate() {
            assert_eq!(&key[..], &(i as u32).to_be_bytes());
            assert_eq!(value, i as u64 * 2);
        }
    }

    #[test]
    fn test_prefixes_are_isolated() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
        let first = CachedDbAccess::<[u8; 4], u64>::new(db.clone(), CachePolicy::Empty, vec![1]);
        let second = CachedDbAccess::<[u8; 4], u64>::new(db.clone(), CachePolicy::Empty, vec![2]);
        first.write(DirectDbWriter::new(&db), 1u32.to_be_bytes(), 1).unwrap();
        assert_eq!(first.iterator().count(), 1);
        assert_eq!(second.iterator().count(), 0);
        assert_eq!(first.prefix(), &[1]);
    }

    #[test]
    fn test_memory_writer_only_fills_cache() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10));
        let access = CachedDbAccess::<[u8; 4], u64>::new(db.clone(), CachePolicy::Count(4), vec![3]);
        access.write(MemoryWriter, 9u32.to_be_bytes(), 90).unwrap();
        assert_eq!(access.read(9u32.to_be_bytes()).unwrap(), 90);
        assert_eq!(access.iterator().count(), 0);
    }
}
