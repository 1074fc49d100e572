use blockdag_utils::mem_size::MemSizeEstimator;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rand::Rng;
use std::{collections::hash_map::RandomState, hash::BuildHasher, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Nothing is cached
    Empty,
    /// Holds at most this many items
    Count(usize),
    /// Holds items up to this many estimated bytes
    Tracked(usize),
}

struct Inner<TKey, TData, S = RandomState>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync + MemSizeEstimator,
{
    // IndexMap makes evicting a random element cheap when the cache is full
    map: IndexMap<TKey, TData, S>,
    tracked_size: usize,
}

#[derive(Clone)]
pub struct Cache<TKey, TData, S = RandomState>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync + MemSizeEstimator,
{
    inner: Arc<RwLock<Inner<TKey, TData, S>>>,
    policy: CachePolicy,
}

impl<TKey, TData, S> Cache<TKey, TData, S>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync + MemSizeEstimator,
    S: BuildHasher + Default,
{
    pub fn new(policy: CachePolicy) -> Self {
        let capacity = match policy {
            // Use `size + 1` for not triggering a realloc if new element exactly overflows capacity
            CachePolicy::Count(max_items) => max_items + 1,
            CachePolicy::Empty | CachePolicy::Tracked(_) => 0,
        };
        let inner = Inner { map: IndexMap::with_capacity_and_hasher(capacity, S::default()), tracked_size: 0 };
        Self { inner: Arc::new(RwLock::new(inner)), policy }
    }

    pub fn get(&self, key: &TKey) -> Option<TData> {
        self.inner.read().map.get(key).cloned()
    }

    pub fn contains_key(&self, key: &TKey) -> bool {
        self.inner.read().map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&self, key: TKey, data: TData) {
        match self.policy {
            CachePolicy::Empty | CachePolicy::Count(0) | CachePolicy::Tracked(0) => {}
            CachePolicy::Count(max_items) => {
                let mut inner = self.inner.write();
                if inner.map.len() == max_items && !inner.map.contains_key(&key) {
                    inner.map.swap_remove_index(rand::thread_rng().gen_range(0..max_items));
                }
                inner.map.insert(key, data);
            }
            CachePolicy::Tracked(max_bytes) => {
                let mut inner = self.inner.write();
                inner.tracked_size += data.estimate_mem_bytes();
                if let Some(removed) = inner.map.insert(key, data) {
                    inner.tracked_size = inner.tracked_size.saturating_sub(removed.estimate_mem_bytes());
                }
                while inner.tracked_size > max_bytes && !inner.map.is_empty() {
                    let index = rand::thread_rng().gen_range(0..inner.map.len());
                    if let Some((_, removed)) = inner.map.swap_remove_index(index) {
                        inner.tracked_size = inner.tracked_size.saturating_sub(removed.estimate_mem_bytes());
                    }
                }
            }
        }
    }

    pub fn remove_all(&self) {
        let mut inner = self.inner.write();
        inner.map.clear();
        inner.tracked_size = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Blob(usize);

    impl MemSizeEstimator for Blob {
        fn estimate_mem_bytes(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_count_policy_evicts() {
        let cache = Cache::<u32, u64>::new(CachePolicy::Count(4));
        for i in 0..10 {
            cache.insert(i, i as u64);
        }
        assert_eq!(cache.len(), 4);
        // Overwriting a present key never evicts
        let present = (0..10).find(|i| cache.contains_key(i)).unwrap();
        cache.insert(present, 100);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.get(&present), Some(100));
    }

    #[test]
    fn test_tracked_policy_bounds_bytes() {
        let cache = Cache::<u32, Blob>::new(CachePolicy::Tracked(100));
        for i in 0..10 {
            cache.insert(i, Blob(30));
        }
        assert_eq!(cache.len(), 3);
        // An item larger than the whole budget never survives its own insertion
        cache.insert(42, Blob(500));
        assert!(!cache.contains_key(&42));
    }

    #[test]
    fn test_empty_policy() {
        let cache = Cache::<u32, u64>::new(CachePolicy::Empty);
        cache.insert(1, 1);
        assert!(cache.get(&1).is_none());
        cache.remove_all();
        assert!(cache.is_empty());
    }
}
