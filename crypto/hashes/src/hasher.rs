use crate::Hash;
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

/// `Hash` feeds a single pre-mixed `u64` into the hasher, so the map hasher
/// can simply return it instead of hashing the digest a second time.
#[derive(Default, Clone, Copy)]
pub struct BlockHasher(u64);

impl Hasher for BlockHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    fn write_u64(&mut self, v: u64) {
        self.0 = v;
    }

    #[cold]
    fn write(&mut self, _: &[u8]) {
        unimplemented!("hashing of `Hash` must go through `write_u64`")
    }
}

pub type BlockHashMap<V> = HashMap<Hash, V, BuildHasherDefault<BlockHasher>>;
