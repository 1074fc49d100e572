pub const DEFAULT_PROGRESS_LOG_INTERVAL: u32 = 10_000;

pub const DEFAULT_RESOLVER_CAPACITY: usize = 1 << 16;

pub const DEFAULT_BLOCK_INDEX_CACHE_SIZE: usize = 2_000;
