pub mod constants;

use constants::{DEFAULT_BLOCK_INDEX_CACHE_SIZE, DEFAULT_PROGRESS_LOG_INTERVAL, DEFAULT_RESOLVER_CAPACITY};

/// Tuning knobs for a block index upgrade. None of them affect the migrated data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeConfig {
    /// Log a progress line every this many decoded records (0 disables progress logs)
    pub progress_log_interval: u32,

    /// Initial capacity of the hash resolver. Capped by the number of blocks being migrated
    pub resolver_capacity: usize,

    /// Number of current-format blocks cached by the block index store
    pub block_index_cache_size: usize,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            progress_log_interval: DEFAULT_PROGRESS_LOG_INTERVAL,
            resolver_capacity: DEFAULT_RESOLVER_CAPACITY,
            block_index_cache_size: DEFAULT_BLOCK_INDEX_CACHE_SIZE,
        }
    }
}

impl UpgradeConfig {
    pub fn with_progress_log_interval(self, progress_log_interval: u32) -> Self {
        Self { progress_log_interval, ..self }
    }

    pub fn with_resolver_capacity(self, resolver_capacity: usize) -> Self {
        Self { resolver_capacity, ..self }
    }

    pub fn with_block_index_cache_size(self, block_index_cache_size: usize) -> Self {
        Self { block_index_cache_size, ..self }
    }
}
