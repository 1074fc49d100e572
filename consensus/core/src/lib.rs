pub mod block;
pub mod blockstatus;
pub mod config;
pub mod errors;

/// Dense sequential identifier of a block within the block index
pub type BlockId = u32;

/// The id reserved for "no block", e.g. the main parent of a root block.
/// It is never assigned to a real block.
pub const NONE_ID: BlockId = BlockId::MAX;

/// Upper bound on the number of blocks an index can hold, since ids are
/// assigned densely from zero and [`NONE_ID`] is reserved
pub const MAX_BLOCK_TOTAL: u64 = NONE_ID as u64;
