use crate::{BlockId, NONE_ID, blockstatus::BlockStatus};
use blockdag_hashes::Hash;
use blockdag_utils::mem_size::MemSizeEstimator;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::mem::size_of;

/// Parents of a block, as resolved ids in their persisted order
pub type BlockParents = IndexSet<BlockId>;

/// Maps an anticone member to its topological order at the time the anticone was computed.
/// Insertion order follows the persisted record.
pub type AnticoneMap = IndexMap<BlockId, u32>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub hash: Hash,
    pub parents: BlockParents,
    /// The main parent id, or [`NONE_ID`] for a root block
    pub main_parent: BlockId,
    pub weight: u64,
    pub order: u32,
    pub layer: u32,
    pub height: u32,
    pub status: BlockStatus,
}

impl Block {
    pub fn main_parent(&self) -> Option<BlockId> {
        (self.main_parent != NONE_ID).then_some(self.main_parent)
    }
}

/// A block extended with the phantom blue/red classification of its anticone.
/// Once built it is shared behind an `Arc` and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhantomBlock {
    pub block: Block,
    pub blue_num: u32,
    pub blue_diff_anticone: AnticoneMap,
    pub red_diff_anticone: AnticoneMap,
}

impl PhantomBlock {
    pub fn new(block: Block, blue_num: u32, blue_diff_anticone: AnticoneMap, red_diff_anticone: AnticoneMap) -> Self {
        Self { block, blue_num, blue_diff_anticone, red_diff_anticone }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.block.id
    }

    #[inline]
    pub fn hash(&self) -> Hash {
        self.block.hash
    }
}

impl MemSizeEstimator for PhantomBlock {
    fn estimate_mem_bytes(&self) -> usize {
        size_of::<Self>()
            + self.block.parents.len() * size_of::<BlockId>()
            + (self.blue_diff_anticone.len() + self.red_diff_anticone.len()) * size_of::<(BlockId, u32)>()
    }
}
