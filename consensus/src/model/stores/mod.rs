pub mod block_index;
pub mod legacy_blocks;
pub mod metadata;

use blockdag_consensus_core::BlockId;
use std::fmt::Display;

pub use blockdag_database::prelude::DB;

const BLOCK_ID_KEY_SIZE: usize = size_of::<BlockId>();

/// DB key of a block index entry. Big-endian so that the DB iterates entries in id order
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone)]
pub struct BlockIdKey([u8; BLOCK_ID_KEY_SIZE]);

impl AsRef<[u8]> for BlockIdKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for BlockIdKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", BlockId::from(*self))
    }
}

impl From<BlockId> for BlockIdKey {
    fn from(id: BlockId) -> Self {
        Self(id.to_be_bytes())
    }
}

impl From<BlockIdKey> for BlockId {
    fn from(key: BlockIdKey) -> Self {
        BlockId::from_be_bytes(key.0)
    }
}

impl TryFrom<&[u8]> for BlockIdKey {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(slice.try_into()?))
    }
}
