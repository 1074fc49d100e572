use crate::BlockId;
use blockdag_hashes::Hash;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A field of a legacy block record, named in truncation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyField {
    Id,
    Hash,
    ParentCount,
    Parent,
    MainParent,
    Weight,
    Order,
    Layer,
    Height,
    Status,
    BlueNum,
    BlueCount,
    BlueEntry,
    RedCount,
    RedEntry,
}

impl Display for LegacyField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LegacyField::Id => "id",
            LegacyField::Hash => "hash",
            LegacyField::ParentCount => "parent count",
            LegacyField::Parent => "parent",
            LegacyField::MainParent => "main parent",
            LegacyField::Weight => "weight",
            LegacyField::Order => "order",
            LegacyField::Layer => "layer",
            LegacyField::Height => "height",
            LegacyField::Status => "status",
            LegacyField::BlueNum => "blue num",
            LegacyField::BlueCount => "blue anticone count",
            LegacyField::BlueEntry => "blue anticone entry",
            LegacyField::RedCount => "red anticone count",
            LegacyField::RedEntry => "red anticone entry",
        };
        f.write_str(name)
    }
}

/// The kind of hash reference a legacy record makes to another block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Parent,
    MainParent,
    BlueAnticone,
    RedAnticone,
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReferenceKind::Parent => "parent",
            ReferenceKind::MainParent => "main parent",
            ReferenceKind::BlueAnticone => "blue anticone",
            ReferenceKind::RedAnticone => "red anticone",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("failed reading legacy record of block {0}: {1}")]
    ReadFailure(BlockId, String),

    #[error("legacy record truncated while reading {field}: needed {needed} bytes, {remaining} left")]
    TruncatedRecord { field: LegacyField, needed: usize, remaining: usize },

    #[error("{0} reference {1} does not resolve to a previously decoded block")]
    UnresolvedReference(ReferenceKind, Hash),

    #[error("legacy record of block {0} carries the reserved all-zero hash")]
    ReservedHash(BlockId),

    #[error("block hash {0} was registered twice")]
    DuplicateHash(Hash),

    #[error("failed writing block {0}: {1}")]
    EncodeFailure(BlockId, String),

    #[error("legacy record stored under id {expected} decodes to id {found}")]
    IdMismatch { expected: BlockId, found: BlockId },

    #[error("{0} set lists block {1} more than once")]
    DuplicateEntry(ReferenceKind, BlockId),

    #[error("legacy record has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("block total {0} exceeds the max of {max}", max = crate::MAX_BLOCK_TOTAL)]
    BlockTotalOutOfRange(u64),

    #[error("block total override {requested} is below the recorded count of {recorded}")]
    BlockTotalBelowRecorded { requested: u64, recorded: u64 },

    #[error("database version {0} cannot be upgraded")]
    UnsupportedVersion(u32),

    #[error("store error: {0}")]
    Store(String),
}

pub type UpgradeResult<T> = std::result::Result<T, UpgradeError>;
