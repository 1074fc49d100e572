use blockdag_utils::mem_size::MemSizeEstimator;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Validation status bits of a block, persisted as a raw byte. Bits unknown
    /// to this version are carried through untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BlockStatus: u8 {
        const VALID = 0;
        const INVALID = 1 << 0;
        const BAD_ORDER = 1 << 1;
    }
}

impl MemSizeEstimator for BlockStatus {}

impl BlockStatus {
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bits_are_retained() {
        let status = BlockStatus::from_byte(0b1000_0011);
        assert!(status.contains(BlockStatus::INVALID));
        assert!(status.contains(BlockStatus::BAD_ORDER));
        assert_eq!(status.bits(), 0b1000_0011);

        let bytes = bincode::serialize(&status).unwrap();
        let decoded: BlockStatus = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, status);
    }

    #[test]
    fn test_valid_is_empty() {
        assert!(BlockStatus::VALID.is_empty());
        assert_eq!(BlockStatus::from_byte(0), BlockStatus::VALID);
        assert!(!BlockStatus::BAD_ORDER.contains(BlockStatus::INVALID));
    }
}
