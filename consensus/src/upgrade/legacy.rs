//! The legacy block record layout.
//!
//! A legacy record references other blocks by hash. Integers are little-endian,
//! hashes are raw bytes, and fields follow each other with no framing:
//!
//! ```text
//! id: u32 | hash | parent_count: u32 | parent_count x hash | main_parent: hash
//! weight: u64 | order: u32 | layer: u32 | height: u32 | status: u8 | blue_num: u32
//! blue_count: u32 | blue_count x (hash, order: u32)
//! red_count: u32 | red_count x (hash, order: u32)
//! ```
//!
//! An all-zero main parent hash stands for "no main parent", so no block may carry it as its own hash.

use super::resolver::BlockResolverReader;
use blockdag_consensus_core::{
    BlockId, NONE_ID,
    block::{AnticoneMap, Block, BlockParents, PhantomBlock},
    blockstatus::BlockStatus,
    errors::upgrade::{LegacyField, ReferenceKind, UpgradeError, UpgradeResult},
};
use blockdag_hashes::{HASH_SIZE, Hash, ZERO_HASH};
use indexmap::map::Entry;

const ANTICONE_ENTRY_SIZE: usize = HASH_SIZE + size_of::<u32>();

/// Decodes a single legacy record, translating hash references into ids through a resolver
pub struct LegacyBlockDecoder<'a> {
    data: &'a [u8],
}

impl<'a> LegacyBlockDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    fn take<const N: usize>(&mut self, field: LegacyField) -> UpgradeResult<[u8; N]> {
        let data = self.data;
        let Some((head, tail)) = data.split_first_chunk::<N>() else {
            return Err(UpgradeError::TruncatedRecord { field, needed: N, remaining: data.len() });
        };
        self.data = tail;
        Ok(*head)
    }

    fn read_u8(&mut self, field: LegacyField) -> UpgradeResult<u8> {
        Ok(self.take::<1>(field)?[0])
    }

    fn read_u32(&mut self, field: LegacyField) -> UpgradeResult<u32> {
        Ok(u32::from_le_bytes(self.take(field)?))
    }

    fn read_u64(&mut self, field: LegacyField) -> UpgradeResult<u64> {
        Ok(u64::from_le_bytes(self.take(field)?))
    }

    fn read_hash(&mut self, field: LegacyField) -> UpgradeResult<Hash> {
        Ok(Hash::from_bytes(self.take(field)?))
    }

    /// Reads an entry count and checks the entries fit in what is left of the record,
    /// so a corrupt count fails before anything is allocated for it
    fn read_count(&mut self, count_field: LegacyField, entry_field: LegacyField, entry_size: usize) -> UpgradeResult<usize> {
        let count = self.read_u32(count_field)? as usize;
        let needed = count.saturating_mul(entry_size);
        if needed > self.data.len() {
            return Err(UpgradeError::TruncatedRecord { field: entry_field, needed, remaining: self.data.len() });
        }
        Ok(count)
    }

    fn read_parents(&mut self, resolver: &impl BlockResolverReader) -> UpgradeResult<BlockParents> {
        let count = self.read_count(LegacyField::ParentCount, LegacyField::Parent, HASH_SIZE)?;
        let mut parents = BlockParents::with_capacity(count);
        for _ in 0..count {
            let hash = self.read_hash(LegacyField::Parent)?;
            let id = resolver.resolve_id(&hash, ReferenceKind::Parent)?;
            if !parents.insert(id) {
                return Err(UpgradeError::DuplicateEntry(ReferenceKind::Parent, id));
            }
        }
        Ok(parents)
    }

    fn read_main_parent(&mut self, resolver: &impl BlockResolverReader) -> UpgradeResult<BlockId> {
        let hash = self.read_hash(LegacyField::MainParent)?;
        if hash.is_zero() { Ok(NONE_ID) } else { resolver.resolve_id(&hash, ReferenceKind::MainParent) }
    }

    fn read_anticone(
        &mut self,
        resolver: &impl BlockResolverReader,
        count_field: LegacyField,
        entry_field: LegacyField,
        kind: ReferenceKind,
    ) -> UpgradeResult<AnticoneMap> {
        let count = self.read_count(count_field, entry_field, ANTICONE_ENTRY_SIZE)?;
        let mut anticone = AnticoneMap::with_capacity(count);
        for _ in 0..count {
            let hash = self.read_hash(entry_field)?;
            let order = self.read_u32(entry_field)?;
            let id = resolver.resolve_id(&hash, kind)?;
            match anticone.entry(id) {
                Entry::Occupied(_) => return Err(UpgradeError::DuplicateEntry(kind, id)),
                Entry::Vacant(e) => {
                    e.insert(order);
                }
            }
        }
        Ok(anticone)
    }

    /// Decodes the whole record. Fails if any reference is unresolved or if bytes are left over
    pub fn decode(mut self, resolver: &impl BlockResolverReader) -> UpgradeResult<PhantomBlock> {
        let id = self.read_u32(LegacyField::Id)?;
        let hash = self.read_hash(LegacyField::Hash)?;
        if hash.is_zero() {
            return Err(UpgradeError::ReservedHash(id));
        }
        let parents = self.read_parents(resolver)?;
        let main_parent = self.read_main_parent(resolver)?;
        let weight = self.read_u64(LegacyField::Weight)?;
        let order = self.read_u32(LegacyField::Order)?;
        let layer = self.read_u32(LegacyField::Layer)?;
        let height = self.read_u32(LegacyField::Height)?;
        let status = BlockStatus::from_byte(self.read_u8(LegacyField::Status)?);
        let blue_num = self.read_u32(LegacyField::BlueNum)?;
        let blue_diff_anticone =
            self.read_anticone(resolver, LegacyField::BlueCount, LegacyField::BlueEntry, ReferenceKind::BlueAnticone)?;
        let red_diff_anticone = self.read_anticone(resolver, LegacyField::RedCount, LegacyField::RedEntry, ReferenceKind::RedAnticone)?;

        if !self.data.is_empty() {
            return Err(UpgradeError::TrailingBytes(self.data.len()));
        }

        let block = Block { id, hash, parents, main_parent, weight, order, layer, height, status };
        Ok(PhantomBlock::new(block, blue_num, blue_diff_anticone, red_diff_anticone))
    }
}

/// Decodes one legacy record. The resolver is only read from
pub fn decode_legacy_block(data: &[u8], resolver: &impl BlockResolverReader) -> UpgradeResult<PhantomBlock> {
    LegacyBlockDecoder::new(data).decode(resolver)
}

/// A legacy record with its references still in hash form. Encodes to the legacy layout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyBlockRecord {
    pub id: BlockId,
    pub hash: Hash,
    pub parents: Vec<Hash>,
    /// `ZERO_HASH` for no main parent
    pub main_parent: Hash,
    pub weight: u64,
    pub order: u32,
    pub layer: u32,
    pub height: u32,
    pub status: u8,
    pub blue_num: u32,
    pub blue_anticone: Vec<(Hash, u32)>,
    pub red_anticone: Vec<(Hash, u32)>,
}

impl LegacyBlockRecord {
    /// Builds a root record: no parents, no main parent, empty anticones
    pub fn root(id: BlockId, hash: Hash) -> Self {
        Self {
            id,
            hash,
            parents: Vec::new(),
            main_parent: ZERO_HASH,
            weight: 1,
            order: id,
            layer: 0,
            height: 0,
            status: BlockStatus::VALID.bits(),
            blue_num: 0,
            blue_anticone: Vec::new(),
            red_anticone: Vec::new(),
        }
    }

    /// Converts a decoded block back to hash references. `hash_of` must know every id the block references
    pub fn from_block(block: &PhantomBlock, hash_of: impl Fn(BlockId) -> Hash) -> Self {
        let b = &block.block;
        Self {
            id: b.id,
            hash: b.hash,
            parents: b.parents.iter().map(|&p| hash_of(p)).collect(),
            main_parent: b.main_parent().map_or(ZERO_HASH, &hash_of),
            weight: b.weight,
            order: b.order,
            layer: b.layer,
            height: b.height,
            status: b.status.bits(),
            blue_num: block.blue_num,
            blue_anticone: block.blue_diff_anticone.iter().map(|(&id, &order)| (hash_of(id), order)).collect(),
            red_anticone: block.red_diff_anticone.iter().map(|(&id, &order)| (hash_of(id), order)).collect(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        4 + HASH_SIZE
            + 4
            + self.parents.len() * HASH_SIZE
            + HASH_SIZE
            + 8
            + 4 * 3
            + 1
            + 4
            + 4
            + self.blue_anticone.len() * ANTICONE_ENTRY_SIZE
            + 4
            + self.red_anticone.len() * ANTICONE_ENTRY_SIZE
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.extend_from_slice(&self.hash.as_bytes());
        buf.extend_from_slice(&(self.parents.len() as u32).to_le_bytes());
        for parent in self.parents.iter() {
            buf.extend_from_slice(&parent.as_bytes());
        }
        buf.extend_from_slice(&self.main_parent.as_bytes());
        buf.extend_from_slice(&self.weight.to_le_bytes());
        buf.extend_from_slice(&self.order.to_le_bytes());
        buf.extend_from_slice(&self.layer.to_le_bytes());
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.push(self.status);
        buf.extend_from_slice(&self.blue_num.to_le_bytes());
        for anticone in [&self.blue_anticone, &self.red_anticone] {
            buf.extend_from_slice(&(anticone.len() as u32).to_le_bytes());
            for (hash, order) in anticone.iter() {
                buf.extend_from_slice(&hash.as_bytes());
                buf.extend_from_slice(&order.to_le_bytes());
            }
        }
        buf
    }
}

/// Re-encodes a decoded block in the legacy layout
pub fn encode_legacy_block(block: &PhantomBlock, hash_of: impl Fn(BlockId) -> Hash) -> Vec<u8> {
    LegacyBlockRecord::from_block(block, hash_of).encode()
}
