use super::{legacy::decode_legacy_block, resolver::BlockResolver};
use crate::model::stores::{block_index::BlockIndexWriter, legacy_blocks::LegacyBlockReader};
use blockdag_consensus_core::{
    BlockId, MAX_BLOCK_TOTAL,
    block::PhantomBlock,
    config::UpgradeConfig,
    errors::upgrade::{UpgradeError, UpgradeResult},
};
use blockdag_core::{debug, info, trace};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpgradeSummary {
    pub blocks_read: u64,
    pub blocks_written: u64,
}

/// Migrates the block index from legacy records to the current format in a single pass.
///
/// Records are read and decoded in id order, so every hash a record references must
/// belong to a record with a smaller id. Once all records are decoded, blocks are handed
/// to the writer in id order. Any failure aborts the pass; the writer's effects are
/// expected to be discarded by the caller in that case.
pub struct BlockIndexUpgrade {
    config: UpgradeConfig,
    resolver: BlockResolver,
}

impl BlockIndexUpgrade {
    pub fn new(config: UpgradeConfig) -> Self {
        Self { config, resolver: BlockResolver::new() }
    }

    pub fn resolver(&self) -> &BlockResolver {
        &self.resolver
    }

    /// Runs the pass over ids `0..block_total`. The resolver is emptied whatever the outcome
    pub fn run(
        &mut self,
        reader: &impl LegacyBlockReader,
        writer: &mut impl BlockIndexWriter,
        block_total: u64,
    ) -> UpgradeResult<UpgradeSummary> {
        let result = self.run_inner(reader, writer, block_total);
        self.resolver.clear();
        result
    }

    fn run_inner(
        &mut self,
        reader: &impl LegacyBlockReader,
        writer: &mut impl BlockIndexWriter,
        block_total: u64,
    ) -> UpgradeResult<UpgradeSummary> {
        if block_total > MAX_BLOCK_TOTAL {
            return Err(UpgradeError::BlockTotalOutOfRange(block_total));
        }
        let block_total = block_total as BlockId;
        info!("Upgrading block index of {} blocks", block_total);

        self.resolver = BlockResolver::with_capacity(self.config.resolver_capacity.min(block_total as usize));
        let mut summary = UpgradeSummary::default();
        for id in 0..block_total {
            let block = self.decode_next(reader, id)?;
            summary.blocks_read += 1;
            self.resolver.put(block.hash(), block)?;
            self.log_progress(id + 1, block_total);
        }
        debug!("Decoded {} legacy block records, writing current-format records", summary.blocks_read);

        for block in self.resolver.sorted_blocks() {
            writer.write_block(&block).map_err(|err| UpgradeError::EncodeFailure(block.id(), err.to_string()))?;
            summary.blocks_written += 1;
        }

        info!("Block index upgrade done: {} blocks read, {} written", summary.blocks_read, summary.blocks_written);
        Ok(summary)
    }

    fn decode_next(&self, reader: &impl LegacyBlockReader, id: BlockId) -> UpgradeResult<Arc<PhantomBlock>> {
        let record = match reader.read_legacy(id) {
            Ok(Some(record)) => record,
            Ok(None) => return Err(UpgradeError::ReadFailure(id, "record is missing".to_string())),
            Err(err) => return Err(UpgradeError::ReadFailure(id, err.to_string())),
        };
        let block = decode_legacy_block(&record, &self.resolver)?;
        if block.id() != id {
            return Err(UpgradeError::IdMismatch { expected: id, found: block.id() });
        }
        trace!(
            "Decoded block {} ({}) with {} parents, main parent {:?}",
            id,
            block.hash(),
            block.block.parents.len(),
            block.block.main_parent()
        );
        Ok(Arc::new(block))
    }

    fn log_progress(&self, decoded: BlockId, block_total: BlockId) {
        let interval = self.config.progress_log_interval;
        if interval > 0 && decoded % interval == 0 && decoded < block_total {
            info!("Decoded {}/{} legacy block records ({:.1}%)", decoded, block_total, decoded as f64 * 100.0 / block_total as f64);
        }
    }
}
