//! Chain state: the owned block sequence and its append path.
//!
//! `Chain` holds no lock. The [`crate::Ledger`] wraps it in a single writer
//! gate, so everything here runs with exclusive access when mutating.

use std::iter;

use serde_json::Value;
use starledger_core::{
    validate_blocks, validate_chain, Block, BlockHash, BlockPayload, ChainFinding,
};

use crate::error::{CorruptedRecord, LedgerError, Result};
use crate::ledger::OwnerScan;

#[derive(Debug, Clone, Default)]
pub(crate) struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Height of the tip, or `None` for an empty chain.
    pub(crate) fn height(&self) -> Option<u64> {
        (self.blocks.len() as u64).checked_sub(1)
    }

    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Append the genesis block if the chain is empty.
    ///
    /// Returns the genesis block when one was created.
    pub(crate) fn initialize(&mut self, marker: &Value, now: i64) -> Result<Option<Block>> {
        if self.height().is_some() {
            return Ok(None);
        }
        let genesis = self.append(Block::new(marker), now)?;
        tracing::info!("Created genesis block at {}", genesis.timestamp);
        Ok(Some(genesis))
    }

    /// Position, seal, and commit a block.
    ///
    /// The candidate is checked together with every stored block; if any
    /// finding comes back, the chain is left untouched.
    pub(crate) fn append(&mut self, mut block: Block, now: i64) -> Result<Block> {
        let height = self.height();

        block.previous_hash = self.blocks.last().and_then(|tip| tip.hash);
        block.timestamp = now;
        block.height = height.map_or(0, |h| h + 1);
        let hash = block.seal();
        tracing::debug!("Sealed candidate block {} at height {}", hash.to_hex(), block.height);

        let findings = validate_blocks(self.blocks.iter().chain(iter::once(&block)));
        if !findings.is_empty() {
            tracing::warn!(
                "Refusing append at height {}: {} finding(s), first: {}",
                block.height,
                findings.len(),
                findings[0]
            );
            return Err(LedgerError::ChainInvalid { findings });
        }

        self.blocks.push(block.clone());
        tracing::info!("Appended block {} at height {}", hash.to_hex(), block.height);
        Ok(block)
    }

    pub(crate) fn validate(&self) -> Vec<ChainFinding> {
        validate_chain(&self.blocks)
    }

    /// First block whose stored hash matches. Hashes are assumed unique.
    pub(crate) fn by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|b| b.hash.as_ref() == Some(hash))
    }

    pub(crate) fn by_height(&self, height: u64) -> Option<&Block> {
        usize::try_from(height).ok().and_then(|i| self.blocks.get(i))
    }

    /// Collect the records owned by `identity`, in height order.
    ///
    /// Position 0 is skipped. Anything after it that is not an owned record,
    /// including a second genesis marker, is reported as corrupted.
    pub(crate) fn records_by_owner(&self, identity: &str) -> OwnerScan {
        let mut scan = OwnerScan::default();

        for block in self.blocks.iter().skip(1) {
            let reason = match block.classify() {
                BlockPayload::Owned(record) => {
                    if record.owner == identity {
                        scan.records.push(record);
                    }
                    continue;
                }
                BlockPayload::Corrupted(reason) => reason,
                BlockPayload::GenesisMarker(_) => "genesis marker past position 0".to_string(),
            };

            tracing::warn!("Corrupted record at height {}: {}", block.height, reason);
            scan.corrupted.push(CorruptedRecord {
                height: block.height,
                reason,
            });
        }

        scan
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}
