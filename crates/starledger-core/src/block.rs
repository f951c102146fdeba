//! Block: one sealed record in the ledger.
//!
//! A block is built unsealed, then the ledger fills in its position
//! (`height`, `timestamp`, `previous_hash`) and seals it. After sealing the
//! stored `hash` covers every other field, so any later edit is detectable
//! through [`Block::validate`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::canonical_block_bytes;
use crate::error::CoreError;
use crate::payload::{decode_payload, encode_payload, BlockPayload, OwnedRecord};
use crate::types::BlockHash;

/// Height reserved for the genesis block.
pub const GENESIS_HEIGHT: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Digest over all other fields. `None` until sealed.
    pub hash: Option<BlockHash>,

    /// Position in the chain. 0 is the genesis block.
    pub height: u64,

    /// Encoded payload (see [`crate::payload`]).
    pub body: String,

    /// Unix seconds, assigned when the block is appended.
    pub timestamp: i64,

    /// Hash of the block at `height - 1`. `None` only for genesis.
    pub previous_hash: Option<BlockHash>,
}

impl Block {
    /// Build an unsealed block carrying `payload`.
    pub fn new(payload: &Value) -> Self {
        Self {
            hash: None,
            height: 0,
            body: encode_payload(payload),
            timestamp: 0,
            previous_hash: None,
        }
    }

    /// Build an unsealed block carrying an owned record.
    pub fn from_record(record: &OwnedRecord) -> Self {
        Self::new(&record.to_value())
    }

    /// Recompute the digest over every field except `hash`.
    pub fn compute_hash(&self) -> BlockHash {
        BlockHash::digest(&canonical_block_bytes(self))
    }

    /// Store the digest of the current field values.
    pub fn seal(&mut self) -> BlockHash {
        let hash = self.compute_hash();
        self.hash = Some(hash);
        hash
    }

    pub fn is_sealed(&self) -> bool {
        self.hash.is_some()
    }

    /// Check the stored hash against the current contents.
    ///
    /// Unsealed blocks never validate.
    pub fn validate(&self) -> bool {
        self.hash == Some(self.compute_hash())
    }

    /// A sealed block at height 0 with no predecessor.
    ///
    /// Unsealed blocks are never genesis, whatever their height.
    pub fn is_genesis(&self) -> bool {
        self.height == GENESIS_HEIGHT && self.previous_hash.is_none() && self.is_sealed()
    }

    /// Decode the payload this block was built with.
    ///
    /// Returns `Ok(None)` for the sealed genesis block: its body is a
    /// sentinel, not content.
    pub fn decode_payload(&self) -> Result<Option<Value>, CoreError> {
        if self.is_genesis() {
            return Ok(None);
        }
        decode_payload(&self.body).map(Some)
    }

    /// Classify the body as one of the known payload shapes.
    pub fn classify(&self) -> BlockPayload {
        if self.is_genesis() {
            return match decode_payload(&self.body) {
                Ok(marker) => BlockPayload::GenesisMarker(marker),
                Err(e) => BlockPayload::Corrupted(e.to_string()),
            };
        }

        match decode_payload(&self.body).and_then(OwnedRecord::from_value) {
            Ok(record) => BlockPayload::Owned(record),
            Err(e) => BlockPayload::Corrupted(e.to_string()),
        }
    }
}
