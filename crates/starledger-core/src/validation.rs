//! Chain validation: linkage and tamper checks over a block sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::types::BlockHash;

/// One problem found while scanning a chain.
///
/// Findings are data, not errors: a scan always completes and reports
/// everything it saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainFinding {
    /// The block at position 0 does not match its own hash.
    GenesisInvalid,

    /// A block's stored height does not match its position.
    HeightMismatch { position: u64, height: u64 },

    /// `previous_hash` does not point at the stored hash of the predecessor,
    /// or the genesis block claims a predecessor at all.
    BrokenLink {
        height: u64,
        expected: Option<BlockHash>,
        found: Option<BlockHash>,
    },

    /// The block's contents no longer match its stored hash.
    Tampered { height: u64 },
}

impl ChainFinding {
    /// The chain position this finding is about.
    pub fn height(&self) -> u64 {
        match self {
            ChainFinding::GenesisInvalid => 0,
            ChainFinding::HeightMismatch { position, .. } => *position,
            ChainFinding::BrokenLink { height, .. } | ChainFinding::Tampered { height } => *height,
        }
    }
}

impl fmt::Display for ChainFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFinding::GenesisInvalid => write!(f, "genesis block invalid"),
            ChainFinding::HeightMismatch { position, height } => {
                write!(f, "block at position {position} claims height {height}")
            }
            ChainFinding::BrokenLink {
                height,
                expected,
                found,
            } => write!(
                f,
                "block {height} has broken link: expected previous hash {expected:?}, found {found:?}"
            ),
            ChainFinding::Tampered { height } => {
                write!(f, "block {height} does not match its hash")
            }
        }
    }
}

/// Validate a full chain, in height order.
pub fn validate_chain(chain: &[Block]) -> Vec<ChainFinding> {
    validate_blocks(chain)
}

/// Validate a sequence of blocks as if they formed a chain from position 0.
///
/// Every block is examined exactly once, in order. Linkage and self-hash are
/// checked independently, so a block can produce both findings.
pub fn validate_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Vec<ChainFinding> {
    let mut findings = Vec::new();
    let mut previous: Option<&Block> = None;

    for (position, block) in (0u64..).zip(blocks) {
        check_block(position, block, previous, &mut findings);
        previous = Some(block);
    }

    findings
}

fn check_block(
    position: u64,
    block: &Block,
    previous: Option<&Block>,
    findings: &mut Vec<ChainFinding>,
) {
    if block.height != position {
        findings.push(ChainFinding::HeightMismatch {
            position,
            height: block.height,
        });
    }

    let Some(previous) = previous else {
        if block.previous_hash.is_some() {
            findings.push(ChainFinding::BrokenLink {
                height: position,
                expected: None,
                found: block.previous_hash,
            });
        }
        if !block.validate() {
            findings.push(ChainFinding::GenesisInvalid);
        }
        return;
    };

    if block.previous_hash != previous.hash {
        findings.push(ChainFinding::BrokenLink {
            height: position,
            expected: previous.hash,
            found: block.previous_hash,
        });
    }

    if !block.validate() {
        findings.push(ChainFinding::Tampered { height: position });
    }
}
