//! Error types for the ledger.

use starledger_core::{ChainFinding, CoreError};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Core error (payload decoding, hash parsing).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The challenge is older than the configured window.
    #[error("challenge issued at {issued_at} expired: {elapsed}s elapsed, window is {window}s")]
    ChallengeExpired {
        issued_at: i64,
        elapsed: u64,
        window: u64,
    },

    /// The challenge string is not one this ledger issued for the identity.
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// The signature over the challenge does not belong to the identity.
    #[error("invalid signature for identity {0}")]
    InvalidSignature(String),

    /// Appending would leave the chain inconsistent. Nothing was written.
    #[error("chain invalid: {} finding(s)", .findings.len())]
    ChainInvalid { findings: Vec<ChainFinding> },

    #[error("not found: {0}")]
    NotFound(String),
}

/// A non-genesis block whose body is not a readable owned record.
///
/// Reported alongside owner-scan results; it never aborts the scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("corrupted record at height {height}: {reason}")]
pub struct CorruptedRecord {
    pub height: u64,
    pub reason: String,
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
