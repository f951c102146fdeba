//! Error types for the star ledger core.

use thiserror::Error;

/// Core errors that can occur while building, hashing, or decoding blocks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The stored body could not be turned back into a structured payload.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
