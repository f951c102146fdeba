//! # Star Ledger Core
//!
//! Pure primitives for the star ledger: blocks, their canonical digest, the
//! payload codec, and the signature seam used by the ownership challenge.
//!
//! This crate contains no I/O, no locking, and no storage.
//!
//! ## Key Types
//!
//! - [`Block`] - One sealed record, bound to its predecessor by hash
//! - [`BlockHash`] - Blake3 digest of a block's canonical bytes
//! - [`BlockPayload`] - Typed view of a block body
//! - [`ChainFinding`] - A linkage or tamper problem found by [`validate_chain`]
//! - [`SignatureVerifier`] - The seam for challenge signature checks
//!
//! ## Canonicalization
//!
//! Block hashes are computed over deterministic CBOR. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod types;
pub mod validation;

pub use block::{Block, GENESIS_HEIGHT};
pub use canonical::canonical_block_bytes;
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Ed25519Verifier, Keypair, SignatureVerifier};
pub use error::CoreError;
pub use payload::{decode_payload, encode_payload, BlockPayload, OwnedRecord};
pub use types::BlockHash;
pub use validation::{validate_blocks, validate_chain, ChainFinding};
