//! # Star Ledger
//!
//! An append-only, tamper-evident ledger of star ownership records.
//!
//! ## Overview
//!
//! - **Blocks**: Sealed records, each bound to its predecessor by hash
//! - **Genesis**: The fixed first block, created when a ledger is built
//! - **Challenges**: Short-lived strings an identity signs before it may write
//! - **Integrity**: Every append re-validates the chain and refuses to extend
//!   an inconsistent one
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starledger::{Keypair, Ledger, LedgerConfig};
//! use serde_json::json;
//!
//! async fn example() {
//!     let ledger = Ledger::new(LedgerConfig::default()).unwrap();
//!     let keypair = Keypair::generate();
//!     let identity = keypair.identity();
//!
//!     let challenge = ledger.request_ownership_challenge(&identity);
//!     let signature = keypair.sign_challenge(&challenge);
//!
//!     let block = ledger
//!         .submit_record(&identity, &challenge, &signature, json!({"star": {"ra": "1", "dec": "2"}}))
//!         .await
//!         .unwrap();
//!     assert_eq!(block.height, 1);
//! }
//! ```
//!
//! Persistence and transport are left to the caller: [`Ledger::blocks`]
//! exports the chain and [`Ledger::from_blocks`] loads one back.

mod chain;
pub mod challenge;
pub mod config;
pub mod error;
pub mod ledger;

pub use starledger_core as core;

pub use challenge::Challenge;
pub use config::LedgerConfig;
pub use error::{CorruptedRecord, LedgerError, Result};
pub use ledger::{Ledger, OwnerScan};

pub use starledger_core::{
    Block, BlockHash, BlockPayload, ChainFinding, Ed25519Verifier, Keypair, OwnedRecord,
    SignatureVerifier,
};
