//! # Star Ledger Testkit
//!
//! Testing utilities for the star ledger.
//!
//! - **Fixtures**: deterministic identities that answer challenges, and
//!   ledgers pre-populated with owned records
//! - **Generators**: proptest strategies for star payloads and identities
//!
//! ```rust
//! use starledger_testkit::fixtures::TestIdentity;
//!
//! let alice = TestIdentity::with_seed([1; 32]);
//! let challenge = format!("{}:1700000000:starRegistry", alice.identity());
//! let signature = alice.sign(&challenge);
//! assert_eq!(signature.len(), 128);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_identities, populated_ledger, TestIdentity};
pub use generators::{star_payload, StarParams};
