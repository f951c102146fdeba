//! Test fixtures and helpers.

use serde_json::Value;
use starledger::{Block, Keypair, Ledger, LedgerConfig, Result};

/// An identity that can answer ownership challenges.
#[derive(Debug, Clone)]
pub struct TestIdentity {
    pub keypair: Keypair,
}

impl TestIdentity {
    /// Create a new identity with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// The identity string recorded as owner.
    pub fn identity(&self) -> String {
        self.keypair.identity()
    }

    /// Sign a challenge string.
    pub fn sign(&self, challenge: &str) -> String {
        self.keypair.sign_challenge(challenge)
    }

    /// Run the full challenge workflow against `ledger`.
    pub async fn submit(&self, ledger: &Ledger, content: Value) -> Result<Block> {
        let identity = self.identity();
        let challenge = ledger.request_ownership_challenge(&identity);
        let signature = self.sign(&challenge);
        ledger
            .submit_record(&identity, &challenge, &signature, content)
            .await
    }
}

impl Default for TestIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Create distinct deterministic identities for multi-party tests.
pub fn multi_party_identities(count: usize) -> Vec<TestIdentity> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0xa5;
            TestIdentity::with_seed(seed)
        })
        .collect()
}

/// Build a default ledger and submit each `(owner, content)` pair in order.
pub async fn populated_ledger(records: &[(&TestIdentity, Value)]) -> Result<Ledger> {
    let ledger = Ledger::new(LedgerConfig::default())?;
    for (owner, content) in records {
        owner.submit(&ledger, content.clone()).await?;
    }
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_identity_submits() {
        let identity = TestIdentity::new();
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();

        let block = identity
            .submit(&ledger, json!({"star": {"ra": "1", "dec": "2"}}))
            .await
            .unwrap();
        assert_eq!(block.height, 1);
    }

    #[tokio::test]
    async fn test_populated_ledger() {
        let parties = multi_party_identities(2);
        let ledger = populated_ledger(&[
            (&parties[0], json!({"star": {"ra": "a"}})),
            (&parties[1], json!({"star": {"ra": "b"}})),
            (&parties[0], json!({"star": {"ra": "c"}})),
        ])
        .await
        .unwrap();

        assert_eq!(ledger.current_height().await, 3);
        assert!(ledger.validate_chain().await.is_empty());
        assert_eq!(ledger.records_by_owner(&parties[0].identity()).await.records.len(), 2);
        assert_eq!(ledger.records_by_owner(&parties[1].identity()).await.records.len(), 1);
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_identities(3);
        let ids: Vec<_> = parties.iter().map(|p| p.identity()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }
}
