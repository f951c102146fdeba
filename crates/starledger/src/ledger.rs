//! The Ledger: a hash-chained block sequence behind a single writer gate.
//!
//! Writers (`append`, `submit_record`) hold the write guard for the whole
//! read-height, seal, validate, push sequence. Readers share the read guard
//! and never observe a chain mid-append.

use serde_json::Value;
use starledger_core::{
    Block, BlockHash, ChainFinding, Ed25519Verifier, OwnedRecord, SignatureVerifier,
};
use tokio::sync::RwLock;

use crate::chain::Chain;
use crate::challenge::Challenge;
use crate::config::LedgerConfig;
use crate::error::{CorruptedRecord, LedgerError, Result};

/// Result of scanning the chain for one owner's records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerScan {
    /// Matching records, in height order.
    pub records: Vec<OwnedRecord>,
    /// Non-genesis blocks that could not be read as owned records.
    pub corrupted: Vec<CorruptedRecord>,
}

/// The main Ledger struct.
///
/// Provides:
/// - Challenge-gated appends of owned records
/// - Lookups by hash, height, and owner
/// - Full-chain integrity scans
pub struct Ledger<V: SignatureVerifier = Ed25519Verifier> {
    chain: RwLock<Chain>,
    config: LedgerConfig,
    verifier: V,
}

impl Ledger<Ed25519Verifier> {
    /// Create a ledger that checks challenge signatures with Ed25519.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        Self::with_verifier(config, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> Ledger<V> {
    /// Create an empty ledger and append its genesis block.
    pub fn with_verifier(config: LedgerConfig, verifier: V) -> Result<Self> {
        Self::from_blocks(Vec::new(), config, verifier)
    }

    /// Rebuild a ledger from an exported block sequence.
    ///
    /// The blocks are loaded as-is. An inconsistent sequence is kept so that
    /// [`Ledger::validate_chain`] can report on it, but appends to it will be
    /// refused. An empty sequence gets a fresh genesis block.
    pub fn from_blocks(blocks: Vec<Block>, config: LedgerConfig, verifier: V) -> Result<Self> {
        let mut chain = Chain::from_blocks(blocks);
        chain.initialize(&config.genesis_marker, now_secs())?;

        Ok(Self {
            chain: RwLock::new(chain),
            config,
            verifier,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Height of the newest block. A fresh ledger is at height 0.
    pub async fn current_height(&self) -> u64 {
        self.chain.read().await.height().unwrap_or(0)
    }

    /// Append a block at the tip.
    ///
    /// The block's position fields are overwritten and it is sealed. Returns
    /// the block as stored, or `ChainInvalid` if the chain would not validate
    /// with it; in that case nothing is written.
    pub async fn append(&self, block: Block) -> Result<Block> {
        let mut chain = self.chain.write().await;
        chain.append(block, now_secs())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ownership Challenge
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a challenge that `identity` must sign to write a record.
    pub fn request_ownership_challenge(&self, identity: &str) -> String {
        let challenge = Challenge::new(identity, now_secs(), self.config.registry_tag.as_str());
        tracing::debug!("Issued challenge for {}", identity);
        challenge.to_string()
    }

    /// Append a record owned by `identity`, gated on a fresh signed challenge.
    pub async fn submit_record(
        &self,
        identity: &str,
        challenge: &str,
        signature: &str,
        content: Value,
    ) -> Result<Block> {
        let parsed = Challenge::parse(challenge)?;

        if parsed.tag != self.config.registry_tag {
            return Err(LedgerError::MalformedChallenge(format!(
                "unexpected tag {:?}",
                parsed.tag
            )));
        }
        if parsed.identity != identity {
            return Err(LedgerError::MalformedChallenge(format!(
                "challenge was issued to {:?}, not {:?}",
                parsed.identity, identity
            )));
        }

        let window = self.config.challenge_window.as_secs();
        let elapsed = parsed.elapsed(now_secs());
        if elapsed > window {
            tracing::warn!("Expired challenge from {}: {}s old", identity, elapsed);
            return Err(LedgerError::ChallengeExpired {
                issued_at: parsed.issued_at,
                elapsed,
                window,
            });
        }

        if !self
            .verifier
            .verify(challenge.as_bytes(), identity, signature)
        {
            tracing::warn!("Rejected signature from {}", identity);
            return Err(LedgerError::InvalidSignature(identity.to_string()));
        }

        let record = OwnedRecord::new(identity, content);
        self.append(Block::from_record(&record)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a block by hash.
    ///
    /// Hashes are assumed unique; if two blocks ever share one, the lower
    /// block is returned.
    pub async fn lookup_by_hash(&self, hash: &BlockHash) -> Result<Block> {
        self.chain
            .read()
            .await
            .by_hash(hash)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("block with hash {}", hash.to_hex())))
    }

    /// Get a block by hex hash. Unparsable input is simply not found.
    pub async fn lookup_by_hash_hex(&self, hash: &str) -> Result<Block> {
        match BlockHash::from_hex(hash) {
            Ok(hash) => self.lookup_by_hash(&hash).await,
            Err(_) => Err(LedgerError::NotFound(format!("block with hash {hash}"))),
        }
    }

    /// Get the block at `height`.
    pub async fn lookup_by_height(&self, height: u64) -> Result<Block> {
        self.chain
            .read()
            .await
            .by_height(height)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("block at height {height}")))
    }

    /// Decode the payload of the block at `height`.
    ///
    /// `Ok(None)` for the genesis block.
    pub async fn payload_at(&self, height: u64) -> Result<Option<Value>> {
        let block = self.lookup_by_height(height).await?;
        Ok(block.decode_payload()?)
    }

    /// All records owned by `identity`, plus any corrupted records seen.
    pub async fn records_by_owner(&self, identity: &str) -> OwnerScan {
        self.chain.read().await.records_by_owner(identity)
    }

    /// Scan the whole chain for linkage and tamper problems.
    pub async fn validate_chain(&self) -> Vec<ChainFinding> {
        self.chain.read().await.validate()
    }

    /// Export the chain, in height order.
    pub async fn blocks(&self) -> Vec<Block> {
        self.chain.read().await.blocks().to_vec()
    }

    #[cfg(test)]
    pub(crate) async fn with_blocks_mut<R>(&self, f: impl FnOnce(&mut Vec<Block>) -> R) -> R {
        f(self.chain.write().await.blocks_mut())
    }
}

/// Get current time in Unix seconds.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use starledger_core::{encode_payload, Keypair};
    use std::sync::Arc;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn star(ra: &str) -> Value {
        json!({"star": {"ra": ra, "dec": "68° 52' 56.9", "story": "Found star using https://www.google.com/sky/"}})
    }

    async fn submit(ledger: &Ledger, keypair: &Keypair, content: Value) -> Result<Block> {
        let identity = keypair.identity();
        let challenge = ledger.request_ownership_challenge(&identity);
        let signature = keypair.sign_challenge(&challenge);
        ledger.submit_record(&identity, &challenge, &signature, content).await
    }

    #[tokio::test]
    async fn test_fresh_ledger_has_genesis() {
        init_tracing();
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        assert_eq!(ledger.current_height().await, 0);

        let genesis = ledger.lookup_by_height(0).await.unwrap();
        assert_eq!(genesis.previous_hash, None);
        assert!(genesis.validate());
        assert_eq!(ledger.payload_at(0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_challenge_format() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let challenge = ledger.request_ownership_challenge("addr1");
        let parts: Vec<&str> = challenge.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "addr1");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2], "starRegistry");
    }

    #[tokio::test]
    async fn test_submit_record_appends() {
        init_tracing();
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let keypair = Keypair::from_seed(&[0x11; 32]);

        let block = submit(&ledger, &keypair, star("16h 29m 1.0s")).await.unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(ledger.current_height().await, 1);

        let payload = ledger.payload_at(1).await.unwrap().unwrap();
        assert_eq!(payload["owner"], keypair.identity());
        assert_eq!(payload["content"], star("16h 29m 1.0s"));

        let by_hash = ledger.lookup_by_hash(&block.hash.unwrap()).await.unwrap();
        assert_eq!(by_hash, block);
    }

    #[tokio::test]
    async fn test_expired_challenge_rejected() {
        init_tracing();
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let keypair = Keypair::from_seed(&[0x22; 32]);
        let identity = keypair.identity();

        let stale = Challenge::new(identity.as_str(), now_secs() - 301, "starRegistry").to_string();
        let signature = keypair.sign_challenge(&stale);

        let err = ledger
            .submit_record(&identity, &stale, &signature, star("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ChallengeExpired { .. }));
        assert_eq!(ledger.current_height().await, 0);
    }

    #[tokio::test]
    async fn test_custom_window() {
        let config = LedgerConfig {
            challenge_window: std::time::Duration::from_secs(10),
            ..LedgerConfig::default()
        };
        let ledger = Ledger::new(config).unwrap();
        let keypair = Keypair::from_seed(&[0x23; 32]);
        let identity = keypair.identity();

        let old = Challenge::new(identity.as_str(), now_secs() - 60, "starRegistry").to_string();
        let signature = keypair.sign_challenge(&old);
        assert!(matches!(
            ledger.submit_record(&identity, &old, &signature, star("1")).await,
            Err(LedgerError::ChallengeExpired { window: 10, .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_signer_rejected() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let owner = Keypair::from_seed(&[0x33; 32]);
        let impostor = Keypair::from_seed(&[0x44; 32]);

        let challenge = ledger.request_ownership_challenge(&owner.identity());
        let signature = impostor.sign_challenge(&challenge);

        let err = ledger
            .submit_record(&owner.identity(), &challenge, &signature, star("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSignature(_)));
        assert_eq!(ledger.current_height().await, 0);
    }

    #[tokio::test]
    async fn test_challenge_for_other_identity_rejected() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let keypair = Keypair::from_seed(&[0x55; 32]);

        let challenge = ledger.request_ownership_challenge("someone-else");
        let signature = keypair.sign_challenge(&challenge);

        let err = ledger
            .submit_record(&keypair.identity(), &challenge, &signature, star("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::MalformedChallenge(_)));
    }

    #[tokio::test]
    async fn test_wrong_tag_rejected() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let keypair = Keypair::from_seed(&[0x56; 32]);
        let identity = keypair.identity();

        let challenge = Challenge::new(identity.as_str(), now_secs(), "otherRegistry").to_string();
        let signature = keypair.sign_challenge(&challenge);
        assert!(matches!(
            ledger.submit_record(&identity, &challenge, &signature, star("1")).await,
            Err(LedgerError::MalformedChallenge(_))
        ));
    }

    #[tokio::test]
    async fn test_tampered_body_detected_and_blocks_appends() {
        init_tracing();
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let keypair = Keypair::from_seed(&[0x66; 32]);
        for i in 0..3 {
            submit(&ledger, &keypair, star(&i.to_string())).await.unwrap();
        }

        ledger
            .with_blocks_mut(|blocks| {
                blocks[2].body = encode_payload(&json!({"owner": "thief", "content": {}}));
            })
            .await;

        let findings = ledger.validate_chain().await;
        assert_eq!(findings, vec![ChainFinding::Tampered { height: 2 }]);

        let err = submit(&ledger, &keypair, star("x")).await.unwrap_err();
        assert!(matches!(err, LedgerError::ChainInvalid { .. }));
        assert_eq!(ledger.current_height().await, 3);
    }

    #[tokio::test]
    async fn test_lookup_misses() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        assert!(matches!(
            ledger.lookup_by_height(1).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            ledger.lookup_by_hash(&BlockHash::from_bytes([9; 32])).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            ledger.lookup_by_hash_hex("nonsense").await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_by_hash_hex() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        let genesis = ledger.lookup_by_height(0).await.unwrap();
        let hex = genesis.hash.unwrap().to_hex();
        assert_eq!(ledger.lookup_by_hash_hex(&hex).await.unwrap(), genesis);
    }

    #[tokio::test]
    async fn test_payload_at_surfaces_decode_error() {
        let ledger = Ledger::new(LedgerConfig::default()).unwrap();
        ledger.append(Block::new(&star("1"))).await.unwrap();
        ledger
            .with_blocks_mut(|blocks| blocks[1].body = "not hex".to_string())
            .await;

        assert!(matches!(
            ledger.payload_at(1).await,
            Err(LedgerError::Core(starledger_core::CoreError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_submits_serialize() {
        init_tracing();
        let ledger = Arc::new(Ledger::new(LedgerConfig::default()).unwrap());

        let mut handles = Vec::new();
        for seed in 0..16u8 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                let keypair = Keypair::from_seed(&[seed; 32]);
                submit(&ledger, &keypair, star(&seed.to_string())).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(ledger.current_height().await, 16);
        assert!(ledger.validate_chain().await.is_empty());

        let heights: Vec<u64> = ledger.blocks().await.iter().map(|b| b.height).collect();
        assert_eq!(heights, (0..=16).collect::<Vec<_>>());
    }
}
