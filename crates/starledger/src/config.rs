//! Ledger configuration.

use std::time::Duration;

use serde_json::Value;

/// Default lifetime of an ownership challenge.
pub const DEFAULT_CHALLENGE_WINDOW: Duration = Duration::from_secs(300);

/// Default third field of every challenge string.
pub const DEFAULT_REGISTRY_TAG: &str = "starRegistry";

/// Default payload of the genesis block.
pub const DEFAULT_GENESIS_MARKER: &str = "Genesis Block";

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// How long a challenge stays valid after it is issued.
    pub challenge_window: Duration,
    /// Tag appended to every challenge; submissions must carry it back.
    pub registry_tag: String,
    /// Payload stored in the genesis block.
    pub genesis_marker: Value,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            challenge_window: DEFAULT_CHALLENGE_WINDOW,
            registry_tag: DEFAULT_REGISTRY_TAG.to_string(),
            genesis_marker: Value::String(DEFAULT_GENESIS_MARKER.to_string()),
        }
    }
}
