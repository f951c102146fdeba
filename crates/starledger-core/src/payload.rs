//! Payload codec and record typing.
//!
//! A block body is the compact JSON text of its payload, hex-encoded so the
//! body is plain ASCII. Decoding reverses both steps exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Encode a structured payload into an opaque block body.
pub fn encode_payload(payload: &Value) -> String {
    hex::encode(payload.to_string())
}

/// Decode an opaque block body back into the structured payload.
pub fn decode_payload(body: &str) -> Result<Value, CoreError> {
    let bytes = hex::decode(body).map_err(|e| CoreError::Decode(format!("body is not hex: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| CoreError::Decode(format!("body is not JSON: {e}")))
}

/// The payload of a block written through the ownership workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnedRecord {
    /// Identity that proved control of its key when the record was written.
    pub owner: String,
    /// The caller-supplied content (a star, for the registry use case).
    pub content: Value,
}

impl OwnedRecord {
    pub fn new(owner: impl Into<String>, content: Value) -> Self {
        Self {
            owner: owner.into(),
            content,
        }
    }

    /// The structured form stored in a block body.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "owner": self.owner,
            "content": self.content,
        })
    }

    /// Interpret a decoded payload as an owned record.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::Decode(format!("not an owned record: {e}")))
    }
}

/// What a block carries, as far as the ledger is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPayload {
    /// The sentinel held by the block at height 0.
    GenesisMarker(Value),
    /// A record written on behalf of an owner.
    Owned(OwnedRecord),
    /// A non-genesis body that does not decode to an owned record.
    Corrupted(String),
}

impl BlockPayload {
    /// The owned record, if this payload is one.
    pub fn as_owned(&self) -> Option<&OwnedRecord> {
        match self {
            BlockPayload::Owned(record) => Some(record),
            _ => None,
        }
    }
}
