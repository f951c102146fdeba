//! Ownership challenges: `<identity>:<unix seconds>:<registry tag>`.

use std::fmt;

use crate::error::{LedgerError, Result};

/// A parsed ownership challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub identity: String,
    pub issued_at: i64,
    pub tag: String,
}

impl Challenge {
    pub fn new(identity: impl Into<String>, issued_at: i64, tag: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            issued_at,
            tag: tag.into(),
        }
    }

    /// Parse a challenge string.
    ///
    /// Fields are split from the right so the identity may itself contain
    /// colons.
    pub fn parse(s: &str) -> Result<Self> {
        let mut fields = s.rsplitn(3, ':');
        let (Some(tag), Some(issued_at), Some(identity)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(LedgerError::MalformedChallenge(format!(
                "expected <identity>:<timestamp>:<tag>, got {s:?}"
            )));
        };

        let issued_at = issued_at.parse::<i64>().map_err(|e| {
            LedgerError::MalformedChallenge(format!("bad timestamp {issued_at:?}: {e}"))
        })?;

        Ok(Self::new(identity, issued_at, tag))
    }

    /// Seconds between issue time and `now`. Future timestamps count as 0.
    pub fn elapsed(&self, now: i64) -> u64 {
        u64::try_from(now.saturating_sub(self.issued_at)).unwrap_or(0)
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.identity, self.issued_at, self.tag)
    }
}
