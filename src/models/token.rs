use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// OAuth token as persisted in the `tokens` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Tokens are treated as expired ten seconds early. A missing or
    /// zero-valued expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) if expiry.year() > 1 => expiry - Duration::seconds(10) <= now,
            _ => false,
        }
    }
}
