use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted Yeastar API credential. One record is live per process.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub access_token_expire_time: DateTime<Utc>,
    pub refresh_token: String,
    pub token_url: String,
    pub cdr_url: String,
}

impl CredentialRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.access_token_expire_time
    }

    /// Builds the record that replaces this one after a successful refresh.
    ///
    /// The expiry is anchored to `now`, the same instant used for the expiry
    /// check. A grant without a refresh token keeps the current one.
    pub fn refreshed(
        &self,
        grant: TokenGrant,
        now: DateTime<Utc>,
    ) -> Result<Self, LifetimeOutOfRange> {
        let access_token_expire_time = chrono::Duration::from_std(grant.expires_in)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(LifetimeOutOfRange(grant.expires_in))?;
        Ok(Self {
            access_token: grant.access_token,
            access_token_expire_time,
            refresh_token: grant
                .refresh_token
                .filter(|token| !token.is_empty())
                .unwrap_or_else(|| self.refresh_token.clone()),
            token_url: self.token_url.clone(),
            cdr_url: self.cdr_url.clone(),
        })
    }
}

/// Token lifetime whose expiry instant cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("token lifetime of {}s is out of range", .0.as_secs())]
pub struct LifetimeOutOfRange(pub Duration);

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("access_token", &"[REDACTED]")
            .field("access_token_expire_time", &self.access_token_expire_time)
            .field("refresh_token", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("cdr_url", &self.cdr_url)
            .finish()
    }
}

/// Successful answer of the token-issuing endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: Duration,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Access token and the CDR endpoint it authorizes.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidToken {
    pub access_token: String,
    pub cdr_url: String,
}

impl From<&CredentialRecord> for ValidToken {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            access_token: record.access_token.clone(),
            cdr_url: record.cdr_url.clone(),
        }
    }
}

impl fmt::Debug for ValidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidToken")
            .field("access_token", &"[REDACTED]")
            .field("cdr_url", &self.cdr_url)
            .finish()
    }
}
