//! API key models.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::tokens::Credential;

/// Whether a key can still be used, as of some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyStatus {
    Active,
    Expired,
}

impl ApiKeyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ApiKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored metadata for an issued key. The key itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyMetadata {
    pub id: String,
    pub username: String,
    pub name: String,
    pub description: Option<String>,
    pub namespace: String,
    pub creation_date: Timestamp,

    /// `None` when the stored value could not be parsed; such keys are
    /// reported as expired.
    pub expiration_date: Option<Timestamp>,
}

impl ApiKeyMetadata {
    /// Status as of `now`. Derived, never stored.
    #[must_use]
    pub fn status_at(&self, now: Timestamp) -> ApiKeyStatus {
        match self.expiration_date {
            Some(expiration) if expiration > now => ApiKeyStatus::Active,
            _ => ApiKeyStatus::Expired,
        }
    }

    /// Status as of the current instant.
    #[must_use]
    pub fn status(&self) -> ApiKeyStatus {
        self.status_at(Timestamp::now())
    }
}

/// Metadata to record for a freshly issued key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApiKey {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub issued_at: Option<Timestamp>,
    pub expires_at: Timestamp,
}

/// Parameters for issuing a named key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateApiKey {
    pub name: String,
    pub description: Option<String>,
    pub ttl: SignedDuration,
}

/// A named key as returned to its owner, exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedApiKey {
    pub credential: Credential,
    pub name: String,
    pub description: Option<String>,
}
