//! Issued credential models.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use zeroize::Zeroize;

/// A bearer token, redacted in debug output and zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A freshly minted credential.
///
/// The token itself is never persisted; callers must hand it to the user
/// now or lose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: BearerToken,
    pub jti: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub ttl: SignedDuration,
    pub namespace: String,
    pub service_account: String,
}
