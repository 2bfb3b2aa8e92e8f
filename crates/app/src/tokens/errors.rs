//! Token issuance errors.

use thiserror::Error;

use crate::{cluster::ClusterError, tiers::TierError};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to determine tier for user {username}")]
    Tier {
        username: String,
        #[source]
        source: TierError,
    },

    #[error("invalid username {0:?}")]
    InvalidUsername(String),

    #[error("invalid token expiration: {0}")]
    InvalidTtl(String),

    #[error("failed to ensure tier namespace {namespace}")]
    Namespace {
        namespace: String,
        #[source]
        source: ClusterError,
    },

    #[error("failed to ensure service account {name} in namespace {namespace}")]
    ServiceAccount {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },

    #[error("failed to create token for service account {name} in namespace {namespace}")]
    Issuance {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },

    #[error("failed to revoke tokens for service account {name} in namespace {namespace}")]
    Revocation {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },

    #[error("issued token is malformed: {0}")]
    MalformedToken(String),
}

impl TokenError {
    /// The tier resolution failure behind this error, if any.
    #[must_use]
    pub const fn tier_error(&self) -> Option<&TierError> {
        match self {
            Self::Tier { source, .. } => Some(source),
            _ => None,
        }
    }
}
