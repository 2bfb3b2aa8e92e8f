//! Tier errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    #[error("no groups provided")]
    NoGroups,

    #[error("group {0} not found in any tier")]
    GroupNotFound(String),

    #[error("tier mapping not found, provide configuration in {0}")]
    MissingConfiguration(String),

    #[error("invalid tier configuration: {0}")]
    InvalidConfiguration(String),

    #[error("tier configuration has not been loaded yet")]
    NotLoaded,
}

impl TierError {
    /// Whether the error is the caller's fault rather than the operator's.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::NoGroups | Self::GroupNotFound(_))
    }
}
