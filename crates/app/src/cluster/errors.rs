//! Cluster access errors.

use thiserror::Error;

/// Errors returned by [`ClusterClient`](super::ClusterClient) implementations.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The requested object does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// An object with the same name already exists.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Reading local client credentials failed.
    #[error("failed to read cluster credentials from {path}")]
    Credentials {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An HTTP transport or serialization error occurred.
    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    /// The API server returned a non-success status.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClusterError {
    /// Whether the error means the object is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error means a create raced an existing object.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}
