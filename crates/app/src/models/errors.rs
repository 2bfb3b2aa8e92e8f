//! Discovery errors.

use thiserror::Error;

use crate::cluster::ClusterError;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to list inference services")]
    List(#[source] ClusterError),
}

impl From<ClusterError> for DiscoveryError {
    fn from(error: ClusterError) -> Self {
        Self::List(error)
    }
}
