//! Identity errors.

use thiserror::Error;

use crate::cluster::ClusterError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("bearer token is empty")]
    MissingToken,

    #[error("token is not authenticated")]
    Unauthenticated,

    #[error("token review failed")]
    Review(#[source] ClusterError),
}

impl From<ClusterError> for IdentityError {
    fn from(error: ClusterError) -> Self {
        Self::Review(error)
    }
}
