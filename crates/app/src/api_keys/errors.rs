//! API key errors.

use sqlx::Error;
use thiserror::Error;

use crate::tokens::TokenError;

#[derive(Debug, Error)]
pub enum MetadataStoreError {
    #[error("api key not found")]
    NotFound,

    #[error("invalid api key metadata: {0}")]
    Invalid(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for MetadataStoreError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

#[derive(Debug, Error)]
pub enum ApiKeysServiceError {
    #[error("api key not found")]
    NotFound,

    #[error("api key name is required")]
    MissingName,

    #[error("token error")]
    Token(#[source] TokenError),

    #[error("token issued but its metadata could not be recorded")]
    Persist(#[source] MetadataStoreError),

    #[error("storage error")]
    Store(#[source] MetadataStoreError),

    #[error(
        "credentials in namespace {namespace} were revoked but marking their metadata as expired failed; the metadata is stale"
    )]
    MetadataStale {
        namespace: String,
        #[source]
        source: MetadataStoreError,
    },
}

impl From<TokenError> for ApiKeysServiceError {
    fn from(error: TokenError) -> Self {
        Self::Token(error)
    }
}

impl From<MetadataStoreError> for ApiKeysServiceError {
    fn from(error: MetadataStoreError) -> Self {
        match error {
            MetadataStoreError::NotFound => Self::NotFound,
            error => Self::Store(error),
        }
    }
}
