//! API key response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use maas_app::api_keys::{ApiKeyMetadata, IssuedApiKey};

/// A newly issued API key. The token is shown once.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiKeyResponse {
    pub token: String,

    /// Lifetime, e.g. `"720h0m0s"`
    pub expiration: String,

    /// Expiry, unix seconds
    pub expires_at: i64,

    /// Key identifier
    pub jti: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<IssuedApiKey> for ApiKeyResponse {
    fn from(issued: IssuedApiKey) -> Self {
        let credential = crate::tokens::requests::TokenResponse::from(&issued.credential);

        Self {
            token: credential.token,
            expiration: credential.expiration,
            expires_at: credential.expires_at,
            jti: credential.jti,
            name: issued.name,
            description: issued.description,
        }
    }
}

/// Recorded metadata for an API key.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiKeyMetadataResponse {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// RFC 3339
    pub creation_date: String,

    /// RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// `"active"` or `"expired"`
    pub status: String,
}

impl From<ApiKeyMetadata> for ApiKeyMetadataResponse {
    fn from(metadata: ApiKeyMetadata) -> Self {
        let status = metadata.status().to_string();

        Self {
            id: metadata.id,
            name: metadata.name,
            description: metadata.description,
            creation_date: metadata.creation_date.to_string(),
            expiration_date: metadata.expiration_date.as_ref().map(ToString::to_string),
            status,
        }
    }
}
