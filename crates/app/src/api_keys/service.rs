//! API keys service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{error, info};

use crate::{
    api_keys::{
        ApiKeyMetadata, ApiKeysServiceError, CreateApiKey, IssuedApiKey, MetadataStore, NewApiKey,
    },
    identity::UserContext,
    tokens::TokenManager,
};

/// Named credentials: cluster-issued tokens plus stored metadata.
#[derive(Clone)]
pub struct TokenApiKeysService {
    tokens: Arc<dyn TokenManager>,
    store: Arc<dyn MetadataStore>,
}

impl std::fmt::Debug for TokenApiKeysService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenApiKeysService").finish_non_exhaustive()
    }
}

impl TokenApiKeysService {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenManager>, store: Arc<dyn MetadataStore>) -> Self {
        Self { tokens, store }
    }
}

#[async_trait]
impl ApiKeysService for TokenApiKeysService {
    async fn create_api_key(
        &self,
        user: &UserContext,
        request: CreateApiKey,
    ) -> Result<IssuedApiKey, ApiKeysServiceError> {
        if request.name.trim().is_empty() {
            return Err(ApiKeysServiceError::MissingName);
        }

        let credential = self.tokens.generate_token(user, request.ttl).await?;

        let key = NewApiKey {
            id: credential.jti.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            issued_at: Some(credential.issued_at),
            expires_at: credential.expires_at,
        };

        self.store
            .add(&credential.namespace, &user.username, &key)
            .await
            .map_err(ApiKeysServiceError::Persist)?;

        info!(jti = %credential.jti, namespace = %credential.namespace, "issued api key");

        Ok(IssuedApiKey {
            credential,
            name: request.name,
            description: request.description,
        })
    }

    async fn list_api_keys(
        &self,
        user: &UserContext,
    ) -> Result<Vec<ApiKeyMetadata>, ApiKeysServiceError> {
        let namespace = self.tokens.namespace_for_user(user)?;

        Ok(self.store.list(&namespace, &user.username).await?)
    }

    async fn get_api_key(
        &self,
        user: &UserContext,
        id: &str,
    ) -> Result<ApiKeyMetadata, ApiKeysServiceError> {
        let namespace = self.tokens.namespace_for_user(user)?;

        Ok(self.store.get(&namespace, &user.username, id).await?)
    }

    async fn revoke_all(&self, user: &UserContext) -> Result<(), ApiKeysServiceError> {
        let namespace = self.tokens.revoke_tokens(user).await?;

        match self.store.invalidate_all(&namespace, &user.username).await {
            Ok(expired) => {
                info!(namespace, expired, "revoked all api keys");
                Ok(())
            }
            Err(source) => {
                error!(
                    namespace,
                    error = %source,
                    "credentials revoked but api key metadata is stale"
                );

                Err(ApiKeysServiceError::MetadataStale { namespace, source })
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait ApiKeysService: Send + Sync {
    /// Issue a named credential and record its metadata.
    async fn create_api_key(
        &self,
        user: &UserContext,
        request: CreateApiKey,
    ) -> Result<IssuedApiKey, ApiKeysServiceError>;

    /// The caller's keys in their current tier, newest first.
    async fn list_api_keys(
        &self,
        user: &UserContext,
    ) -> Result<Vec<ApiKeyMetadata>, ApiKeysServiceError>;

    /// One of the caller's keys.
    async fn get_api_key(
        &self,
        user: &UserContext,
        id: &str,
    ) -> Result<ApiKeyMetadata, ApiKeysServiceError>;

    /// Revoke every credential the caller holds, then expire their metadata.
    async fn revoke_all(&self, user: &UserContext) -> Result<(), ApiKeysServiceError>;
}
