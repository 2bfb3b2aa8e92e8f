//! Token manager.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{debug, info};

use crate::{
    cluster::{ClusterClient, ClusterError, Namespace, ServiceAccount, TokenRequest},
    identity::UserContext,
    tiers::{Tier, TierResolver},
    tokens::{
        BearerToken, Credential, TokenClaims, TokenError, generate_local_jti, namespace_labels,
        service_account_labels, service_account_name, token_audience, validate_ttl,
    },
};

/// Issues credentials as service account tokens in per-tier namespaces.
///
/// Each user maps to one service account in the namespace of the tier their
/// groups resolve to; deleting that account revokes every token bound to it.
#[derive(Clone)]
pub struct ClusterTokenManager {
    tenant: String,
    tiers: Arc<dyn TierResolver>,
    cluster: Arc<dyn ClusterClient>,
}

impl std::fmt::Debug for ClusterTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterTokenManager")
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}

impl ClusterTokenManager {
    #[must_use]
    pub fn new(
        tenant: impl Into<String>,
        tiers: Arc<dyn TierResolver>,
        cluster: Arc<dyn ClusterClient>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            tiers,
            cluster,
        }
    }

    fn resolve_tier(&self, user: &UserContext) -> Result<Tier, TokenError> {
        self.tiers
            .tier_for_groups(&user.groups)
            .map_err(|source| TokenError::Tier {
                username: user.username.clone(),
                source,
            })
    }

    async fn ensure_namespace(&self, tier: &str) -> Result<String, TokenError> {
        let namespace = self.tiers.namespace(tier);
        let wrap = |source| TokenError::Namespace {
            namespace: namespace.clone(),
            source,
        };

        match self.cluster.get_namespace(&namespace).await {
            Ok(_) => return Ok(namespace),
            Err(ClusterError::NotFound(_)) => {}
            Err(error) => return Err(wrap(error)),
        }

        let object = Namespace::new(namespace.clone(), namespace_labels(&self.tenant, tier));

        match self.cluster.create_namespace(&object).await {
            Ok(_) => info!(tier, namespace, "created tier namespace"),
            Err(ClusterError::AlreadyExists(_)) => {}
            Err(error) => return Err(wrap(error)),
        }

        Ok(namespace)
    }

    async fn ensure_service_account(
        &self,
        namespace: &str,
        name: &str,
        tier: &str,
    ) -> Result<(), TokenError> {
        let wrap = |source| TokenError::ServiceAccount {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            source,
        };

        match self.cluster.get_service_account(namespace, name).await {
            Ok(_) => return Ok(()),
            Err(ClusterError::NotFound(_)) => {}
            Err(error) => return Err(wrap(error)),
        }

        let account = ServiceAccount::new(
            namespace,
            name,
            service_account_labels(&self.tenant, tier),
        );

        match self.cluster.create_service_account(&account).await {
            Ok(_) => debug!(tier, namespace, name, "created service account"),
            Err(ClusterError::AlreadyExists(_)) => {}
            Err(error) => return Err(wrap(error)),
        }

        Ok(())
    }
}

#[async_trait]
impl TokenManager for ClusterTokenManager {
    async fn generate_token(
        &self,
        user: &UserContext,
        ttl: SignedDuration,
    ) -> Result<Credential, TokenError> {
        validate_ttl(ttl)?;

        let tier = self.resolve_tier(user)?;
        debug!(tier = %tier.name, "determined user tier");

        let name = service_account_name(&user.username)?;
        let namespace = self.ensure_namespace(&tier.name).await?;
        self.ensure_service_account(&namespace, &name, &tier.name)
            .await?;

        let request = TokenRequest::new(vec![token_audience(&self.tenant)], ttl.as_secs());

        let issued = self
            .cluster
            .create_token(&namespace, &name, &request)
            .await
            .map_err(|source| TokenError::Issuance {
                namespace: namespace.clone(),
                name: name.clone(),
                source,
            })?;

        let status = issued.status.ok_or_else(|| {
            TokenError::MalformedToken("token request returned no status".to_owned())
        })?;

        let claims = TokenClaims::from_jwt(&status.token)?;
        let jti = claims
            .jti()
            .map_or_else(generate_local_jti, ToOwned::to_owned);

        let iat = claims.iat.ok_or_else(|| {
            TokenError::MalformedToken("token is missing required 'iat' claim".to_owned())
        })?;

        let issued_at = Timestamp::from_second(iat)
            .map_err(|error| TokenError::MalformedToken(format!("invalid 'iat' claim: {error}")))?;

        debug!(
            jti,
            expires_at = %status.expiration_timestamp,
            "generated token"
        );

        Ok(Credential {
            token: BearerToken::new(status.token.clone()),
            jti,
            issued_at,
            expires_at: status.expiration_timestamp,
            ttl,
            namespace,
            service_account: name,
        })
    }

    async fn revoke_tokens(&self, user: &UserContext) -> Result<String, TokenError> {
        let tier = self.resolve_tier(user)?;
        let namespace = self.tiers.namespace(&tier.name);
        let name = service_account_name(&user.username)?;

        let wrap = |source| TokenError::Revocation {
            namespace: namespace.clone(),
            name: name.clone(),
            source,
        };

        match self.cluster.get_service_account(&namespace, &name).await {
            Ok(_) => {}
            Err(ClusterError::NotFound(_)) => {
                debug!(namespace, name, "service account not found, nothing to revoke");
                return Ok(namespace);
            }
            Err(error) => return Err(wrap(error)),
        }

        match self.cluster.delete_service_account(&namespace, &name).await {
            Ok(()) | Err(ClusterError::NotFound(_)) => {}
            Err(error) => return Err(wrap(error)),
        }

        self.ensure_service_account(&namespace, &name, &tier.name)
            .await?;

        info!(tier = %tier.name, namespace, "revoked all tokens for user");

        Ok(namespace)
    }

    fn namespace_for_user(&self, user: &UserContext) -> Result<String, TokenError> {
        let tier = self.resolve_tier(user)?;

        Ok(self.tiers.namespace(&tier.name))
    }
}

#[automock]
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Mint a credential for `user` valid for `ttl`, provisioning the tier
    /// namespace and the user's service account on first use.
    async fn generate_token(
        &self,
        user: &UserContext,
        ttl: SignedDuration,
    ) -> Result<Credential, TokenError>;

    /// Invalidate every credential issued to `user`. Returns the tier
    /// namespace the user's credentials live in.
    async fn revoke_tokens(&self, user: &UserContext) -> Result<String, TokenError>;

    /// The tier namespace `user` currently resolves to.
    fn namespace_for_user(&self, user: &UserContext) -> Result<String, TokenError>;
}
