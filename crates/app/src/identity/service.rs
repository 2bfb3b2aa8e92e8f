//! Token review backed identity service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    cluster::{ClusterClient, TokenReview},
    identity::{IdentityError, UserContext},
};

/// Resolves callers through the cluster's `TokenReview` API.
///
/// When an audience is configured, the token is first reviewed against it
/// (tokens minted by this service carry it), then against the API server's
/// default audience (user and OIDC tokens).
#[derive(Clone)]
pub struct TokenReviewer {
    cluster: Arc<dyn ClusterClient>,
    audience: Option<String>,
}

impl std::fmt::Debug for TokenReviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenReviewer")
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenReviewer {
    #[must_use]
    pub fn new(cluster: Arc<dyn ClusterClient>, audience: Option<String>) -> Self {
        Self {
            cluster,
            audience: audience.filter(|audience| !audience.is_empty()),
        }
    }

    async fn review(
        &self,
        bearer_token: &str,
        audiences: Vec<String>,
    ) -> Result<Option<UserContext>, IdentityError> {
        let review = self
            .cluster
            .review_token(&TokenReview::new(bearer_token, audiences))
            .await?;

        let Some(status) = review.status.filter(|status| status.authenticated) else {
            return Ok(None);
        };

        if status.user.username.is_empty() {
            return Ok(None);
        }

        Ok(Some(UserContext {
            username: status.user.username,
            uid: status.user.uid,
            groups: status.user.groups,
        }))
    }
}

#[async_trait]
impl IdentityService for TokenReviewer {
    async fn authenticate(&self, bearer_token: &str) -> Result<UserContext, IdentityError> {
        if bearer_token.is_empty() {
            return Err(IdentityError::MissingToken);
        }

        if let Some(audience) = &self.audience {
            if let Some(user) = self.review(bearer_token, vec![audience.clone()]).await? {
                return Ok(user);
            }

            debug!(audience, "token not valid for service audience, retrying with default");
        }

        self.review(bearer_token, Vec::new())
            .await?
            .ok_or(IdentityError::Unauthenticated)
    }
}

#[automock]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolve the caller behind `bearer_token`.
    async fn authenticate(&self, bearer_token: &str) -> Result<UserContext, IdentityError>;
}
