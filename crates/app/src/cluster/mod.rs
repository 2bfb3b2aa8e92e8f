//! Kubernetes API access.
//!
//! Everything the service needs from the cluster goes through
//! [`ClusterClient`], so the domain services can be exercised against
//! [`MockClusterClient`] without a live API server.

mod errors;
mod kube;
mod resources;

use async_trait::async_trait;
use mockall::automock;

pub use errors::*;
pub use kube::*;
pub use resources::*;

/// The subset of the Kubernetes API used by the domain services.
#[automock]
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Fetch a `ConfigMap`.
    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap, ClusterError>;

    /// Fetch a cluster-scoped namespace object.
    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError>;

    /// Create a namespace.
    async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace, ClusterError>;

    /// Fetch a service account.
    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClusterError>;

    /// Create a service account in the namespace named in its metadata.
    async fn create_service_account(
        &self,
        account: &ServiceAccount,
    ) -> Result<ServiceAccount, ClusterError>;

    /// Delete a service account, invalidating every token bound to it.
    async fn delete_service_account(&self, namespace: &str, name: &str)
    -> Result<(), ClusterError>;

    /// Mint a token for a service account through the `TokenRequest` subresource.
    async fn create_token(
        &self,
        namespace: &str,
        service_account: &str,
        request: &TokenRequest,
    ) -> Result<TokenRequest, ClusterError>;

    /// Submit a `TokenReview`.
    async fn review_token(&self, review: &TokenReview) -> Result<TokenReview, ClusterError>;

    /// List `LLMInferenceService` objects across all namespaces.
    async fn list_inference_services(&self) -> Result<Vec<LlmInferenceService>, ClusterError>;

    /// Fetch an `HTTPRoute`.
    async fn get_http_route(&self, namespace: &str, name: &str) -> Result<HttpRoute, ClusterError>;

    /// List `HTTPRoute` objects in a namespace matching a label selector.
    async fn list_http_routes(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<HttpRoute>, ClusterError>;
}
