//! Model listing.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    cluster::ClusterClient,
    models::{DiscoveryError, GatewayRef, Model, is_owned},
};

/// Lists inference services owned by this instance's gateway.
#[derive(Clone)]
pub struct ModelsManager {
    cluster: Arc<dyn ClusterClient>,
    gateway: GatewayRef,
}

impl std::fmt::Debug for ModelsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelsManager")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl ModelsManager {
    #[must_use]
    pub fn new(cluster: Arc<dyn ClusterClient>, gateway: GatewayRef) -> Self {
        Self { cluster, gateway }
    }
}

#[async_trait]
impl ModelsService for ModelsManager {
    async fn list_available_models(&self) -> Result<Vec<Model>, DiscoveryError> {
        let services = self.cluster.list_inference_services().await?;
        let total = services.len();

        let mut models = Vec::new();

        for service in &services {
            if is_owned(service, &self.gateway, self.cluster.as_ref()).await {
                models.push(Model::from(service));
            }
        }

        debug!(total, owned = models.len(), "discovered models");

        Ok(models)
    }
}

#[automock]
#[async_trait]
pub trait ModelsService: Send + Sync {
    /// Models served behind this instance's gateway, ready or not.
    async fn list_available_models(&self) -> Result<Vec<Model>, DiscoveryError>;
}
