//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::{
    api_keys::{ApiKeysService, MetadataStoreError, SqlMetadataStore, TokenApiKeysService},
    cluster::{ClusterClient, ClusterError, KubeClient, KubeConfig},
    database::{Database, StorageConfig},
    identity::{IdentityService, TokenReviewer},
    models::{GatewayRef, ModelsManager, ModelsService},
    tiers::{TIER_MAPPING_CONFIG_MAP, TierConfigCache, TierConfigSource, TierMapper, TierResolver},
    tokens::{ClusterTokenManager, TokenManager, token_audience},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build cluster client")]
    Cluster(#[source] ClusterError),

    #[error("failed to load tier configuration")]
    TierConfiguration(#[source] ClusterError),

    #[error("failed to open metadata database")]
    Database(#[source] sqlx::Error),

    #[error("failed to prepare metadata store")]
    MetadataStore(#[source] MetadataStoreError),
}

/// Everything needed to assemble an [`AppContext`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Instance name; prefixes tier namespaces and the token audience.
    pub tenant: String,

    /// Namespace holding the tier `ConfigMap`.
    pub namespace: String,

    pub gateway: GatewayRef,

    /// Upper bound on tier configuration staleness.
    pub tier_refresh: Duration,

    pub kube: KubeConfig,

    pub storage: StorageConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<dyn IdentityService>,
    pub tiers: Arc<dyn TierResolver>,
    pub tokens: Arc<dyn TokenManager>,
    pub api_keys: Arc<dyn ApiKeysService>,
    pub models: Arc<dyn ModelsService>,
    database: Option<Database>,
    tier_refresh: Option<Arc<JoinHandle<()>>>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect to the cluster and the metadata store, and start the tier
    /// configuration refresh.
    ///
    /// # Errors
    ///
    /// Returns an error when the cluster client cannot be built, the tier
    /// configuration cannot be read, or the metadata store cannot be opened.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let cluster: Arc<dyn ClusterClient> =
            Arc::new(KubeClient::new(config.kube).map_err(AppInitError::Cluster)?);

        let (cache, refresh) = TierConfigCache::start(
            Arc::clone(&cluster),
            TierConfigSource::new(&config.namespace, &config.tenant),
            config.tier_refresh,
        )
        .await
        .map_err(AppInitError::TierConfiguration)?;

        let database = config
            .storage
            .connect()
            .await
            .map_err(AppInitError::Database)?;

        let store = SqlMetadataStore::new(database.clone())
            .await
            .map_err(AppInitError::MetadataStore)?;

        let tiers: Arc<dyn TierResolver> = Arc::new(TierMapper::new(
            &config.tenant,
            TIER_MAPPING_CONFIG_MAP,
            cache,
        ));

        let tokens: Arc<dyn TokenManager> = Arc::new(ClusterTokenManager::new(
            &config.tenant,
            Arc::clone(&tiers),
            Arc::clone(&cluster),
        ));

        info!(
            tenant = %config.tenant,
            gateway = %config.gateway.name,
            gateway_namespace = %config.gateway.namespace,
            "application context ready"
        );

        Ok(Self {
            identity: Arc::new(TokenReviewer::new(
                Arc::clone(&cluster),
                Some(token_audience(&config.tenant)),
            )),
            api_keys: Arc::new(TokenApiKeysService::new(
                Arc::clone(&tokens),
                Arc::new(store),
            )),
            models: Arc::new(ModelsManager::new(cluster, config.gateway)),
            tiers,
            tokens,
            database: Some(database),
            tier_refresh: Some(Arc::new(refresh)),
        })
    }

    /// Assemble a context from ready-made services.
    #[must_use]
    pub fn from_services(
        identity: Arc<dyn IdentityService>,
        tiers: Arc<dyn TierResolver>,
        tokens: Arc<dyn TokenManager>,
        api_keys: Arc<dyn ApiKeysService>,
        models: Arc<dyn ModelsService>,
    ) -> Self {
        Self {
            identity,
            tiers,
            tokens,
            api_keys,
            models,
            database: None,
            tier_refresh: None,
        }
    }

    /// Stop the tier refresh and release database connections.
    pub async fn shutdown(&self) {
        if let Some(refresh) = &self.tier_refresh {
            refresh.abort();
        }

        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}
