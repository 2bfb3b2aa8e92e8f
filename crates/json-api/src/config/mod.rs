//! Server configuration module

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use maas_app::{
    context::AppConfig,
    database::StorageConfigError,
    models::GatewayRef,
};

use crate::config::{
    cluster::ClusterConfig,
    instance::InstanceConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    storage::StorageSettings,
};

pub(crate) mod cluster;
pub(crate) mod instance;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod storage;

/// Errors turning settings into an application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no Kubernetes API server configured; set KUBERNETES_API_URL or run in-cluster")]
    MissingApiServer,

    #[error("failed to read CA bundle {path}")]
    CaBundle {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageConfigError),
}

/// MaaS JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "maas-json", about = "MaaS JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Trace export settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Instance identity and tier configuration settings.
    #[command(flatten)]
    pub instance: InstanceConfig,

    /// Kubernetes API access settings.
    #[command(flatten)]
    pub cluster: ClusterConfig,

    /// API key metadata storage settings.
    #[command(flatten)]
    pub storage: StorageSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Resolve the settings into the application's configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when no API server can be located, the CA bundle is
    /// unreadable, or the storage settings are inconsistent.
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        Ok(AppConfig {
            tenant: self.instance.tenant().to_owned(),
            namespace: self.instance.namespace.clone(),
            gateway: GatewayRef::new(
                &self.instance.gateway_name,
                &self.instance.gateway_namespace,
            ),
            tier_refresh: Duration::from_secs(self.instance.tier_config_refresh_seconds.max(1)),
            kube: self.cluster.kube_config()?,
            storage: self.storage.storage_config()?,
        })
    }
}
