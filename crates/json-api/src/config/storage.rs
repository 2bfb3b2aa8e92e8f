//! Storage Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

use maas_app::database::{PoolSettings, StorageConfig, StorageConfigError};

/// API key metadata storage settings.
#[derive(Debug, Args)]
pub struct StorageSettings {
    /// Storage mode: in-memory, disk or external
    #[arg(long, env = "STORAGE_MODE", default_value = "in-memory")]
    pub storage_mode: String,

    /// SQLite database file for disk mode
    #[arg(long, env = "DATA_PATH", default_value = "/data/maas-api.db")]
    pub data_path: PathBuf,

    /// PostgreSQL connection string for external mode
    #[arg(long, env = "DB_CONNECTION_URL", hide_env_values = true)]
    pub db_connection_url: Option<String>,

    /// Maximum open connections to the external database
    #[arg(long, env = "DB_MAX_OPEN_CONNS", default_value_t = 25_u32)]
    pub db_max_open_conns: u32,

    /// Connections kept warm in the external database pool
    #[arg(long, env = "DB_MAX_IDLE_CONNS", default_value_t = 5_u32)]
    pub db_max_idle_conns: u32,

    /// Maximum lifetime of a pooled connection, in seconds
    #[arg(long, env = "DB_CONN_MAX_LIFETIME_SECONDS", default_value_t = 300_u64)]
    pub db_conn_max_lifetime_seconds: u64,
}

impl StorageSettings {
    pub(crate) fn storage_config(&self) -> Result<StorageConfig, StorageConfigError> {
        StorageConfig::from_mode(
            &self.storage_mode,
            &self.data_path,
            self.db_connection_url.as_deref(),
            PoolSettings {
                max_open_connections: self.db_max_open_conns,
                max_idle_connections: self.db_max_idle_conns,
                connection_max_lifetime: Duration::from_secs(self.db_conn_max_lifetime_seconds),
            },
        )
    }
}
