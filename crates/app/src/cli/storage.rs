use std::{path::PathBuf, time::Duration};

use clap::Args;
use maas_app::{
    api_keys::SqlMetadataStore,
    database::{PoolSettings, StorageConfig},
};

/// Metadata store selection, shared with the API server's variables.
#[derive(Debug, Args)]
pub(crate) struct StorageArgs {
    /// Storage mode: in-memory, disk or external
    #[arg(long, env = "STORAGE_MODE", default_value = "disk")]
    storage_mode: String,

    /// SQLite database file for disk mode
    #[arg(long, env = "DATA_PATH", default_value = "/data/maas-api.db")]
    data_path: PathBuf,

    /// PostgreSQL connection string for external mode
    #[arg(long, env = "DB_CONNECTION_URL", hide_env_values = true)]
    database_url: Option<String>,
}

impl StorageArgs {
    pub(crate) async fn open(&self) -> Result<SqlMetadataStore, String> {
        let storage = StorageConfig::from_mode(
            &self.storage_mode,
            &self.data_path,
            self.database_url.as_deref(),
            PoolSettings {
                max_open_connections: 1,
                max_idle_connections: 1,
                connection_max_lifetime: Duration::from_secs(60),
            },
        )
        .map_err(|error| error.to_string())?;

        let database = storage
            .connect()
            .await
            .map_err(|error| format!("failed to open metadata database: {error}"))?;

        SqlMetadataStore::new(database)
            .await
            .map_err(|error| format!("failed to prepare metadata store: {error}"))
    }
}
