//! Database connection management.
//!
//! Metadata lives either in an embedded `SQLite` database or in an external
//! `PostgreSQL` server. Both are reached through sqlx's runtime-generic
//! driver so the store carries a single code path; [`placeholder`] papers
//! over the one syntactic difference the queries hit.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use sqlx::{
    AnyPool,
    any::{AnyPoolOptions, install_default_drivers},
};
use thiserror::Error;
use tracing::info;

/// Milliseconds an embedded writer waits on a locked database.
const SQLITE_BUSY_TIMEOUT_MS: u32 = 5_000;

/// Which engine a [`Database`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

/// Bind parameter marker for the 1-based `index`.
#[must_use]
pub fn placeholder(backend: DatabaseBackend, index: usize) -> String {
    match backend {
        DatabaseBackend::Sqlite => "?".to_owned(),
        DatabaseBackend::Postgres => format!("${index}"),
    }
}

/// Connection pool limits for the external database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_open_connections: u32,
    pub max_idle_connections: u32,
    pub connection_max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_open_connections: 25,
            max_idle_connections: 5,
            connection_max_lifetime: Duration::from_secs(300),
        }
    }
}

/// Where API key metadata is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Embedded `SQLite`, lost on restart.
    InMemory,

    /// Embedded `SQLite` file. Single replica only.
    Disk(PathBuf),

    /// External `PostgreSQL`, shared between replicas.
    External { url: String, pool: PoolSettings },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageConfigError {
    #[error("unknown storage mode {0:?}, expected in-memory, disk or external")]
    UnknownMode(String),

    #[error("a database URL is required for external storage")]
    MissingUrl,

    #[error("external storage needs a postgres:// or postgresql:// URL")]
    UnsupportedUrl,
}

impl StorageConfig {
    /// Build a storage configuration from its textual `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown mode, or an external mode without a
    /// `PostgreSQL` URL.
    pub fn from_mode(
        mode: &str,
        data_path: &Path,
        url: Option<&str>,
        pool: PoolSettings,
    ) -> Result<Self, StorageConfigError> {
        match mode {
            "in-memory" => Ok(Self::InMemory),
            "disk" => Ok(Self::Disk(data_path.to_path_buf())),
            "external" => {
                let url = url
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(StorageConfigError::MissingUrl)?;

                if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                    return Err(StorageConfigError::UnsupportedUrl);
                }

                Ok(Self::External {
                    url: url.to_owned(),
                    pool,
                })
            }
            other => Err(StorageConfigError::UnknownMode(other.to_owned())),
        }
    }

    /// Open the configured database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub async fn connect(&self) -> Result<Database, sqlx::Error> {
        match self {
            Self::InMemory => connect_sqlite(None).await,
            Self::Disk(path) => connect_sqlite(Some(path)).await,
            Self::External { url, pool } => connect_postgres(url, *pool).await,
        }
    }
}

/// A connected pool and the engine behind it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    backend: DatabaseBackend,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    #[must_use]
    pub const fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Open an embedded `SQLite` database, in memory when `path` is `None`.
///
/// The pool holds exactly one connection: `SQLite` serialises writers, and an
/// in-memory database lives only as long as its connection.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn connect_sqlite(path: Option<&Path>) -> Result<Database, sqlx::Error> {
    install_default_drivers();

    let url = match path {
        Some(path) => format!("sqlite://{}?mode=rwc", path.display()),
        None => "sqlite::memory:".to_owned(),
    };

    let on_disk = path.is_some();

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                if on_disk {
                    sqlx::query("PRAGMA journal_mode = WAL")
                        .execute(&mut *conn)
                        .await?;
                }

                sqlx::query(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
                    .execute(&mut *conn)
                    .await?;

                Ok(())
            })
        })
        .connect(&url)
        .await?;

    match path {
        Some(path) => info!(path = %path.display(), "opened SQLite database"),
        None => info!("opened in-memory SQLite database"),
    }

    Ok(Database {
        pool,
        backend: DatabaseBackend::Sqlite,
    })
}

/// Connect to an external `PostgreSQL` server.
///
/// sqlx has no idle-connection cap; `max_idle_connections` becomes the
/// number of connections kept warm, and surplus idle connections are reaped
/// after the connection lifetime.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_postgres(
    database_url: &str,
    settings: PoolSettings,
) -> Result<Database, sqlx::Error> {
    install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(settings.max_open_connections)
        .min_connections(
            settings
                .max_idle_connections
                .min(settings.max_open_connections),
        )
        .max_lifetime(settings.connection_max_lifetime)
        .idle_timeout(settings.connection_max_lifetime)
        .connect(database_url)
        .await?;

    info!("connected to PostgreSQL");

    Ok(Database {
        pool,
        backend: DatabaseBackend::Postgres,
    })
}
