//! API key metadata store.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Row, any::AnyRow, query};
use tracing::{debug, warn};

use crate::{
    api_keys::{
        ApiKeyMetadata, MetadataStoreError, NewApiKey,
        queries::{Queries, SCHEMA_SQL},
    },
    database::Database,
};

/// Metadata store over either database backend.
///
/// Timestamps are stored as second-precision RFC 3339 text in UTC, so they
/// compare correctly as strings on both engines.
#[derive(Debug, Clone)]
pub struct SqlMetadataStore {
    database: Database,
    queries: Queries,
}

impl SqlMetadataStore {
    /// Wrap `database`, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub async fn new(database: Database) -> Result<Self, MetadataStoreError> {
        for statement in SCHEMA_SQL {
            query(statement).execute(database.pool()).await?;
        }

        Ok(Self {
            queries: Queries::for_backend(database.backend()),
            database,
        })
    }

    /// Release the underlying connections.
    pub async fn close(&self) {
        self.database.close().await;
    }
}

fn format_timestamp(timestamp: Timestamp) -> String {
    Timestamp::from_second(timestamp.as_second())
        .unwrap_or(timestamp)
        .to_string()
}

fn parse_timestamp(id: &str, column: &str, value: &str) -> Option<Timestamp> {
    match value.parse() {
        Ok(timestamp) => Some(timestamp),
        Err(error) => {
            warn!(id, column, %error, "unparsable timestamp in api key metadata");
            None
        }
    }
}

fn metadata_from_row(row: &AnyRow) -> Result<ApiKeyMetadata, sqlx::Error> {
    let id: String = row.try_get("id")?;
    let creation_date: String = row.try_get("creation_date")?;
    let expiration_date: String = row.try_get("expiration_date")?;

    Ok(ApiKeyMetadata {
        creation_date: parse_timestamp(&id, "creation_date", &creation_date)
            .unwrap_or(Timestamp::UNIX_EPOCH),
        expiration_date: parse_timestamp(&id, "expiration_date", &expiration_date),
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        namespace: row.try_get("namespace")?,
        id,
    })
}

#[async_trait]
impl MetadataStore for SqlMetadataStore {
    async fn add(
        &self,
        namespace: &str,
        username: &str,
        key: &NewApiKey,
    ) -> Result<(), MetadataStoreError> {
        if key.id.is_empty() {
            return Err(MetadataStoreError::Invalid("id is required".to_owned()));
        }

        if key.name.is_empty() {
            return Err(MetadataStoreError::Invalid("name is required".to_owned()));
        }

        let creation_date = key.issued_at.unwrap_or_else(Timestamp::now);

        query(&self.queries.insert)
            .bind(key.id.clone())
            .bind(username.to_owned())
            .bind(key.name.clone())
            .bind(key.description.clone())
            .bind(namespace.to_owned())
            .bind(format_timestamp(creation_date))
            .bind(format_timestamp(key.expires_at))
            .execute(self.database.pool())
            .await?;

        debug!(id = %key.id, namespace, "recorded api key metadata");

        Ok(())
    }

    async fn list(
        &self,
        namespace: &str,
        username: &str,
    ) -> Result<Vec<ApiKeyMetadata>, MetadataStoreError> {
        let rows = query(&self.queries.list)
            .bind(username.to_owned())
            .bind(namespace.to_owned())
            .fetch_all(self.database.pool())
            .await?;

        let keys = rows
            .iter()
            .map(metadata_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(keys)
    }

    async fn get(
        &self,
        namespace: &str,
        username: &str,
        id: &str,
    ) -> Result<ApiKeyMetadata, MetadataStoreError> {
        let row = query(&self.queries.get)
            .bind(id.to_owned())
            .bind(username.to_owned())
            .bind(namespace.to_owned())
            .fetch_optional(self.database.pool())
            .await?
            .ok_or(MetadataStoreError::NotFound)?;

        Ok(metadata_from_row(&row)?)
    }

    async fn invalidate_all(
        &self,
        namespace: &str,
        username: &str,
    ) -> Result<u64, MetadataStoreError> {
        let now = format_timestamp(Timestamp::now());

        let rows_affected = query(&self.queries.invalidate)
            .bind(now.clone())
            .bind(username.to_owned())
            .bind(namespace.to_owned())
            .bind(now)
            .execute(self.database.pool())
            .await?
            .rows_affected();

        debug!(namespace, rows_affected, "expired api key metadata");

        Ok(rows_affected)
    }
}

/// Persistence for API key metadata, scoped by owner and tier namespace.
#[automock]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Record a newly issued key.
    async fn add(
        &self,
        namespace: &str,
        username: &str,
        key: &NewApiKey,
    ) -> Result<(), MetadataStoreError>;

    /// Keys owned by `username` in `namespace`, newest first.
    async fn list(
        &self,
        namespace: &str,
        username: &str,
    ) -> Result<Vec<ApiKeyMetadata>, MetadataStoreError>;

    /// A single key owned by `username` in `namespace`.
    async fn get(
        &self,
        namespace: &str,
        username: &str,
        id: &str,
    ) -> Result<ApiKeyMetadata, MetadataStoreError>;

    /// Mark every unexpired key as expired now. Returns how many changed.
    async fn invalidate_all(&self, namespace: &str, username: &str)
    -> Result<u64, MetadataStoreError>;
}
