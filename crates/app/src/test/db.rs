//! Throwaway PostgreSQL databases for store tests.
//!
//! One container is started per test binary; each [`TestDb`] is a fresh
//! database inside it, dropped in the background when the handle goes away.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const USER: &str = "maas_test";
const PASSWORD: &str = "maas_test_password";
const PORT: u16 = 5432;

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static DROPPER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name("maas_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("PostgreSQL container should start")
}

async fn start_dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            drop_database(&name).await;
        }
    });

    sender
}

fn host() -> String {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_owned())
}

fn url(port: u16, database: &str) -> String {
    format!("postgresql://{USER}:{PASSWORD}@{}:{port}/{database}", host())
}

/// Database names are spliced into DDL.
fn is_safe_name(name: &str) -> bool {
    (1..=63).contains(&name.len())
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

async fn admin_connection() -> Option<PgConnection> {
    let port = CONTAINER.get()?.get_host_port_ipv4(PORT).await.ok()?;

    PgConnection::connect(&url(port, "postgres")).await.ok()
}

async fn drop_database(name: &str) {
    if !is_safe_name(name) {
        return;
    }

    if let Some(mut conn) = admin_connection().await {
        let _dropped = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
            .execute(&mut conn)
            .await;
        let _closed = conn.close().await;
    }
}

#[derive(Debug)]
pub(crate) struct TestDb {
    pub(crate) name: String,
    pub(crate) url: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROPPER.get() {
            let _queued = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        DROPPER.get_or_init(start_dropper).await;

        let name = format!("maas_store_{:016x}", rand::random::<u64>());

        let port = CONTAINER
            .get_or_init(start_container)
            .await
            .get_host_port_ipv4(PORT)
            .await
            .expect("container should expose PostgreSQL");

        let mut conn = PgConnection::connect(&url(port, "postgres"))
            .await
            .expect("admin connection should open");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("test database should be created");

        conn.close().await.expect("admin connection should close");

        Self {
            url: url(port, &name),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_identifiers_are_dropped() {
        assert!(is_safe_name("maas_store_00ff"));
        assert!(!is_safe_name("1abc"));
        assert!(!is_safe_name("drop;table"));
        assert!(!is_safe_name(""));
    }
}
