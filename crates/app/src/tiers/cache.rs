//! Cached tier configuration with periodic refresh.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    cluster::{ClusterClient, ClusterError},
    tiers::{TIER_MAPPING_CONFIG_MAP, TIER_MAPPING_KEY, TierConfiguration},
};

/// The state of the tier configuration as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierSnapshot {
    /// Nothing has been observed yet.
    Pending,

    /// The configuration object does not exist.
    Missing,

    /// The configuration object exists but is unusable.
    Invalid(String),

    /// A validated configuration.
    Loaded(Arc<TierConfiguration>),
}

/// Where the tier configuration lives.
#[derive(Debug, Clone)]
pub struct TierConfigSource {
    pub namespace: String,
    pub config_map: String,
    pub tenant: String,
}

impl TierConfigSource {
    /// The standard mapping object in `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            config_map: TIER_MAPPING_CONFIG_MAP.to_owned(),
            tenant: tenant.into(),
        }
    }
}

/// Read-side handle on the most recent [`TierSnapshot`].
///
/// Readers never block on the cluster; staleness is bounded by the refresh
/// interval.
#[derive(Debug, Clone)]
pub struct TierConfigCache {
    receiver: watch::Receiver<Arc<TierSnapshot>>,
}

impl TierConfigCache {
    /// A cache pinned to `snapshot` that never refreshes.
    #[must_use]
    pub fn fixed(snapshot: TierSnapshot) -> Self {
        let (_sender, receiver) = watch::channel(Arc::new(snapshot));

        Self { receiver }
    }

    /// Load the configuration once, then keep it fresh in a background
    /// task polling every `refresh`.
    ///
    /// The task stops once every cache handle has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial load fails for any reason other than
    /// the object being absent.
    pub async fn start(
        cluster: Arc<dyn ClusterClient>,
        source: TierConfigSource,
        refresh: Duration,
    ) -> Result<(Self, JoinHandle<()>), ClusterError> {
        let (version, snapshot) = load(cluster.as_ref(), &source).await?;

        info!(
            config_map = %source.config_map,
            namespace = %source.namespace,
            state = snapshot_state(&snapshot),
            "loaded tier configuration"
        );

        let (sender, receiver) = watch::channel(Arc::new(snapshot));
        let handle = tokio::spawn(refresh_loop(cluster, source, refresh, sender, version));

        Ok((Self { receiver }, handle))
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TierSnapshot> {
        Arc::clone(&self.receiver.borrow())
    }
}

async fn refresh_loop(
    cluster: Arc<dyn ClusterClient>,
    source: TierConfigSource,
    refresh: Duration,
    sender: watch::Sender<Arc<TierSnapshot>>,
    mut version: Option<String>,
) {
    let mut ticker = tokio::time::interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            () = sender.closed() => break,
            _ = ticker.tick() => {}
        }

        match load(cluster.as_ref(), &source).await {
            Ok((next_version, _)) if next_version.is_some() && next_version == version => {
                debug!("tier configuration unchanged");
            }
            Ok((next_version, snapshot)) => {
                info!(state = snapshot_state(&snapshot), "tier configuration changed");
                version = next_version;
                sender.send_replace(Arc::new(snapshot));
            }
            Err(error) => {
                warn!(%error, "failed to refresh tier configuration, keeping last snapshot");
            }
        }
    }

    debug!("tier configuration refresh stopped");
}

async fn load(
    cluster: &dyn ClusterClient,
    source: &TierConfigSource,
) -> Result<(Option<String>, TierSnapshot), ClusterError> {
    let config_map = match cluster
        .get_config_map(&source.namespace, &source.config_map)
        .await
    {
        Ok(config_map) => config_map,
        Err(ClusterError::NotFound(_)) => return Ok((None, TierSnapshot::Missing)),
        Err(error) => return Err(error),
    };

    let version = config_map.metadata.resource_version.clone();

    let Some(document) = config_map.data.get(TIER_MAPPING_KEY) else {
        warn!(config_map = %source.config_map, "tiers key not found in ConfigMap");

        return Ok((
            version,
            TierSnapshot::Invalid(format!(
                "{TIER_MAPPING_KEY} key not found in ConfigMap {}",
                source.config_map
            )),
        ));
    };

    let snapshot = match TierConfiguration::parse(document, &source.tenant) {
        Ok(configuration) => TierSnapshot::Loaded(Arc::new(configuration)),
        Err(error) => {
            warn!(%error, config_map = %source.config_map, "rejected tier configuration");
            TierSnapshot::Invalid(error.to_string())
        }
    };

    Ok((version, snapshot))
}

fn snapshot_state(snapshot: &TierSnapshot) -> &'static str {
    match snapshot {
        TierSnapshot::Pending => "pending",
        TierSnapshot::Missing => "missing",
        TierSnapshot::Invalid(_) => "invalid",
        TierSnapshot::Loaded(_) => "loaded",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rustc_hash::FxHashMap;
    use testresult::TestResult;

    use crate::cluster::{ConfigMap, MockClusterClient, ObjectMeta};

    use super::*;

    fn config_map(version: &str, document: &str) -> ConfigMap {
        let mut data = FxHashMap::default();
        data.insert(TIER_MAPPING_KEY.to_owned(), document.to_owned());

        ConfigMap {
            metadata: ObjectMeta {
                name: TIER_MAPPING_CONFIG_MAP.to_owned(),
                resource_version: Some(version.to_owned()),
                ..ObjectMeta::default()
            },
            data,
        }
    }

    fn loaded_names(cache: &TierConfigCache) -> Vec<String> {
        match cache.snapshot().as_ref() {
            TierSnapshot::Loaded(config) => {
                config.tiers().iter().map(|tier| tier.name.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    #[tokio::test]
    async fn absent_config_map_is_missing_not_an_error() -> TestResult {
        let mut cluster = MockClusterClient::new();

        cluster
            .expect_get_config_map()
            .withf(|namespace, name| namespace == "maas-api" && name == TIER_MAPPING_CONFIG_MAP)
            .returning(|_, name| Err(ClusterError::NotFound(name.to_owned())));

        let (cache, handle) = TierConfigCache::start(
            Arc::new(cluster),
            TierConfigSource::new("maas-api", "acme"),
            Duration::from_secs(3600),
        )
        .await?;

        assert_eq!(cache.snapshot().as_ref(), &TierSnapshot::Missing);

        handle.abort();

        Ok(())
    }

    #[tokio::test]
    async fn initial_transport_failure_is_an_error() {
        let mut cluster = MockClusterClient::new();

        cluster
            .expect_get_config_map()
            .once()
            .returning(|_, _| Err(ClusterError::UnexpectedResponse("forbidden".to_owned())));

        let result = TierConfigCache::start(
            Arc::new(cluster),
            TierConfigSource::new("maas-api", "acme"),
            Duration::from_secs(3600),
        )
        .await;

        assert!(result.is_err(), "startup should fail on transport errors");
    }

    #[tokio::test]
    async fn missing_key_is_invalid() -> TestResult {
        let mut cluster = MockClusterClient::new();

        cluster.expect_get_config_map().returning(|_, _| {
            Ok(ConfigMap {
                metadata: ObjectMeta::default(),
                data: FxHashMap::default(),
            })
        });

        let (cache, handle) = TierConfigCache::start(
            Arc::new(cluster),
            TierConfigSource::new("maas-api", "acme"),
            Duration::from_secs(3600),
        )
        .await?;

        assert!(matches!(cache.snapshot().as_ref(), TierSnapshot::Invalid(_)));

        handle.abort();

        Ok(())
    }

    #[tokio::test]
    async fn refresh_publishes_changed_configuration() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut cluster = MockClusterClient::new();

        cluster.expect_get_config_map().returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(config_map("1", "- name: free\n  groups: [a]\n"))
            } else {
                Ok(config_map("2", "- name: gold\n  groups: [a]\n"))
            }
        });

        let (cache, handle) = TierConfigCache::start(
            Arc::new(cluster),
            TierConfigSource::new("maas-api", "acme"),
            Duration::from_millis(10),
        )
        .await?;

        assert_eq!(loaded_names(&cache), vec!["free"]);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(loaded_names(&cache), vec!["gold"]);
        assert!(calls.load(Ordering::SeqCst) >= 2, "refresh should poll again");

        handle.abort();

        Ok(())
    }

    #[tokio::test]
    async fn refresh_failure_keeps_last_snapshot() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut cluster = MockClusterClient::new();

        cluster.expect_get_config_map().returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(config_map("1", "- name: free\n  groups: [a]\n"))
            } else {
                Err(ClusterError::UnexpectedResponse("unavailable".to_owned()))
            }
        });

        let (cache, handle) = TierConfigCache::start(
            Arc::new(cluster),
            TierConfigSource::new("maas-api", "acme"),
            Duration::from_millis(10),
        )
        .await?;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(loaded_names(&cache), vec!["free"]);

        handle.abort();

        Ok(())
    }

    #[tokio::test]
    async fn refresh_stops_when_cache_dropped() -> TestResult {
        let mut cluster = MockClusterClient::new();

        cluster
            .expect_get_config_map()
            .returning(|_, _| Ok(config_map("1", "- name: free\n  groups: [a]\n")));

        let (cache, handle) = TierConfigCache::start(
            Arc::new(cluster),
            TierConfigSource::new("maas-api", "acme"),
            Duration::from_millis(10),
        )
        .await?;

        drop(cache);

        tokio::time::timeout(Duration::from_secs(1), handle).await??;

        Ok(())
    }
}
