//! Shared fixtures.

use std::sync::Arc;

use crate::{
    identity::UserContext,
    tiers::{
        TIER_MAPPING_CONFIG_MAP, TierConfigCache, TierConfiguration, TierError, TierMapper,
        TierResolver, TierSnapshot,
    },
};

pub(crate) const TENANT: &str = "acme";

pub(crate) const TIERS_YAML: &str = "
- name: free
  level: 1
  groups: [system:authenticated]
- name: premium
  displayName: Premium
  level: 10
  groups: [premium-users]
";

pub(crate) fn tier_resolver() -> Result<Arc<dyn TierResolver>, TierError> {
    let configuration = TierConfiguration::parse(TIERS_YAML, TENANT)?;

    Ok(Arc::new(TierMapper::new(
        TENANT,
        TIER_MAPPING_CONFIG_MAP,
        TierConfigCache::fixed(TierSnapshot::Loaded(Arc::new(configuration))),
    )))
}

pub(crate) fn user(username: &str, groups: &[&str]) -> UserContext {
    UserContext {
        username: username.to_owned(),
        uid: format!("{username}-uid"),
        groups: groups.iter().map(|group| (*group).to_owned()).collect(),
    }
}
