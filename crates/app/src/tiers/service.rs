//! Tier resolution.

use mockall::automock;

use crate::tiers::{Tier, TierConfigCache, TierError, TierSnapshot, tier_namespace};

/// Resolves tiers against the cached tier configuration.
#[derive(Debug, Clone)]
pub struct TierMapper {
    tenant: String,
    config_map: String,
    cache: TierConfigCache,
}

impl TierMapper {
    #[must_use]
    pub fn new(
        tenant: impl Into<String>,
        config_map: impl Into<String>,
        cache: TierConfigCache,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            config_map: config_map.into(),
            cache,
        }
    }
}

impl TierResolver for TierMapper {
    fn tier_for_groups(&self, groups: &[String]) -> Result<Tier, TierError> {
        if groups.is_empty() {
            return Err(TierError::NoGroups);
        }

        match self.cache.snapshot().as_ref() {
            TierSnapshot::Loaded(configuration) => configuration.resolve(groups).cloned(),
            TierSnapshot::Missing => Err(TierError::MissingConfiguration(self.config_map.clone())),
            TierSnapshot::Invalid(reason) => Err(TierError::InvalidConfiguration(reason.clone())),
            TierSnapshot::Pending => Err(TierError::NotLoaded),
        }
    }

    fn namespace(&self, tier: &str) -> String {
        tier_namespace(&self.tenant, tier)
    }
}

#[automock]
pub trait TierResolver: Send + Sync {
    /// The highest-precedence tier any of `groups` belongs to.
    fn tier_for_groups(&self, groups: &[String]) -> Result<Tier, TierError>;

    /// The namespace provisioned for `tier`.
    fn namespace(&self, tier: &str) -> String;
}
