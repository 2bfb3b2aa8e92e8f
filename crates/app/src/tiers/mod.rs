//! Tier configuration and group-to-tier resolution.

mod cache;
mod errors;
mod models;
mod service;

pub use cache::*;
pub use errors::*;
pub use models::*;
pub use service::*;

/// Name of the `ConfigMap` holding the tier configuration.
pub const TIER_MAPPING_CONFIG_MAP: &str = "tier-to-group-mapping";

/// Key within the `ConfigMap` whose value is the YAML tier list.
pub const TIER_MAPPING_KEY: &str = "tiers";

/// Namespace holding the principals provisioned for `tier`.
#[must_use]
pub fn tier_namespace(tenant: &str, tier: &str) -> String {
    format!("{tenant}-tier-{tier}")
}

/// Group carried by every service account in `namespace`.
#[must_use]
pub fn service_account_group(namespace: &str) -> String {
    format!("system:serviceaccounts:{namespace}")
}
