//! Labels stamped on provisioned cluster objects.

use rustc_hash::FxHashMap;

const COMPONENT: (&str, &str) = ("app.kubernetes.io/component", "token-issuer");
const PART_OF: (&str, &str) = ("app.kubernetes.io/part-of", "maas-api");
const INSTANCE: &str = "maas.opendatahub.io/instance";
const TIER: &str = "maas.opendatahub.io/tier";
const TIER_NAMESPACE: &str = "maas.opendatahub.io/tier-namespace";

/// Labels for a tier namespace.
#[must_use]
pub fn namespace_labels(instance: &str, tier: &str) -> FxHashMap<String, String> {
    let mut labels = service_account_labels(instance, tier);
    labels.insert(TIER_NAMESPACE.to_owned(), "true".to_owned());
    labels
}

/// Labels for a per-user service account.
#[must_use]
pub fn service_account_labels(instance: &str, tier: &str) -> FxHashMap<String, String> {
    [
        COMPONENT,
        PART_OF,
        (INSTANCE, instance),
        (TIER, tier),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect()
}
