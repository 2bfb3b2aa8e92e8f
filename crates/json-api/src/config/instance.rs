//! Instance Config

use clap::Args;

/// Which platform instance this server fronts.
#[derive(Debug, Args)]
pub struct InstanceConfig {
    /// Instance name; prefixes tier namespaces. Defaults to the gateway name.
    #[arg(long, env = "INSTANCE_NAME")]
    pub instance_name: Option<String>,

    /// Namespace holding the tier-to-group-mapping ConfigMap
    #[arg(long, env = "NAMESPACE", default_value = "maas-api")]
    pub namespace: String,

    /// Gateway whose routes define the served models
    #[arg(long, env = "GATEWAY_NAME", default_value = "maas-default-gateway")]
    pub gateway_name: String,

    /// Namespace of the gateway
    #[arg(long, env = "GATEWAY_NAMESPACE", default_value = "openshift-ingress")]
    pub gateway_namespace: String,

    /// Seconds between tier configuration refreshes
    #[arg(long, env = "TIER_CONFIG_REFRESH_SECONDS", default_value_t = 30_u64)]
    pub tier_config_refresh_seconds: u64,
}

impl InstanceConfig {
    /// The instance name, falling back to the gateway name.
    #[must_use]
    pub fn tenant(&self) -> &str {
        self.instance_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.gateway_name)
    }
}
