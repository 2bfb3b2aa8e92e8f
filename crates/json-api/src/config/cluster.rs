//! Cluster Config

use std::{path::PathBuf, time::Duration};

use clap::Args;
use tracing::warn;

use maas_app::cluster::{KubeConfig, KubeCredentials};

use super::ConfigError;

/// Kubernetes API access settings. Defaults follow the in-cluster layout.
#[derive(Debug, Args)]
pub struct ClusterConfig {
    /// API server URL; derived from the in-cluster service variables when unset
    #[arg(long, env = "KUBERNETES_API_URL")]
    pub kubernetes_api_url: Option<String>,

    /// In-cluster API server host
    #[arg(long, env = "KUBERNETES_SERVICE_HOST", hide = true)]
    pub kubernetes_service_host: Option<String>,

    /// In-cluster API server port
    #[arg(long, env = "KUBERNETES_SERVICE_PORT", hide = true)]
    pub kubernetes_service_port: Option<u16>,

    /// Fixed bearer token for the API server, for local development
    #[arg(long, env = "KUBERNETES_TOKEN", hide_env_values = true)]
    pub kubernetes_token: Option<String>,

    /// Service account token file, re-read on every request
    #[arg(
        long,
        env = "KUBERNETES_TOKEN_FILE",
        default_value = "/var/run/secrets/kubernetes.io/serviceaccount/token"
    )]
    pub kubernetes_token_file: PathBuf,

    /// CA bundle for the API server certificate
    #[arg(
        long,
        env = "KUBERNETES_CA_FILE",
        default_value = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt"
    )]
    pub kubernetes_ca_file: PathBuf,

    /// Skip API server certificate verification
    #[arg(long, env = "KUBERNETES_INSECURE_SKIP_TLS_VERIFY", default_value_t = false)]
    pub kubernetes_insecure_skip_tls_verify: bool,

    /// Per-request timeout for API server calls, in seconds
    #[arg(long, env = "KUBERNETES_REQUEST_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub kubernetes_request_timeout_seconds: u64,
}

impl ClusterConfig {
    fn api_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = self
            .kubernetes_api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        {
            return Ok(url.to_owned());
        }

        let host = self
            .kubernetes_service_host
            .as_deref()
            .filter(|host| !host.is_empty())
            .ok_or(ConfigError::MissingApiServer)?;
        let port = self.kubernetes_service_port.unwrap_or(443);

        if host.contains(':') {
            Ok(format!("https://[{host}]:{port}"))
        } else {
            Ok(format!("https://{host}:{port}"))
        }
    }

    fn credentials(&self) -> KubeCredentials {
        if let Some(token) = self
            .kubernetes_token
            .as_deref()
            .filter(|token| !token.is_empty())
        {
            return KubeCredentials::Static(token.to_owned());
        }

        if self.kubernetes_token_file.exists() {
            KubeCredentials::File(self.kubernetes_token_file.clone())
        } else {
            warn!(
                path = %self.kubernetes_token_file.display(),
                "no service account token found, calling the API server anonymously"
            );

            KubeCredentials::Anonymous
        }
    }

    fn ca_certificate(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        if !self.kubernetes_ca_file.exists() {
            return Ok(None);
        }

        std::fs::read(&self.kubernetes_ca_file)
            .map(Some)
            .map_err(|source| ConfigError::CaBundle {
                path: self.kubernetes_ca_file.display().to_string(),
                source,
            })
    }

    /// Build the API client configuration.
    pub(crate) fn kube_config(&self) -> Result<KubeConfig, ConfigError> {
        Ok(KubeConfig {
            api_url: self.api_url()?,
            credentials: self.credentials(),
            ca_certificate: self.ca_certificate()?,
            insecure_skip_tls_verify: self.kubernetes_insecure_skip_tls_verify,
            timeout: Duration::from_secs(self.kubernetes_request_timeout_seconds),
        })
    }
}
