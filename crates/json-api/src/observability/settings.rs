//! Settings the request hoop reads on every request, fixed once at startup.

use std::sync::OnceLock;

use tracing::warn;

use crate::config::ServerConfig;

/// Request tracing settings derived from the server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RequestSettings {
    /// Instance name recorded on every request span.
    pub(super) tenant: String,

    /// Namespace the instance runs in.
    pub(super) namespace: String,

    pub(super) slow_request_threshold_ms: u64,

    /// Continue traces from an incoming `traceparent`.
    pub(super) propagate_parent: bool,
}

/// Used until [`apply_runtime_config`] runs, which is always the case in
/// handler tests.
static DEFAULT_SETTINGS: RequestSettings = RequestSettings {
    tenant: String::new(),
    namespace: String::new(),
    slow_request_threshold_ms: 1_000,
    propagate_parent: false,
};

static SETTINGS: OnceLock<RequestSettings> = OnceLock::new();

impl RequestSettings {
    pub(super) fn from_config(config: &ServerConfig) -> Self {
        Self {
            tenant: config.instance.tenant().to_owned(),
            namespace: config.instance.namespace.clone(),
            slow_request_threshold_ms: config.observability.slow_request_threshold_ms,
            propagate_parent: config.observability.propagates_parent(),
        }
    }
}

pub(super) fn apply_runtime_config(config: &ServerConfig) {
    if SETTINGS.set(RequestSettings::from_config(config)).is_err() {
        warn!("request tracing settings already applied; keeping the first");
    }
}

pub(super) fn current() -> &'static RequestSettings {
    SETTINGS.get().unwrap_or(&DEFAULT_SETTINGS)
}
