//! Logging and trace export settings

use std::time::Duration;

use clap::{Args, ValueEnum};

/// Crates whose debug output drowns out request logs.
const QUIET_DEPENDENCIES: &[&str] = &[
    "h2", "hyper", "hyper_util", "reqwest", "rustls", "sqlx", "tonic", "opentelemetry",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level or filter directives, e.g. `info` or `maas_app=debug`
    #[arg(short, long = "log-level", env = "RUST_LOG", default_value = "info")]
    pub level: String,

    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Filter directives for the configured level with noisy dependencies
    /// held at `warn`.
    pub fn filter_directives(&self) -> String {
        QUIET_DEPENDENCIES
            .iter()
            .fold(self.level.clone(), |directives, target| {
                format!("{directives},{target}=warn")
            })
    }
}

/// OpenTelemetry trace export settings. Export is off unless enabled.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    #[arg(long = "otel-enabled", env = "OTEL_ENABLED", default_value_t = false)]
    pub enabled: bool,

    /// Continue traces from an incoming `traceparent` header
    #[arg(
        long = "otel-parent-propagation",
        env = "OTEL_PARENT_PROPAGATION_ENABLED",
        default_value_t = false
    )]
    pub parent_propagation: bool,

    /// OTLP gRPC endpoint
    #[arg(
        long = "otel-endpoint",
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub endpoint: String,

    #[arg(
        long = "otel-timeout-seconds",
        env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS",
        default_value_t = 3_u64
    )]
    pub export_timeout_seconds: u64,

    #[arg(long = "otel-service-name", env = "OTEL_SERVICE_NAME", default_value = "maas-api")]
    pub service_name: String,

    #[arg(
        long = "otel-service-version",
        env = "OTEL_SERVICE_VERSION",
        default_value = env!("CARGO_PKG_VERSION")
    )]
    pub service_version: String,

    #[arg(
        long = "otel-environment",
        env = "OTEL_DEPLOYMENT_ENVIRONMENT",
        default_value = "development"
    )]
    pub environment: String,

    /// Fraction of root traces sampled, clamped to `[0.0, 1.0]`
    #[arg(long = "otel-sample-ratio", env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0_f64)]
    pub sample_ratio: f64,

    /// Requests slower than this are logged as warnings
    #[arg(
        long = "slow-request-threshold-ms",
        env = "SLOW_REQUEST_THRESHOLD_MS",
        default_value_t = 1_000_u64
    )]
    pub slow_request_threshold_ms: u64,
}

impl ObservabilityConfig {
    pub const fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_seconds)
    }

    /// Parent extraction only applies when export is on.
    pub const fn propagates_parent(&self) -> bool {
        self.enabled && self.parent_propagation
    }
}
