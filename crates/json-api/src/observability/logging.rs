//! Logging subscriber initialisation.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Directives used when the configured ones do not parse.
const FALLBACK_DIRECTIVES: &str = "info";

pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt_layer(config.logging.format))
        .with(env_filter(&config.logging.filter_directives()));

    match tracer_provider {
        Some(provider) => {
            let tracer = provider.tracer(config.observability.service_name.clone());

            subscriber
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
        }
        None => subscriber.try_init()?,
    }

    Ok(())
}

/// JSON output nests the request span, so tenant and request id land on
/// every line a handler logs.
fn fmt_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed(),
    }
}

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_invalid| EnvFilter::new(FALLBACK_DIRECTIVES))
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn configured_directives_set_the_level() {
        assert_eq!(
            env_filter("debug,sqlx=warn").max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn unparsable_directives_fall_back_to_info() {
        assert_eq!(
            env_filter("maas_app=shout").max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
