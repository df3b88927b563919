//! Tracing subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::tracer;
use crate::infrastructure::paths::get_data_dir;
use crate::Config;

/// Service name reported on every exported span.
pub const SERVICE_NAME: &str = "campus-discovery";

/// Name of the span export file inside the trace directory.
pub const SPAN_FILE_NAME: &str = "discovery-spans.jsonl";

/// Installs the global subscriber exporting spans to `discovery-spans.jsonl`.
///
/// The filter comes from `RUST_LOG` when set, then from
/// [`Config::trace_level`], then defaults to `info`. Spans go to
/// [`Config::trace_dir`] or the per-user data directory.
///
/// Observability is optional: if the directory cannot be created nothing is
/// installed, and a second call leaves the first subscriber in place.
///
/// ```no_run
/// use campus_discovery::observability::init_tracing;
/// use campus_discovery::Config;
///
/// let config = Config {
///     trace_level: Some("campus_discovery=debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let trace_dir = config.trace_dir.clone().unwrap_or_else(get_data_dir);
    if std::fs::create_dir_all(&trace_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(trace_dir.join(SPAN_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
