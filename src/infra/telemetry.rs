use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const CACHE_HIT_TOTAL: &str = "kinoteka_cache_hit_total";
pub const CACHE_MISS_TOTAL: &str = "kinoteka_cache_miss_total";
pub const CACHE_STORE_ERROR_TOTAL: &str = "kinoteka_cache_store_error_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            CACHE_HIT_TOTAL,
            Unit::Count,
            "Total number of response-cache hits, labelled by prefix."
        );
        describe_counter!(
            CACHE_MISS_TOTAL,
            Unit::Count,
            "Total number of response-cache misses, labelled by prefix."
        );
        describe_counter!(
            CACHE_STORE_ERROR_TOTAL,
            Unit::Count,
            "Total number of cache store failures, labelled by prefix and operation."
        );
    });
}
