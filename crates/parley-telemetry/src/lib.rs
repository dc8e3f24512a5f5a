//! Logging setup for parley
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a text
//! or JSON formatting layer. Log lines go to stderr so that stdout stays
//! free for command output.

use parley_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither the caller nor the configuration sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Resolve the effective filter directive
///
/// An explicit override wins over the configured filter.
#[must_use]
pub fn resolve_filter<'a>(config: Option<&'a TelemetryConfig>, override_filter: Option<&'a str>) -> &'a str {
    override_filter
        .or_else(|| config.and_then(|c| c.log_filter.as_deref()))
        .unwrap_or(DEFAULT_LOG_FILTER)
}

/// Initialize logging from configuration
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, override_filter: Option<&str>) -> anyhow::Result<()> {
    let directive = resolve_filter(config, override_filter);
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{directive}': {e}, falling back to '{DEFAULT_LOG_FILTER}'");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let format = config.map(|c| c.format).unwrap_or_default();
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::debug!(filter = directive, ?format, "logging initialized");

    Ok(())
}
