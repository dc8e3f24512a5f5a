//! Configuration for the parley bridge

#![allow(clippy::must_use_candidate)]

mod loader;
pub mod provider;
pub mod telemetry;

use indexmap::IndexMap;
use serde::Deserialize;

pub use provider::{ProviderConfig, ProviderKind};
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level parley configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider used when a caller does not name one
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Provider configurations keyed by name, in declaration order
    #[serde(default)]
    pub providers: IndexMap<String, ProviderConfig>,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Name of the provider to use when none is requested
    ///
    /// Falls back to the first declared provider.
    pub fn default_provider(&self) -> Option<&str> {
        self.default_provider
            .as_deref()
            .or_else(|| self.providers.keys().next().map(String::as_str))
    }
}
