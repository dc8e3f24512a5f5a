//! Programmatic configuration builder for integration tests

use parley_config::{Config, ProviderConfig, ProviderKind};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Add a provider speaking `kind`'s protocol
    pub fn with_provider(mut self, name: &str, kind: ProviderKind, model: Option<&str>) -> Self {
        self.config.providers.insert(
            name.to_owned(),
            ProviderConfig {
                provider_type: kind,
                model: model.map(str::to_owned),
                max_tokens: None,
            },
        );
        self
    }

    /// Set the default output budget of an existing provider
    pub fn with_max_tokens(mut self, name: &str, max_tokens: u32) -> Self {
        if let Some(provider) = self.config.providers.get_mut(name) {
            provider.max_tokens = Some(max_tokens);
        }
        self
    }

    pub fn with_default_provider(mut self, name: &str) -> Self {
        self.config.default_provider = Some(name.to_owned());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Config {
        self.config.validate().expect("valid test configuration");
        self.config
    }
}
