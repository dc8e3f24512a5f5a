use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is configured, the default provider
    /// is unknown, or a provider has an invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("at least one provider must be configured");
        }

        if let Some(ref name) = self.default_provider
            && !self.providers.contains_key(name)
        {
            anyhow::bail!("default_provider '{name}' is not a configured provider");
        }

        for (name, provider) in &self.providers {
            if name.trim().is_empty() {
                anyhow::bail!("provider names must not be empty");
            }

            if provider.max_tokens == Some(0) {
                anyhow::bail!("providers.{name}.max_tokens must be greater than 0");
            }

            if provider.model.as_deref().is_some_and(|model| model.trim().is_empty()) {
                anyhow::bail!("providers.{name}.model must not be empty");
            }
        }

        Ok(())
    }
}
