//! Lookup of converters by provider name

use std::sync::Arc;

use indexmap::IndexMap;
use parley_config::{Config, ProviderConfig, ProviderKind};

use crate::convert::{ClaudeConverter, Converter, GeminiConverter, OpenAiConverter};
use crate::error::BridgeError;

/// Registered converters keyed by provider name
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: IndexMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with one unconfigured converter per supported vendor
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("claude", Arc::new(ClaudeConverter::new()));
        registry.register("gemini", Arc::new(GeminiConverter::new()));
        registry.register("openai", Arc::new(OpenAiConverter::new()));
        registry
    }

    /// Build a registry from the configured providers
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();

        for (name, provider) in &config.providers {
            tracing::debug!(
                provider = %name,
                protocol = provider.provider_type.as_str(),
                model = provider.model.as_deref().unwrap_or_default(),
                "registering converter"
            );
            registry.register(name.clone(), build_converter(provider));
        }

        registry
    }

    /// Register a converter under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, converter: Arc<dyn Converter>) {
        self.converters.insert(name.into(), converter);
    }

    /// Converter registered under `name`
    pub fn get(&self, name: &str) -> Result<Arc<dyn Converter>, BridgeError> {
        self.converters
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::UnsupportedProvider {
                provider: name.to_owned(),
            })
    }

    /// Registered provider names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(String::as_str)
    }

    /// Number of registered converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether no converter is registered
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("providers", &self.converters.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn build_converter(provider: &ProviderConfig) -> Arc<dyn Converter> {
    let model = provider.model.clone();

    match provider.provider_type {
        ProviderKind::Claude => {
            let mut converter = ClaudeConverter::new();
            if let Some(model) = model {
                converter = converter.with_model(model);
            }
            if let Some(max_tokens) = provider.max_tokens {
                converter = converter.with_max_tokens(max_tokens);
            }
            Arc::new(converter)
        }
        ProviderKind::Openai => Arc::new(match model {
            Some(model) => OpenAiConverter::new().with_model(model),
            None => OpenAiConverter::new(),
        }),
        ProviderKind::Gemini => Arc::new(match model {
            Some(model) => GeminiConverter::new().with_model(model),
            None => GeminiConverter::new(),
        }),
    }
}
