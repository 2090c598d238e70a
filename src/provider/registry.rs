//! Maps each provider to the function that builds its client.

use std::collections::HashMap;

use super::anthropic::AnthropicClient;
use super::client::{ChatModel, ClientOptions, ProviderError};
use super::google::GoogleClient;
use super::ollama::OllamaClient;
use super::openai::OpenAiCompatibleClient;
use crate::catalog::{ModelConfig, Provider};

/// Builds a boxed client for a catalog model.
pub type ClientFactory =
    fn(&'static ModelConfig, ClientOptions) -> Result<Box<dyn ChatModel>, ProviderError>;

/// Provider to client factory lookup, consulted once per tagger build.
#[derive(Clone)]
pub struct ProviderRegistry {
    factories: HashMap<Provider, ClientFactory>,
}

impl ProviderRegistry {
    /// An empty registry. Every `create` fails until factories are registered.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// The registry with a factory for every supported provider.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Provider::OpenAi, openai_compatible);
        registry.register(Provider::MistralAi, openai_compatible);
        registry.register(Provider::Groq, openai_compatible);
        registry.register(Provider::Anthropic, anthropic);
        registry.register(Provider::GoogleGenai, google);
        registry.register(Provider::Ollama, ollama);
        registry
    }

    /// Registers (or replaces) the factory for a provider.
    pub fn register(&mut self, provider: Provider, factory: ClientFactory) -> &mut Self {
        self.factories.insert(provider, factory);
        self
    }

    pub fn supports(&self, provider: Provider) -> bool {
        self.factories.contains_key(&provider)
    }

    /// Creates a client for `model` with the resolved options.
    pub fn create(
        &self,
        model: &'static ModelConfig,
        options: ClientOptions,
    ) -> Result<Box<dyn ChatModel>, ProviderError> {
        let factory = self
            .factories
            .get(&model.provider)
            .ok_or_else(|| ProviderError::Unsupported(model.provider.id().to_string()))?;
        factory(model, options)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn openai_compatible(
    model: &'static ModelConfig,
    options: ClientOptions,
) -> Result<Box<dyn ChatModel>, ProviderError> {
    Ok(Box::new(OpenAiCompatibleClient::new(model, &options)?))
}

fn anthropic(
    model: &'static ModelConfig,
    options: ClientOptions,
) -> Result<Box<dyn ChatModel>, ProviderError> {
    Ok(Box::new(AnthropicClient::new(model, &options)?))
}

fn google(
    model: &'static ModelConfig,
    options: ClientOptions,
) -> Result<Box<dyn ChatModel>, ProviderError> {
    Ok(Box::new(GoogleClient::new(model, &options)?))
}

fn ollama(
    model: &'static ModelConfig,
    options: ClientOptions,
) -> Result<Box<dyn ChatModel>, ProviderError> {
    Ok(Box::new(OllamaClient::new(model, &options)?))
}
