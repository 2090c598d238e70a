//! Static table of supported models.
//!
//! The catalog is loaded once and never mutated; lookups are by model
//! identifier, which is unique across the table.

mod model_config;

pub use model_config::{ModelConfig, Provider, SourceType};

use crate::error::ConfigError;

/// Model used when the settings do not name one.
pub const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";

static MODEL_CONFIGS: &[ModelConfig] = &[
    ModelConfig {
        provider: Provider::OpenAi,
        display_name: "GPT-4o mini",
        model_id: "gpt-4o-mini",
        token_limit: 128_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::OpenAi,
        display_name: "GPT-4o",
        model_id: "gpt-4o",
        token_limit: 128_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::MistralAi,
        display_name: "Mistral Small",
        model_id: "mistral-small-latest",
        token_limit: 32_768,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::MistralAi,
        display_name: "Mistral Large",
        model_id: "mistral-large-latest",
        token_limit: 128_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::MistralAi,
        display_name: "Mistral Nemo",
        model_id: "open-mistral-nemo",
        token_limit: 128_000,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Anthropic,
        display_name: "Claude 3.5 Haiku",
        model_id: "claude-3-5-haiku-latest",
        token_limit: 200_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Anthropic,
        display_name: "Claude 3.5 Sonnet",
        model_id: "claude-3-5-sonnet-latest",
        token_limit: 200_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Anthropic,
        display_name: "Claude 3 Opus",
        model_id: "claude-3-opus-latest",
        token_limit: 200_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Groq,
        display_name: "Llama 3 Groq 8B",
        model_id: "llama3-groq-8b-8192-tool-use-preview",
        token_limit: 8_192,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Groq,
        display_name: "Llama 3 Groq 70B",
        model_id: "llama3-groq-70b-8192-tool-use-preview",
        token_limit: 8_192,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Groq,
        display_name: "Llama 3.1 8B",
        model_id: "llama-3.1-8b-instant",
        token_limit: 128_000,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Groq,
        display_name: "Llama 3.1 70B",
        model_id: "llama-3.1-70b-versatile",
        token_limit: 128_000,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::GoogleGenai,
        display_name: "Gemini 1.5 Flash",
        model_id: "gemini-1.5-flash",
        token_limit: 1_000_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::GoogleGenai,
        display_name: "Gemini 1.5 Flash-8B",
        model_id: "gemini-1.5-flash-8b",
        token_limit: 1_000_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::GoogleGenai,
        display_name: "Gemini 1.5 Pro",
        model_id: "gemini-1.5-pro",
        token_limit: 1_000_000,
        source_type: SourceType::ClosedSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Ollama,
        display_name: "Llama 3.2",
        model_id: "llama3.2",
        token_limit: 128_000,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Ollama,
        display_name: "Mistral Nemo",
        model_id: "mistral-nemo",
        token_limit: 128_000,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
    ModelConfig {
        provider: Provider::Ollama,
        display_name: "Qwen 2.5",
        model_id: "qwen2.5",
        token_limit: 128_000,
        source_type: SourceType::OpenSource,
        supports_tool_calling: true,
    },
];

/// Read-only access to the supported models.
pub struct ModelCatalog;

impl ModelCatalog {
    /// Returns every supported model.
    pub fn all() -> &'static [ModelConfig] {
        MODEL_CONFIGS
    }

    /// Returns the models served by a provider, in catalog order.
    pub fn by_provider(provider: Provider) -> impl Iterator<Item = &'static ModelConfig> {
        MODEL_CONFIGS.iter().filter(move |m| m.provider == provider)
    }

    /// Looks up a model by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ModelNotFound` when the identifier is not in the catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use aitagger::{ModelCatalog, Provider};
    ///
    /// let model = ModelCatalog::lookup("gpt-4o").unwrap();
    /// assert_eq!(model.provider, Provider::OpenAi);
    /// assert!(ModelCatalog::lookup("gpt-2").is_err());
    /// ```
    pub fn lookup(model_id: &str) -> Result<&'static ModelConfig, ConfigError> {
        MODEL_CONFIGS
            .iter()
            .find(|m| m.model_id == model_id)
            .ok_or_else(|| ConfigError::ModelNotFound(model_id.to_string()))
    }
}
