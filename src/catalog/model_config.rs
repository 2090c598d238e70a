use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// LLM providers a model can be served by.
///
/// The string form (`openai`, `mistralai`, ...) is the key used in settings,
/// e.g. `openaiApiKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "mistralai")]
    MistralAi,
    Anthropic,
    Groq,
    GoogleGenai,
    Ollama,
}

impl Provider {
    /// Every provider, in the order the settings surface lists them.
    pub const ALL: [Provider; 6] = [
        Provider::OpenAi,
        Provider::MistralAi,
        Provider::Anthropic,
        Provider::Groq,
        Provider::GoogleGenai,
        Provider::Ollama,
    ];

    /// Returns the provider identifier used in settings keys.
    pub fn id(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::MistralAi => "mistralai",
            Provider::Anthropic => "anthropic",
            Provider::Groq => "groq",
            Provider::GoogleGenai => "google-genai",
            Provider::Ollama => "ollama",
        }
    }

    /// Returns the human readable company name.
    pub fn company(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::MistralAi => "Mistral AI",
            Provider::Anthropic => "Anthropic",
            Provider::Groq => "Groq",
            Provider::GoogleGenai => "Google Gen AI",
            Provider::Ollama => "Ollama",
        }
    }

    /// Environment variable consulted when the settings hold no key.
    pub fn env_var(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::MistralAi => "MISTRAL_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::GoogleGenai => "GOOGLE_API_KEY",
            Provider::Ollama => "OLLAMA_API_KEY",
        }
    }

    /// Local providers run on the user's machine and need no API key.
    pub fn is_local(self) -> bool {
        matches!(self, Provider::Ollama)
    }

    /// Default API endpoint, used unless a custom base URL is configured.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::MistralAi => "https://api.mistral.ai/v1",
            Provider::Anthropic => "https://api.anthropic.com",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::GoogleGenai => "https://generativelanguage.googleapis.com",
            Provider::Ollama => "http://localhost:11434",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown provider: {s}"))
    }
}

/// Whether a model's weights are openly available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    OpenSource,
    ClosedSource,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::OpenSource => write!(f, "open-source"),
            SourceType::ClosedSource => write!(f, "closed-source"),
        }
    }
}

/// A supported model and the facts needed to call it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: Provider,
    pub display_name: &'static str,
    pub model_id: &'static str,
    pub token_limit: usize,
    pub source_type: SourceType,
    pub supports_tool_calling: bool,
}

impl ModelConfig {
    /// Returns the company behind the model's provider.
    pub fn company(&self) -> &'static str {
        self.provider.company()
    }

    /// Returns `true` when an estimated token count fits the model's context.
    pub fn fits(&self, estimated_tokens: usize) -> bool {
        estimated_tokens <= self.token_limit
    }
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.company(), self.display_name)
    }
}
