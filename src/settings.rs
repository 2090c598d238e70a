//! User settings, persisted as a flat camelCase JSON object.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_MODEL_ID, Provider};
use crate::error::{ConfigError, TaggerError};
use crate::utils::ensure_parent_directory;

/// Everything the user can configure.
///
/// Missing fields take their defaults so older files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub openai_api_key: String,
    pub mistralai_api_key: String,
    pub anthropic_api_key: String,
    pub groq_api_key: String,
    pub google_genai_api_key: String,
    pub ollama_api_key: String,
    pub model: String,
    pub use_custom_base_url: bool,
    pub custom_base_url: String,
    pub lower_case_mode: bool,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            mistralai_api_key: String::new(),
            anthropic_api_key: String::new(),
            groq_api_key: String::new(),
            google_genai_api_key: String::new(),
            ollama_api_key: String::new(),
            model: DEFAULT_MODEL_ID.to_string(),
            use_custom_base_url: false,
            custom_base_url: String::new(),
            lower_case_mode: false,
            language: String::new(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`.
    pub fn load(path: &Path) -> Result<Self, TaggerError> {
        let text = std::fs::read_to_string(path).map_err(|e| TaggerError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| TaggerError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads settings from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, TaggerError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TaggerError> {
        ensure_parent_directory(path).map_err(|e| TaggerError::io(path, e))?;
        let json = serde_json::to_string_pretty(self).map_err(|source| TaggerError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| TaggerError::io(path, e))
    }

    /// Returns the model id to use; a blank setting means the default model.
    pub fn model_id(&self) -> &str {
        match self.model.trim() {
            "" => DEFAULT_MODEL_ID,
            id => id,
        }
    }

    /// Returns the stored key for `provider`, untrimmed.
    pub fn api_key(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai_api_key,
            Provider::MistralAi => &self.mistralai_api_key,
            Provider::Anthropic => &self.anthropic_api_key,
            Provider::Groq => &self.groq_api_key,
            Provider::GoogleGenai => &self.google_genai_api_key,
            Provider::Ollama => &self.ollama_api_key,
        }
    }

    pub fn set_api_key(&mut self, provider: Provider, key: impl Into<String>) {
        let slot = match provider {
            Provider::OpenAi => &mut self.openai_api_key,
            Provider::MistralAi => &mut self.mistralai_api_key,
            Provider::Anthropic => &mut self.anthropic_api_key,
            Provider::Groq => &mut self.groq_api_key,
            Provider::GoogleGenai => &mut self.google_genai_api_key,
            Provider::Ollama => &mut self.ollama_api_key,
        };
        *slot = key.into();
    }

    /// Output language for new tags, `None` when unset.
    pub fn language(&self) -> Option<&str> {
        Some(self.language.trim()).filter(|l| !l.is_empty())
    }

    /// Returns the custom endpoint when the toggle is on.
    ///
    /// A toggled-on but blank URL is `MissingBaseUrl`; one that does not
    /// parse is `InvalidBaseUrl`.
    pub fn base_url_override(&self) -> Result<Option<String>, ConfigError> {
        if !self.use_custom_base_url {
            return Ok(None);
        }

        let url = self.custom_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Some(url.to_string())),
            _ => Err(ConfigError::InvalidBaseUrl(url.to_string())),
        }
    }
}
