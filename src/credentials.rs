//! API key lookup and format validation.
//!
//! Keys come from settings first, then from the provider's environment
//! variable. A malformed or missing key stops tagging before any request.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Provider;
use crate::error::ConfigError;
use crate::settings::Settings;

static KEY_PATTERNS: LazyLock<HashMap<Provider, Regex>> = LazyLock::new(|| {
    [
        (Provider::OpenAi, r"^sk-[A-Za-z0-9_-]{20,}$"),
        (Provider::Anthropic, r"^sk-ant-[A-Za-z0-9_-]{20,}$"),
        (Provider::Groq, r"^gsk_[A-Za-z0-9]{52}$"),
        (Provider::GoogleGenai, r"^AIza[A-Za-z0-9_-]{35}$"),
        (Provider::MistralAi, r"^[A-Za-z0-9]{32}$"),
    ]
    .into_iter()
    .map(|(provider, pattern)| (provider, Regex::new(pattern).expect("key pattern is valid")))
    .collect()
});

/// Returns the key for `provider`, trimmed, or `None` if neither settings
/// nor the environment carry one.
pub fn resolve_key(settings: &Settings, provider: Provider) -> Option<String> {
    let from_settings = settings.api_key(provider).trim();
    if !from_settings.is_empty() {
        return Some(from_settings.to_string());
    }

    let var = provider.env_var();
    std::env::var(var)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .inspect(|_| tracing::debug!(provider = %provider, var, "using API key from environment"))
}

/// Checks `key` against the provider's pattern. Providers without a pattern
/// accept anything.
pub fn validate_format(key: &str, provider: Provider) -> bool {
    KEY_PATTERNS
        .get(&provider)
        .is_none_or(|pattern| pattern.is_match(key))
}

/// The fail-fast credential gate.
///
/// Local providers skip validation and return whatever optional key is set.
pub fn ensure_credentials(
    settings: &Settings,
    provider: Provider,
) -> Result<Option<String>, ConfigError> {
    let key = resolve_key(settings, provider);
    if provider.is_local() {
        return Ok(key);
    }

    let company = provider.company();
    let key = key.ok_or(ConfigError::MissingApiKey { company })?;
    if !validate_format(&key, provider) {
        return Err(ConfigError::MalformedApiKey { company });
    }
    Ok(Some(key))
}
