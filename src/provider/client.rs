/// Shared pieces of the provider clients: the error type, the `ChatModel`
/// seam, and the blocking HTTP plumbing every provider goes through.
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::schema::GenerationResult;
use crate::prompt::Conversation;

/// Overall request timeout. Requests are never retried.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sampling temperature; tagging should be deterministic.
pub const TEMPERATURE: f64 = 0.0;

/// Errors that can occur when calling a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status with the provider's error text
    #[error("HTTP error: status {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response parsed but did not carry the forced tool call
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The provider needs a key and none was supplied
    #[error("Incorrect API key: no API key configured")]
    MissingApiKey,

    /// No client factory is registered for the provider
    #[error("Unsupported provider: {0}")]
    Unsupported(String),
}

impl ProviderError {
    /// Returns `true` when the request never got an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProviderError::Network(_) | ProviderError::Timeout(_))
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(error)
        } else {
            ProviderError::Network(error)
        }
    }
}

/// A chat model that answers a tagging conversation with a typed result.
///
/// Implemented once per wire protocol; tests substitute mocks.
pub trait ChatModel: Send + Sync {
    /// Sends the conversation as a single request and parses the forced
    /// `document_tagger` tool call.
    fn generate(&self, conversation: &Conversation) -> Result<GenerationResult, ProviderError>;
}

/// Options resolved from settings when a client is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub api_key: Option<String>,
    /// Replaces the provider's default endpoint when set.
    pub base_url: Option<String>,
}

impl ClientOptions {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self { api_key, base_url }
    }

    /// Returns the endpoint to use, without a trailing slash.
    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
    }

    pub(crate) fn require_api_key(&self) -> Result<String, ProviderError> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingApiKey)
    }
}

/// Builds the blocking HTTP client shared by all providers.
pub(crate) fn http_client() -> Result<reqwest::blocking::Client, ProviderError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(Duration::from_secs(5))
        .build()
        .map_err(ProviderError::Network)
}

/// Validates an endpoint URL before any request is built.
pub(crate) fn parse_endpoint(url: &str) -> Result<reqwest::Url, ProviderError> {
    reqwest::Url::parse(url).map_err(|e| ProviderError::InvalidUrl(format!("{url}: {e}")))
}

/// Sends a prepared request and returns the JSON body of a successful response.
///
/// Non-success statuses become `ProviderError::Api` carrying the provider's
/// own error message so it can be classified.
pub(crate) fn send_json(request: reqwest::blocking::RequestBuilder) -> Result<Value, ProviderError> {
    let response = request.send().map_err(ProviderError::from_reqwest)?;

    let status = response.status();
    let body = response.text().map_err(ProviderError::from_reqwest)?;

    if !status.is_success() {
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(ProviderError::Serialization)
}

/// Extracts a readable message from a provider error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; anything else is returned as-is.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    let message = json
        .pointer("/error/message")
        .or_else(|| json.get("error").filter(|e| e.is_string()))
        .or_else(|| json.get("message"))
        .or_else(|| json.get("detail"))
        .and_then(Value::as_str);

    match message {
        Some(m) => m.to_string(),
        None => body.trim().to_string(),
    }
}
