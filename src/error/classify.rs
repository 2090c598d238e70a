use crate::catalog::Provider;
use crate::provider::ProviderError;

/// Classified provider failure. Each kind maps to exactly one notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IncorrectApiKey,
    RateLimited,
    QuotaExceeded,
    ServerError,
    ServerOverloaded,
    DocumentTooLong,
    InvalidBaseUrl,
    CustomBaseUrlUnreachable,
    CustomBaseUrlUnsupported,
    ConnectionFailed,
    OllamaUnavailable,
    Unclassified,
}

impl ErrorKind {
    /// Returns the fixed notice for this kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::IncorrectApiKey => "Incorrect API key. Please check your API key.",
            ErrorKind::RateLimited => {
                "You are sending requests too quickly. Please pace your requests or read your provider's rate limit guide."
            }
            ErrorKind::QuotaExceeded => {
                "You have run out of credits or hit your maximum monthly spend."
            }
            ErrorKind::ServerError => {
                "Issue on the provider's servers. Please retry your request after a brief wait."
            }
            ErrorKind::ServerOverloaded => {
                "The provider's servers are experiencing high traffic. Please retry your requests after a brief wait."
            }
            ErrorKind::DocumentTooLong => {
                "Your document is too long. Please reduce the length of your document."
            }
            ErrorKind::InvalidBaseUrl => {
                "Invalid custom base URL provided. Please check your custom base URL."
            }
            ErrorKind::CustomBaseUrlUnreachable => {
                "Could not connect to custom base URL provided. Please check your custom base URL."
            }
            ErrorKind::CustomBaseUrlUnsupported => {
                "Base URL is set, remove it if not using a proxy or service emulator."
            }
            ErrorKind::ConnectionFailed => {
                "Could not reach the provider. Please check your connection and try again."
            }
            ErrorKind::OllamaUnavailable => "Check if Ollama is running and model is installed.",
            ErrorKind::Unclassified => "Error while generating tags.",
        }
    }
}

/// Provider error text fragments and the kind they indicate.
///
/// Matched case-insensitively, first hit wins. Only consulted when the HTTP
/// status alone does not decide the kind.
pub const MESSAGE_TABLE: &[(&str, ErrorKind)] = &[
    ("Incorrect API key", ErrorKind::IncorrectApiKey),
    ("Invalid API key", ErrorKind::IncorrectApiKey),
    ("invalid x-api-key", ErrorKind::IncorrectApiKey),
    ("API key not valid", ErrorKind::IncorrectApiKey),
    ("Rate limit reached", ErrorKind::RateLimited),
    ("You exceeded your current quota", ErrorKind::QuotaExceeded),
    (
        "The server had an error while processing your request",
        ErrorKind::ServerError,
    ),
    (
        "The engine is currently overloaded",
        ErrorKind::ServerOverloaded,
    ),
    ("Please reduce the length", ErrorKind::DocumentTooLong),
    ("maximum context length", ErrorKind::DocumentTooLong),
    ("prompt is too long", ErrorKind::DocumentTooLong),
    ("Invalid URL", ErrorKind::InvalidBaseUrl),
];

/// What was being called when a provider failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureContext {
    pub provider: Provider,
    /// Set when the user replaced the provider's default endpoint.
    pub custom_base_url: Option<String>,
}

impl FailureContext {
    pub fn new(provider: Provider, custom_base_url: Option<String>) -> Self {
        Self {
            provider,
            custom_base_url,
        }
    }
}

/// Maps a provider failure onto the fixed taxonomy.
///
/// Structured signals (HTTP status, transport vs. protocol failure) are
/// checked first, then [`MESSAGE_TABLE`], then context rules.
pub fn classify(error: &ProviderError, context: &FailureContext) -> ErrorKind {
    if let Some(kind) = classify_structured(error, context.provider) {
        return kind;
    }

    if let Some(kind) = classify_message(&error.to_string()) {
        return kind;
    }

    if context.provider == Provider::Ollama {
        return ErrorKind::OllamaUnavailable;
    }

    match error {
        ProviderError::Api { status: 429, .. } => return ErrorKind::RateLimited,
        _ if context.custom_base_url.is_some() => {
            return if error.is_transport() {
                ErrorKind::CustomBaseUrlUnreachable
            } else {
                ErrorKind::CustomBaseUrlUnsupported
            };
        }
        ProviderError::Api { status, .. } if (500..600).contains(status) => {
            return ErrorKind::ServerError;
        }
        _ => {}
    }

    if error.is_transport() {
        ErrorKind::ConnectionFailed
    } else {
        ErrorKind::Unclassified
    }
}

fn classify_structured(error: &ProviderError, provider: Provider) -> Option<ErrorKind> {
    match error {
        ProviderError::InvalidUrl(_) => Some(ErrorKind::InvalidBaseUrl),
        ProviderError::MissingApiKey => Some(ErrorKind::IncorrectApiKey),
        ProviderError::Api { status, .. } => match status {
            401 | 403 => Some(ErrorKind::IncorrectApiKey),
            422 if provider == Provider::MistralAi => Some(ErrorKind::IncorrectApiKey),
            413 => Some(ErrorKind::DocumentTooLong),
            529 => Some(ErrorKind::ServerOverloaded),
            _ => None,
        },
        _ => None,
    }
}

fn classify_message(text: &str) -> Option<ErrorKind> {
    let text = text.to_lowercase();
    MESSAGE_TABLE
        .iter()
        .find(|(fragment, _)| text.contains(&fragment.to_lowercase()))
        .map(|&(_, kind)| kind)
}
