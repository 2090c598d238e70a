//! Error types surfaced to the user.
//!
//! Every failure ends up as one fixed, human readable notice. Configuration
//! problems are caught before any network call; provider failures are
//! classified into an [`ErrorKind`] first.

mod classify;

use std::path::PathBuf;

use thiserror::Error;

pub use classify::{ErrorKind, FailureContext, MESSAGE_TABLE, classify};

use crate::provider::ProviderError;

/// Problems with the user's settings, detected before any request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Model {0} is not supported.")]
    ModelNotFound(String),

    #[error("Please set your {company} API key in the settings.")]
    MissingApiKey { company: &'static str },

    #[error("Your {company} API key does not look valid. Please check your API key.")]
    MalformedApiKey { company: &'static str },

    #[error("Base URL not set. Please configure in settings.")]
    MissingBaseUrl,

    #[error("Invalid custom base URL provided. Please check your custom base URL.")]
    InvalidBaseUrl(String),
}

/// Errors returned by tagging operations.
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A provider call failed; the message is the fixed text for `kind`.
    #[error("{}", kind.message())]
    Provider {
        kind: ErrorKind,
        #[source]
        source: ProviderError,
    },

    /// The soft token budget rejected the document before sending it.
    #[error("Your document is too long. Please reduce the length of your document.")]
    DocumentTooLong {
        estimated_tokens: usize,
        token_limit: usize,
    },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TaggerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaggerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the notice shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Returns the classified kind for provider failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TaggerError::Provider { kind, .. } => Some(*kind),
            TaggerError::DocumentTooLong { .. } => Some(ErrorKind::DocumentTooLong),
            _ => None,
        }
    }

    /// User errors are fixable by changing settings or input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TaggerError::Config(_) | TaggerError::DocumentTooLong { .. }
        ) || matches!(
            self.kind(),
            Some(ErrorKind::IncorrectApiKey | ErrorKind::InvalidBaseUrl)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_render_fixed_messages() {
        assert_eq!(
            ConfigError::MissingApiKey { company: "OpenAI" }.to_string(),
            "Please set your OpenAI API key in the settings."
        );
        assert_eq!(
            ConfigError::ModelNotFound("gpt-2".into()).to_string(),
            "Model gpt-2 is not supported."
        );
    }

    #[test]
    fn provider_error_message_comes_from_kind_not_source() {
        let err = TaggerError::Provider {
            kind: ErrorKind::RateLimited,
            source: ProviderError::Api {
                status: 429,
                message: "Rate limit reached for requests on org-123".into(),
            },
        };
        assert_eq!(err.user_message(), ErrorKind::RateLimited.message());
        assert!(!err.user_message().contains("org-123"));
    }

    #[test]
    fn document_too_long_is_a_user_error() {
        let err = TaggerError::DocumentTooLong {
            estimated_tokens: 10_000,
            token_limit: 8_192,
        };
        assert!(err.is_user_error());
        assert_eq!(err.kind(), Some(ErrorKind::DocumentTooLong));
    }

    #[test]
    fn config_error_converts_into_tagger_error() {
        let err: TaggerError = ConfigError::MissingBaseUrl.into();
        assert!(err.is_user_error());
        assert_eq!(
            err.user_message(),
            "Base URL not set. Please configure in settings."
        );
    }
}
