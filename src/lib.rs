//! Tag Markdown notes with a large language model.
//!
//! The flow for one document: check credentials, gather the vault's existing
//! tags, build a few-shot prompt, force the model to answer with
//! `{tags, newTags}`, drop anything the document already has and append the
//! rest to its front matter.

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod host;
pub mod prompt;
pub mod provider;
pub mod service;
pub mod settings;
pub mod tagger;
pub mod tags;
pub mod utils;

pub use catalog::{DEFAULT_MODEL_ID, ModelCatalog, ModelConfig, Provider, SourceType};
pub use error::{ConfigError, ErrorKind, TaggerError};
pub use host::{DocumentHost, FrontMatter, FsVault};
pub use provider::{ChatModel, GenerationResult, ProviderError, ProviderRegistry};
pub use service::{FolderReport, TaggingService};
pub use settings::Settings;
pub use tagger::{Tagger, TaggerHandle, TaggerState};
