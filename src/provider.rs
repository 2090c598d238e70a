//! LLM provider clients.
//!
//! Each supported wire protocol implements [`ChatModel`]; the
//! [`ProviderRegistry`] picks the right one for a catalog model.

mod anthropic;
mod client;
mod google;
mod ollama;
mod openai;
mod registry;
mod schema;

pub use anthropic::AnthropicClient;
pub use client::{ChatModel, ClientOptions, ProviderError, REQUEST_TIMEOUT, TEMPERATURE};
pub use google::GoogleClient;
pub use ollama::OllamaClient;
pub use openai::{OpenAiCompatibleClient, ToolChoice};
pub use registry::{ClientFactory, ProviderRegistry};
pub use schema::{GenerationResult, TOOL_NAME};
