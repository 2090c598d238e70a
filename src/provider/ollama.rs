//! Ollama chat API with a JSON-schema constrained reply.

use serde_json::{Value, json};

use super::client::{
    ChatModel, ClientOptions, ProviderError, TEMPERATURE, http_client, parse_endpoint, send_json,
};
use super::schema::{GenerationResult, tool_parameters};
use crate::catalog::ModelConfig;
use crate::prompt::{Conversation, Role};

/// Client for a local (or proxied) Ollama server.
///
/// Ollama cannot force a tool call, so the reply is constrained with the
/// `format` schema instead; the key is optional and only sent when set.
pub struct OllamaClient {
    http: reqwest::blocking::Client,
    endpoint: reqwest::Url,
    api_key: Option<String>,
    model_id: String,
}

impl OllamaClient {
    pub fn new(model: &ModelConfig, options: &ClientOptions) -> Result<Self, ProviderError> {
        let base = options.base_url_or(model.provider.default_base_url());
        Ok(Self {
            http: http_client()?,
            endpoint: parse_endpoint(&format!("{base}/api/chat"))?,
            api_key: options.api_key.clone().filter(|k| !k.is_empty()),
            model_id: model.model_id.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn request_body(&self, conversation: &Conversation) -> Value {
        let messages: Vec<Value> = conversation
            .messages()
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                json!({ "role": role, "content": m.content })
            })
            .collect();

        json!({
            "model": self.model_id,
            "messages": messages,
            "stream": false,
            "format": tool_parameters(),
            "options": { "temperature": TEMPERATURE },
        })
    }
}

impl ChatModel for OllamaClient {
    fn generate(&self, conversation: &Conversation) -> Result<GenerationResult, ProviderError> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .json(&self.request_body(conversation));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = send_json(request)?;
        let content = response
            .pointer("/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::MalformedResponse("missing message content".to_string()))?;

        GenerationResult::from_text(content)
    }
}
