//! Anthropic Messages API.

use serde_json::{Value, json};

use super::client::{
    ChatModel, ClientOptions, ProviderError, TEMPERATURE, http_client, parse_endpoint, send_json,
};
use super::schema::{GenerationResult, TOOL_DESCRIPTION, TOOL_NAME, tool_parameters};
use crate::catalog::ModelConfig;
use crate::prompt::{Conversation, Role};

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Client for `POST {base}/v1/messages` with a forced `tool_use` block.
pub struct AnthropicClient {
    http: reqwest::blocking::Client,
    endpoint: reqwest::Url,
    api_key: String,
    model_id: String,
}

impl AnthropicClient {
    pub fn new(model: &ModelConfig, options: &ClientOptions) -> Result<Self, ProviderError> {
        let base = options.base_url_or(model.provider.default_base_url());
        Ok(Self {
            http: http_client()?,
            endpoint: parse_endpoint(&format!("{base}/v1/messages"))?,
            api_key: options.require_api_key()?,
            model_id: model.model_id.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Builds the request body; the system instruction is a top-level field.
    pub fn request_body(&self, conversation: &Conversation) -> Value {
        let messages: Vec<Value> = conversation
            .turns()
            .map(|m| {
                let role = if m.role == Role::Assistant { "assistant" } else { "user" };
                json!({ "role": role, "content": m.content })
            })
            .collect();

        json!({
            "model": self.model_id,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "system": conversation.system().unwrap_or_default(),
            "messages": messages,
            "tools": [{
                "name": TOOL_NAME,
                "description": TOOL_DESCRIPTION,
                "input_schema": tool_parameters(),
            }],
            "tool_choice": { "type": "tool", "name": TOOL_NAME },
        })
    }
}

impl ChatModel for AnthropicClient {
    fn generate(&self, conversation: &Conversation) -> Result<GenerationResult, ProviderError> {
        let request = self
            .http
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(conversation));

        let response = send_json(request)?;
        parse_response(&response)
    }
}

/// Reads the `input` of the first `tool_use` content block.
fn parse_response(response: &Value) -> Result<GenerationResult, ProviderError> {
    let input = response
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b.get("type").and_then(Value::as_str) == Some("tool_use"))
        })
        .and_then(|block| block.get("input"))
        .ok_or_else(|| ProviderError::MalformedResponse("no tool_use block in response".to_string()))?;

    GenerationResult::from_arguments(input)
}
