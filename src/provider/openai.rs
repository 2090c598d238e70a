//! OpenAI-compatible chat completions, also spoken by Mistral AI and Groq.

use serde_json::{Value, json};

use super::client::{
    ChatModel, ClientOptions, ProviderError, TEMPERATURE, http_client, parse_endpoint, send_json,
};
use super::schema::{GenerationResult, TOOL_DESCRIPTION, TOOL_NAME, tool_parameters};
use crate::catalog::{ModelConfig, Provider};
use crate::prompt::{Conversation, Role};

/// How the client forces the tagging tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoice {
    /// `{"type": "function", "function": {"name": ..}}`
    Named,
    /// `"any"`: Mistral only accepts `auto`, `none` or `any`.
    Any,
}

/// Client for `POST {base}/chat/completions`.
pub struct OpenAiCompatibleClient {
    http: reqwest::blocking::Client,
    endpoint: reqwest::Url,
    api_key: String,
    model_id: String,
    tool_choice: ToolChoice,
}

impl OpenAiCompatibleClient {
    /// Builds a client for an OpenAI, Mistral AI or Groq model.
    pub fn new(model: &ModelConfig, options: &ClientOptions) -> Result<Self, ProviderError> {
        let base = options.base_url_or(model.provider.default_base_url());
        let endpoint = parse_endpoint(&format!("{base}/chat/completions"))?;
        let tool_choice = match model.provider {
            Provider::MistralAi => ToolChoice::Any,
            _ => ToolChoice::Named,
        };

        Ok(Self {
            http: http_client()?,
            endpoint,
            api_key: options.require_api_key()?,
            model_id: model.model_id.to_string(),
            tool_choice,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Builds the request body for a conversation.
    pub fn request_body(&self, conversation: &Conversation) -> Value {
        let messages: Vec<Value> = conversation
            .messages()
            .iter()
            .map(|m| json!({ "role": role_name(m.role), "content": m.content }))
            .collect();

        let tool_choice = match self.tool_choice {
            ToolChoice::Named => json!({ "type": "function", "function": { "name": TOOL_NAME } }),
            ToolChoice::Any => json!("any"),
        };

        json!({
            "model": self.model_id,
            "temperature": TEMPERATURE,
            "messages": messages,
            "tools": [{
                "type": "function",
                "function": {
                    "name": TOOL_NAME,
                    "description": TOOL_DESCRIPTION,
                    "parameters": tool_parameters(),
                }
            }],
            "tool_choice": tool_choice,
        })
    }
}

impl ChatModel for OpenAiCompatibleClient {
    fn generate(&self, conversation: &Conversation) -> Result<GenerationResult, ProviderError> {
        let request = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(conversation));

        let response = send_json(request)?;
        parse_response(&response)
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Reads `choices[0].message.tool_calls[0].function.arguments`.
fn parse_response(response: &Value) -> Result<GenerationResult, ProviderError> {
    let message = response
        .pointer("/choices/0/message")
        .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".to_string()))?;

    let call = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .and_then(|calls| {
            calls
                .iter()
                .find(|c| c.pointer("/function/name").and_then(Value::as_str) == Some(TOOL_NAME))
                .or_else(|| calls.first())
        });

    match call.and_then(|c| c.pointer("/function/arguments")) {
        Some(arguments) => GenerationResult::from_arguments(arguments),
        // Some OpenAI-compatible servers ignore tool_choice and answer in text.
        None => match message.get("content").and_then(Value::as_str) {
            Some(content) => GenerationResult::from_text(content),
            None => Err(ProviderError::MalformedResponse(
                "no tool call in response".to_string(),
            )),
        },
    }
}
