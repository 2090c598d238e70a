//! Google Gemini `generateContent` with forced function calling.

use serde_json::{Value, json};

use super::client::{
    ChatModel, ClientOptions, ProviderError, TEMPERATURE, http_client, parse_endpoint, send_json,
};
use super::schema::{GenerationResult, TOOL_DESCRIPTION, TOOL_NAME, tool_parameters};
use crate::catalog::ModelConfig;
use crate::prompt::{Conversation, Role};

/// Client for Gemini `generateContent`; the key travels in `x-goog-api-key`.
pub struct GoogleClient {
    http: reqwest::blocking::Client,
    endpoint: reqwest::Url,
    api_key: String,
}

impl GoogleClient {
    pub fn new(model: &ModelConfig, options: &ClientOptions) -> Result<Self, ProviderError> {
        let base = options.base_url_or(model.provider.default_base_url());
        Ok(Self {
            http: http_client()?,
            endpoint: parse_endpoint(&format!(
                "{base}/v1beta/models/{}:generateContent",
                model.model_id
            ))?,
            api_key: options.require_api_key()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn request_body(&self, conversation: &Conversation) -> Value {
        let contents: Vec<Value> = conversation
            .turns()
            .map(|m| {
                let role = if m.role == Role::Assistant { "model" } else { "user" };
                json!({ "role": role, "parts": [{ "text": m.content }] })
            })
            .collect();

        json!({
            "systemInstruction": { "parts": [{ "text": conversation.system().unwrap_or_default() }] },
            "contents": contents,
            "tools": [{
                "functionDeclarations": [{
                    "name": TOOL_NAME,
                    "description": TOOL_DESCRIPTION,
                    "parameters": tool_parameters(),
                }]
            }],
            "toolConfig": {
                "functionCallingConfig": {
                    "mode": "ANY",
                    "allowedFunctionNames": [TOOL_NAME],
                }
            },
            "generationConfig": { "temperature": TEMPERATURE },
        })
    }
}

impl ChatModel for GoogleClient {
    fn generate(&self, conversation: &Conversation) -> Result<GenerationResult, ProviderError> {
        let request = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(conversation));

        let response = send_json(request)?;
        parse_response(&response)
    }
}

/// Reads `candidates[0].content.parts[*].functionCall.args`.
fn parse_response(response: &Value) -> Result<GenerationResult, ProviderError> {
    let args = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .and_then(|parts| parts.iter().find_map(|p| p.pointer("/functionCall/args")))
        .ok_or_else(|| ProviderError::MalformedResponse("no functionCall in response".to_string()))?;

    GenerationResult::from_arguments(args)
}
