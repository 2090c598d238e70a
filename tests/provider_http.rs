//! Wire-level checks for each provider client against a mock server.

use aitagger::error::{FailureContext, classify};
use aitagger::prompt::PromptBuilder;
use aitagger::provider::{
    AnthropicClient, ChatModel, ClientOptions, GoogleClient, OllamaClient, OpenAiCompatibleClient,
    ProviderError,
};
use aitagger::{ErrorKind, ModelCatalog, Provider};
use anyhow::Result;
use mockito::{Matcher, Server};
use serde_json::json;

fn options(key: Option<&str>, server: &mockito::ServerGuard) -> ClientOptions {
    ClientOptions::new(key.map(String::from), Some(server.url()))
}

#[test]
fn test_mistral_uses_any_tool_choice_and_bearer_auth() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer mistral-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "mistral-small-latest",
            "tool_choice": "any"
        })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{ "message": { "tool_calls": [{ "function": {
                    "name": "document_tagger",
                    "arguments": "{\"tags\":[\"#api\"],\"newTags\":[\"#rest\"]}"
                } }] } }]
            })
            .to_string(),
        )
        .create();

    let model = ModelCatalog::lookup("mistral-small-latest")?;
    let client = OpenAiCompatibleClient::new(model, &options(Some("mistral-key"), &server))?;
    let conversation = PromptBuilder::new().build("- #api", "An HTTP API design note");

    let result = client.generate(&conversation)?;

    mock.assert();
    assert_eq!(result.tags, vec!["#api"]);
    assert_eq!(result.new_tags, vec!["#rest"]);
    Ok(())
}

#[test]
fn test_anthropic_sends_version_header_and_reads_tool_use() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "ant-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-5-haiku-latest",
            "tool_choice": { "type": "tool", "name": "document_tagger" }
        })))
        .with_status(200)
        .with_body(
            json!({
                "content": [{ "type": "tool_use", "id": "t", "name": "document_tagger",
                              "input": { "tags": [], "newTags": ["#poetry"] } }]
            })
            .to_string(),
        )
        .create();

    let model = ModelCatalog::lookup("claude-3-5-haiku-latest")?;
    let client = AnthropicClient::new(model, &options(Some("ant-key"), &server))?;

    let result = client.generate(&PromptBuilder::new().build("", "A sonnet"))?;

    mock.assert();
    assert!(result.tags.is_empty());
    assert_eq!(result.new_tags, vec!["#poetry"]);
    Ok(())
}

#[test]
fn test_google_posts_to_model_endpoint() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-pro:generateContent")
        .match_header("x-goog-api-key", "goog-key")
        .match_body(Matcher::PartialJson(json!({
            "toolConfig": { "functionCallingConfig": { "mode": "ANY" } }
        })))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{ "content": { "parts": [{ "functionCall": {
                    "name": "document_tagger",
                    "args": { "tags": ["#travel"], "newTags": ["#japan"] }
                } }] } }]
            })
            .to_string(),
        )
        .create();

    let model = ModelCatalog::lookup("gemini-1.5-pro")?;
    let client = GoogleClient::new(model, &options(Some("goog-key"), &server))?;

    let result = client.generate(&PromptBuilder::new().build("- #travel", "Kyoto itinerary"))?;

    mock.assert();
    assert_eq!(result.tags, vec!["#travel"]);
    assert_eq!(result.new_tags, vec!["#japan"]);
    Ok(())
}

#[test]
fn test_ollama_parses_json_content_without_key() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({ "model": "qwen2.5", "stream": false })))
        .with_status(200)
        .with_body(
            json!({
                "message": {
                    "role": "assistant",
                    "content": "Sure! {\"tags\": [\"#rust\"], \"newTags\": [\"#ownership\"]}"
                },
                "done": true
            })
            .to_string(),
        )
        .create();

    let model = ModelCatalog::lookup("qwen2.5")?;
    let client = OllamaClient::new(model, &options(None, &server))?;

    let result = client.generate(&PromptBuilder::new().build("- #rust", "Borrow checker notes"))?;

    mock.assert();
    assert_eq!(result.tags, vec!["#rust"]);
    assert_eq!(result.new_tags, vec!["#ownership"]);
    Ok(())
}

#[test]
fn test_ollama_missing_model_is_classified_as_unavailable() -> Result<()> {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error":"model \"llama3.2\" not found, try pulling it first"}"#)
        .create();

    let model = ModelCatalog::lookup("llama3.2")?;
    let client = OllamaClient::new(model, &options(None, &server))?;

    let err = client
        .generate(&PromptBuilder::new().build("", "doc"))
        .unwrap_err();

    assert!(matches!(err, ProviderError::Api { status: 404, .. }));
    let context = FailureContext::new(Provider::Ollama, None);
    assert_eq!(classify(&err, &context), ErrorKind::OllamaUnavailable);
    Ok(())
}

#[test]
fn test_unreachable_custom_base_url_is_distinguished() -> Result<()> {
    // Nothing listens on port 9 locally.
    let url = "http://127.0.0.1:9";
    let model = ModelCatalog::lookup("gpt-4o")?;
    let client = OpenAiCompatibleClient::new(
        model,
        &ClientOptions::new(Some("sk-key".into()), Some(url.into())),
    )?;

    let err = client
        .generate(&PromptBuilder::new().build("", "doc"))
        .unwrap_err();

    assert!(err.is_transport());
    let context = FailureContext::new(Provider::OpenAi, Some(url.into()));
    assert_eq!(classify(&err, &context), ErrorKind::CustomBaseUrlUnreachable);
    Ok(())
}

#[test]
fn test_response_without_tool_call_is_malformed() -> Result<()> {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(json!({ "content": [{ "type": "text", "text": "I refuse." }] }).to_string())
        .create();

    let model = ModelCatalog::lookup("claude-3-opus-latest")?;
    let client = AnthropicClient::new(model, &options(Some("k"), &server))?;

    let err = client
        .generate(&PromptBuilder::new().build("", "doc"))
        .unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
    Ok(())
}
