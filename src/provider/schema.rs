//! The structured output every provider is forced to produce.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::client::ProviderError;

/// Name of the tool the model is forced to call.
pub const TOOL_NAME: &str = "document_tagger";

pub const TOOL_DESCRIPTION: &str = "A tool to tag documents based on the content and themes of the document. Should always be used to tag documents.";

/// Tags proposed by the model for one document.
///
/// `tags` are picked from the existing vault tags, `new_tags` are invented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "newTags", alias = "new_tags")]
    pub new_tags: Vec<String>,
}

impl GenerationResult {
    pub fn new(tags: Vec<String>, new_tags: Vec<String>) -> Self {
        Self { tags, new_tags }
    }

    /// Parses tool-call arguments.
    ///
    /// Providers disagree on whether arguments arrive as a JSON object or as a
    /// string containing one; both are accepted.
    pub fn from_arguments(arguments: &Value) -> Result<Self, ProviderError> {
        match arguments {
            Value::String(raw) => Self::from_text(raw),
            Value::Object(_) => {
                serde_json::from_value(arguments.clone()).map_err(ProviderError::Serialization)
            }
            other => Err(ProviderError::MalformedResponse(format!(
                "unexpected tool arguments: {other}"
            ))),
        }
    }

    /// Parses a free-text reply that should contain the JSON object,
    /// tolerating code fences and surrounding prose.
    pub fn from_text(text: &str) -> Result<Self, ProviderError> {
        let json = extract_json(text).ok_or_else(|| {
            ProviderError::MalformedResponse("no JSON object in model output".to_string())
        })?;
        serde_json::from_str(json).map_err(ProviderError::Serialization)
    }
}

/// JSON schema of the tool parameters: two string arrays.
///
/// Kept to the subset every provider accepts (no `additionalProperties`).
pub fn tool_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tags": {
                "type": "array",
                "items": { "type": "string" },
                "description": "An array of existing tags in the form \"#<existing_category>\" that best categorizes the document."
            },
            "newTags": {
                "type": "array",
                "items": { "type": "string" },
                "description": "An array of new tags in the form \"#<new_category>\" that best categorizes the document."
            }
        },
        "required": ["tags", "newTags"]
    })
}

/// Extracts the outermost JSON object from model output.
///
/// Handles clean JSON, markdown code block wrapping and explanatory text
/// before or after the object.
fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;

    (start <= end).then(|| &trimmed[start..=end])
}
