//! Prompt construction for tag generation.
//!
//! A conversation is a system instruction, a few worked examples (document in,
//! `{tags, newTags}` JSON out) and finally the live document. The instruction
//! fixes the response contract: 1 to 5 tags reused from the existing list,
//! 1 to 3 new ones, every tag written as `#category`.

mod examples;

use serde::{Deserialize, Serialize};
use serde_json::json;

use examples::{EXAMPLES, FewShotExample};

const SYSTEM_TEMPLATE: &str = r##"You are an expert at categorizing documents using tags. Tags are used to categorize and organize documents based on their content. The format of a tag is a pound sign followed by the category "#<category>", for example "#networking". Use hyphens instead of spaces inside a tag.

Every request contains the EXISTING TAGS the user already has in their notes, followed by the DOCUMENT to tag.

Tag the document based on its content. Select between 1 and 5 tags from the EXISTING TAGS and create between 1 and 3 NEW TAGS of your own. Only select existing tags that appear in the EXISTING TAGS list. Ensure that the tags accurately reflect the document's primary focus and themes.

Respond by calling the document_tagger tool with "tags" holding the existing tags you selected and "newTags" holding the tags you created.{language}"##;

const HUMAN_TEMPLATE: &str = "EXISTING TAGS:\n```\n{input_tags}\n```\n\nDOCUMENT:\n```\n{document}\n```";

/// Number of worked examples included by default.
pub const DEFAULT_EXAMPLE_COUNT: usize = 3;

/// Author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An ordered message list, system instruction first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the system instruction, if any.
    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Returns the user/assistant turns, without the system instruction.
    pub fn turns(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    /// Rough token estimate: four characters per token.
    ///
    /// Real tokenizers differ, so this is only good for rejecting documents
    /// that are obviously too large.
    pub fn estimated_tokens(&self) -> usize {
        let chars: usize = self.messages.iter().map(|m| m.content.chars().count()).sum();
        chars / 4
    }

    fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }
}

/// Builds tagging conversations.
///
/// # Examples
///
/// ```
/// use aitagger::prompt::{PromptBuilder, Role};
///
/// let conversation = PromptBuilder::new()
///     .language(Some("German"))
///     .build("- #rust\n- #async", "Notes on tokio runtimes");
///
/// assert!(conversation.system().unwrap().contains("German"));
/// let last = conversation.messages().last().unwrap();
/// assert_eq!(last.role, Role::User);
/// assert!(last.content.contains("Notes on tokio runtimes"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: Option<String>,
    example_count: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            language: None,
            example_count: DEFAULT_EXAMPLE_COUNT,
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language new tags should be written in. Blank means unset.
    pub fn language(mut self, language: Option<&str>) -> Self {
        self.language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from);
        self
    }

    /// Limits the number of worked examples (capped at the number available).
    pub fn examples(mut self, count: usize) -> Self {
        self.example_count = count.min(EXAMPLES.len());
        self
    }

    /// Assembles the conversation for one document.
    ///
    /// `tag_list` is the already rendered existing-tag fragment, see
    /// [`crate::tags::render_tag_list`].
    pub fn build(&self, tag_list: &str, document: &str) -> Conversation {
        let mut conversation = Conversation::default();
        conversation.push(Role::System, self.system_message());

        for example in EXAMPLES.iter().take(self.example_count) {
            let (human, response) = render_example(example);
            conversation.push(Role::User, human);
            conversation.push(Role::Assistant, response);
        }

        conversation.push(Role::User, human_message(tag_list, document));
        conversation
    }

    fn system_message(&self) -> String {
        let language = match &self.language {
            Some(lang) => format!("\n\nWrite every new tag in {lang}."),
            None => String::new(),
        };
        SYSTEM_TEMPLATE.replace("{language}", &language)
    }
}

fn human_message(tag_list: &str, document: &str) -> String {
    // Document last so text inside it is never treated as a placeholder.
    HUMAN_TEMPLATE
        .replace("{input_tags}", tag_list)
        .replace("{document}", document)
}

fn render_example(example: &FewShotExample) -> (String, String) {
    let tag_list = example
        .input_tags
        .iter()
        .map(|tag| format!("- {tag}"))
        .collect::<Vec<_>>()
        .join("\n");
    let response = json!({
        "tags": example.tags,
        "newTags": example.new_tags,
    });
    (human_message(&tag_list, example.document), response.to_string())
}
