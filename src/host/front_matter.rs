//! The leading `---` metadata block of a Markdown note.
//!
//! Only the `tags` field is interpreted; every other line is carried through
//! untouched so writing tags never reorders or reformats the user's keys.

const DELIMITER: &str = "---";
const TAGS_KEY: &str = "tags";
const BOM: char = '\u{feff}';

/// Raw lines of a front matter block, delimiters excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    lines: Vec<String>,
}

/// Location and value of the `tags` field.
struct TagsField {
    index: usize,
    /// Lines after the key line that belong to the value.
    continuation: usize,
    items: Vec<String>,
}

impl FrontMatter {
    /// Splits a note into its front matter and body.
    ///
    /// The block must open on the first line (after an optional byte order
    /// mark) and close with a later `---` line; an unterminated block is
    /// treated as body text.
    pub fn split(text: &str) -> (Option<FrontMatter>, &str) {
        let unmarked = text.strip_prefix(BOM).unwrap_or(text);
        let Some(rest) = unmarked
            .strip_prefix("---\n")
            .or_else(|| unmarked.strip_prefix("---\r\n"))
        else {
            return (None, text);
        };

        let mut offset = text.len() - rest.len();
        let mut lines = Vec::new();
        for line in rest.split_inclusive('\n') {
            offset += line.len();
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim_end() == DELIMITER {
                return (Some(FrontMatter { lines }), &text[offset..]);
            }
            lines.push(line.to_string());
        }

        (None, text)
    }

    /// Byte offset where the body starts; 0 without front matter.
    pub fn content_start(text: &str) -> usize {
        let (_, body) = Self::split(text);
        text.len() - body.len()
    }

    /// Returns the tags field, or `None` when the key is absent.
    ///
    /// Accepts a flow sequence (`tags: [a, b]`, possibly spanning lines), a
    /// block sequence (`tags:` followed by `- a` lines) or a scalar
    /// (`tags: a, b`). A value that is only a comment reads as empty.
    pub fn tags(&self) -> Option<Vec<String>> {
        self.tags_field().map(|field| field.items)
    }

    /// Replaces the tags field in place, or appends it when absent.
    ///
    /// Written as a flow sequence of double-quoted strings.
    pub fn set_tags(&mut self, tags: &[String]) {
        let rendered = render_tags(tags);
        match self.tags_field() {
            Some(field) => {
                self.lines.splice(
                    field.index..=field.index + field.continuation,
                    std::iter::once(rendered),
                );
            }
            None => self.lines.push(rendered),
        }
    }

    /// Renders the block including both delimiters and a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("---\n");
        out
    }

    /// Rewrites `text` after applying `update` to its front matter.
    ///
    /// A note without front matter gains a new block at the top, after the
    /// byte order mark if there is one.
    pub fn apply(text: &str, update: &mut dyn FnMut(&mut FrontMatter)) -> String {
        let (bom, text) = match text.strip_prefix(BOM) {
            Some(rest) => (String::from(BOM), rest),
            None => (String::new(), text),
        };
        let (front_matter, body) = Self::split(text);
        let mut front_matter = front_matter.unwrap_or_default();
        update(&mut front_matter);
        bom + &front_matter.render() + body
    }

    fn find_key(&self, key: &str) -> Option<(usize, &str)> {
        self.lines.iter().enumerate().find_map(|(index, line)| {
            let value = line.strip_prefix(key)?.trim_start().strip_prefix(':')?;
            Some((index, value.trim()))
        })
    }

    fn tags_field(&self) -> Option<TagsField> {
        let (index, value) = self.find_key(TAGS_KEY)?;
        let following = &self.lines[index + 1..];

        if value.starts_with('[') {
            let mut flow = value.to_string();
            let mut continuation = 0;
            while closing_bracket(&flow).is_none() && continuation < following.len() {
                flow.push('\n');
                flow.push_str(&following[continuation]);
                continuation += 1;
            }

            // An unclosed sequence only claims its own line.
            let (flow, continuation) = match closing_bracket(&flow) {
                Some(end) => (flow[1..end].to_string(), continuation),
                None => (value[1..].to_string(), 0),
            };
            let items = split_items(&flow, |c| c == ',');
            return Some(TagsField { index, continuation, items });
        }

        let value = strip_comment(value);
        if !value.is_empty() {
            let items = split_items(value, |c| c == ',' || c.is_whitespace());
            return Some(TagsField { index, continuation: 0, items });
        }

        let mut continuation = 0;
        let mut items = Vec::new();
        for (offset, line) in following.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some(item) = block_item(line) else { break };
            let item = unquote(item);
            if !item.is_empty() {
                items.push(item);
            }
            continuation = offset + 1;
        }
        Some(TagsField { index, continuation, items })
    }
}

/// The text after `- ` on a block sequence line.
fn block_item(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('-')?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Byte index of the `]` closing a flow sequence that starts at index 0.
fn closing_bracket(flow: &str) -> Option<usize> {
    let mut quote = None;
    for (index, c) in flow.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), c) if c == open => quote = None,
            (None, ']') => return Some(index),
            _ => {}
        }
    }
    None
}

/// Drops a YAML comment from an unquoted scalar.
fn strip_comment(value: &str) -> &str {
    if value.starts_with('#') {
        return "";
    }
    match value.find(" #").or_else(|| value.find("\t#")) {
        Some(index) => value[..index].trim_end(),
        None => value,
    }
}

fn split_items(value: &str, separator: impl Fn(char) -> bool) -> Vec<String> {
    value
        .split(separator)
        .map(unquote)
        .filter(|item| !item.is_empty())
        .collect()
}

fn unquote(item: &str) -> String {
    let item = item.trim();
    if item.len() >= 2 && item.starts_with('"') && item.ends_with('"') {
        return serde_json::from_str(item).unwrap_or_else(|_| item[1..item.len() - 1].to_string());
    }
    if item.len() >= 2 && item.starts_with('\'') && item.ends_with('\'') {
        return item[1..item.len() - 1].replace("''", "'");
    }
    item.to_string()
}

fn render_tags(tags: &[String]) -> String {
    let items: Vec<String> = tags
        .iter()
        .map(|tag| serde_json::to_string(tag).unwrap_or_else(|_| format!("\"{tag}\"")))
        .collect();
    format!("{TAGS_KEY}: [{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_without_front_matter_returns_whole_text() {
        let text = "# Title\n\nBody";
        let (front_matter, body) = FrontMatter::split(text);
        assert!(front_matter.is_none());
        assert_eq!(body, text);
        assert_eq!(FrontMatter::content_start(text), 0);
    }

    #[test]
    fn split_finds_body_after_closing_delimiter() {
        let text = "---\ntitle: Redis\n---\nBody text";
        let (front_matter, body) = FrontMatter::split(text);
        assert_eq!(front_matter.unwrap().lines, vec!["title: Redis"]);
        assert_eq!(body, "Body text");
        assert_eq!(FrontMatter::content_start(text), text.len() - "Body text".len());
    }

    #[test]
    fn unterminated_block_is_body() {
        let text = "---\ntitle: Redis\nno closing line";
        assert!(FrontMatter::split(text).0.is_none());
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = "---\r\ntags: [a]\r\n---\r\nBody";
        let (front_matter, body) = FrontMatter::split(text);
        assert_eq!(front_matter.unwrap().tags(), Some(strings(&["a"])));
        assert_eq!(body, "Body");
    }

    #[test]
    fn reads_flow_sequence_tags() {
        let (fm, _) = FrontMatter::split("---\ntags: [\"#x\", 'y', z]\n---\n");
        assert_eq!(fm.unwrap().tags(), Some(strings(&["#x", "y", "z"])));
    }

    #[test]
    fn reads_block_sequence_tags() {
        let text = "---\ntags:\n  - redis\n  - \"#caching\"\ntitle: x\n---\n";
        let (fm, _) = FrontMatter::split(text);
        assert_eq!(fm.unwrap().tags(), Some(strings(&["redis", "#caching"])));
    }

    #[test]
    fn reads_flow_sequence_across_lines() {
        let text = "---\ntags: [alpha,\n  beta]\ntitle: t\n---\n";
        let (fm, _) = FrontMatter::split(text);
        assert_eq!(fm.unwrap().tags(), Some(strings(&["alpha", "beta"])));

        let out = FrontMatter::apply(text, &mut |fm| {
            fm.set_tags(&strings(&["alpha", "beta", "#new"]));
        });
        assert_eq!(out, "---\ntags: [\"alpha\", \"beta\", \"#new\"]\ntitle: t\n---\n");
    }

    #[test]
    fn unclosed_flow_sequence_keeps_following_lines() {
        let text = "---\ntags: [a, b\ntitle: t\n---\n";
        let out = FrontMatter::apply(text, &mut |fm| fm.set_tags(&strings(&["#c"])));
        assert_eq!(out, "---\ntags: [\"#c\"]\ntitle: t\n---\n");
    }

    #[test]
    fn blank_lines_inside_block_sequence() {
        let text = "---\ntags:\n  - a\n\n  - b\n\ntitle: t\n---\n";
        let (fm, _) = FrontMatter::split(text);
        assert_eq!(fm.unwrap().tags(), Some(strings(&["a", "b"])));

        let out = FrontMatter::apply(text, &mut |fm| fm.set_tags(&strings(&["a", "b", "#n"])));
        assert_eq!(out, "---\ntags: [\"a\", \"b\", \"#n\"]\n\ntitle: t\n---\n");
    }

    #[test]
    fn byte_order_mark_before_front_matter() {
        let text = "\u{feff}---\ntags: [x]\n---\nBody";
        let (fm, body) = FrontMatter::split(text);
        assert_eq!(fm.unwrap().tags(), Some(strings(&["x"])));
        assert_eq!(body, "Body");

        let out = FrontMatter::apply(text, &mut |fm| fm.set_tags(&strings(&["x", "#n"])));
        assert_eq!(out, "\u{feff}---\ntags: [\"x\", \"#n\"]\n---\nBody");
    }

    #[test]
    fn byte_order_mark_stays_first_on_new_block() {
        let out = FrontMatter::apply("\u{feff}Body", &mut |fm| fm.set_tags(&strings(&["#n"])));
        assert_eq!(out, "\u{feff}---\ntags: [\"#n\"]\n---\nBody");
    }

    #[test]
    fn comment_only_value_has_no_tags() {
        let text = "---\ntags: # none yet\ntitle: t\n---\n";
        let (fm, _) = FrontMatter::split(text);
        assert_eq!(fm.unwrap().tags(), Some(Vec::new()));

        let out = FrontMatter::apply(text, &mut |fm| fm.set_tags(&strings(&["#n"])));
        assert_eq!(out, "---\ntags: [\"#n\"]\ntitle: t\n---\n");
    }

    #[test]
    fn comment_before_block_sequence() {
        let (fm, _) = FrontMatter::split("---\ntags: # topics\n  - a\n---\n");
        assert_eq!(fm.unwrap().tags(), Some(strings(&["a"])));
    }

    #[test]
    fn trailing_comment_on_scalar_is_dropped() {
        let (fm, _) = FrontMatter::split("---\ntags: rust # lang\n---\n");
        assert_eq!(fm.unwrap().tags(), Some(strings(&["rust"])));
    }

    #[test]
    fn reads_scalar_tags() {
        let (fm, _) = FrontMatter::split("---\ntags: rust, async tokio\n---\n");
        assert_eq!(fm.unwrap().tags(), Some(strings(&["rust", "async", "tokio"])));
    }

    #[test]
    fn absent_tags_key_is_none() {
        let (fm, _) = FrontMatter::split("---\ntitle: x\ntagsfoo: y\n---\n");
        assert_eq!(fm.unwrap().tags(), None);
    }

    #[test]
    fn set_tags_replaces_block_sequence_in_place() {
        let text = "---\ntitle: x\ntags:\n  - a\n  - b\nauthor: me\n---\nBody";
        let out = FrontMatter::apply(text, &mut |fm| fm.set_tags(&strings(&["#c"])));
        assert_eq!(out, "---\ntitle: x\ntags: [\"#c\"]\nauthor: me\n---\nBody");
    }

    #[test]
    fn apply_adds_block_to_plain_note() {
        let out = FrontMatter::apply("Just text\n", &mut |fm| {
            fm.set_tags(&strings(&["#a", "#b"]));
        });
        assert_eq!(out, "---\ntags: [\"#a\", \"#b\"]\n---\nJust text\n");

        let (fm, body) = FrontMatter::split(&out);
        assert_eq!(fm.unwrap().tags(), Some(strings(&["#a", "#b"])));
        assert_eq!(body, "Just text\n");
    }

    #[test]
    fn set_tags_keeps_other_keys_in_order() {
        let text = "---\naliases: [r]\ntags: [x]\ncreated: 2024-01-01\n---\n";
        let out = FrontMatter::apply(text, &mut |fm| fm.set_tags(&strings(&["x", "y"])));
        assert_eq!(
            out,
            "---\naliases: [r]\ntags: [\"x\", \"y\"]\ncreated: 2024-01-01\n---\n"
        );
    }
}
