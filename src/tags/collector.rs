use std::collections::HashSet;

/// Upper bound on tags offered to the model in one prompt.
pub const MAX_PROMPT_TAGS: usize = 100;

/// Unique tags across all documents, in first-seen order.
///
/// Deduplication is by exact string match; `#Rust` and `#rust` are both kept.
pub fn collect_tags<I, T>(documents: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .flatten()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Removes every tag that case-insensitively matches one in `exclude`.
pub fn exclude_existing(tags: Vec<String>, exclude: &[String]) -> Vec<String> {
    let exclude: HashSet<String> = exclude.iter().map(|t| t.to_lowercase()).collect();
    tags.into_iter()
        .filter(|tag| !exclude.contains(&tag.to_lowercase()))
        .collect()
}

/// [`collect_tags`] followed by [`exclude_existing`].
pub fn collect_tags_excluding<I, T>(documents: I, exclude: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: IntoIterator<Item = String>,
{
    exclude_existing(collect_tags(documents), exclude)
}

/// Renders at most [`MAX_PROMPT_TAGS`] tags as `- tag` lines.
pub fn render_tag_list(tags: &[String]) -> String {
    tags.iter()
        .take(MAX_PROMPT_TAGS)
        .map(|tag| format!("- {tag}"))
        .collect::<Vec<_>>()
        .join("\n")
}
