use std::collections::HashSet;

use crate::host::FrontMatter;

/// Combines model output with the document's current tags.
///
/// Returns `tags` followed by `new_tags`, in input order, with every entry
/// that case-insensitively matches one of `existing` (or an earlier entry)
/// removed. Inputs are not modified.
pub fn merge_tags(tags: &[String], new_tags: &[String], existing: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|t| t.to_lowercase()).collect();
    tags.iter()
        .chain(new_tags)
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .cloned()
        .collect()
}

/// Lowercases every tag when `lower_case` is set; otherwise returns them as-is.
pub fn apply_case(tags: Vec<String>, lower_case: bool) -> Vec<String> {
    if !lower_case {
        return tags;
    }
    tags.into_iter().map(|t| t.to_lowercase()).collect()
}

/// Writes `tags` into front matter: set when the field is absent, appended
/// after the current entries otherwise.
pub fn apply_to_front_matter(front_matter: &mut FrontMatter, tags: &[String]) {
    let combined = match front_matter.tags() {
        Some(mut current) => {
            current.extend(tags.iter().cloned());
            current
        }
        None => tags.to_vec(),
    };
    front_matter.set_tags(&combined);
}
