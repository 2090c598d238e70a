//! The document host: where notes are read from and written back to.
//!
//! [`DocumentHost`] is the seam the tagging service talks to. [`FsVault`]
//! implements it over a directory of Markdown files; tests use in-memory
//! hosts.

mod front_matter;
mod vault;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

pub use front_matter::FrontMatter;
pub use vault::FsVault;

use crate::error::TaggerError;

static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|\s)#([\p{L}\p{N}_/-]+)").expect("inline tag pattern is valid")
});

/// Operations the tagging service needs from the note store.
pub trait DocumentHost {
    /// Returns the full text of a note, front matter included.
    fn read_document(&self, path: &Path) -> Result<String, TaggerError>;

    /// Every note in the store.
    fn all_documents(&self) -> Result<Vec<PathBuf>, TaggerError>;

    /// Every note under `dir`, recursively.
    fn documents_in(&self, dir: &Path) -> Result<Vec<PathBuf>, TaggerError>;

    /// Applies `update` to the note's front matter and persists the result.
    fn process_front_matter(
        &self,
        path: &Path,
        update: &mut dyn FnMut(&mut FrontMatter),
    ) -> Result<(), TaggerError>;

    /// Shows a transient notice to the user.
    fn notify(&self, message: &str);

    /// Tags carried by a note: front matter tags, `#`-prefixed, followed by
    /// inline `#tags` from the body.
    fn document_tags(&self, path: &Path) -> Result<Vec<String>, TaggerError> {
        Ok(tags_in_text(&self.read_document(path)?))
    }
}

/// Extracts the tags of a note's text, deduplicated by exact match.
pub fn tags_in_text(text: &str) -> Vec<String> {
    let (front_matter, body) = FrontMatter::split(text);

    let from_front_matter = front_matter
        .and_then(|fm| fm.tags())
        .unwrap_or_default()
        .into_iter()
        .map(|tag| {
            let tag = tag.trim_start_matches('#');
            format!("#{tag}")
        })
        .filter(|tag| tag.len() > 1);

    let mut seen = HashSet::new();
    from_front_matter
        .chain(inline_tags(body))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Inline `#tags` outside fenced code blocks. All-digit tags are not tags.
fn inline_tags(body: &str) -> Vec<String> {
    let mut in_fence = false;
    let mut prose = String::new();
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            prose.push_str(line);
            prose.push('\n');
        }
    }

    INLINE_TAG
        .captures_iter(&prose)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('/'))
        .filter(|tag| !tag.is_empty() && !tag.chars().all(|c| c.is_ascii_digit()))
        .map(|tag| format!("#{tag}"))
        .collect()
}
