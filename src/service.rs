use std::path::{Path, PathBuf};

use crate::error::TaggerError;
use crate::host::{DocumentHost, FrontMatter};
use crate::tagger::{Tagger, TaggerHandle};
use crate::tags::{apply_to_front_matter, collect_tags};

/// Service layer providing the tagging commands.
///
/// TaggingService pairs a [`DocumentHost`] with a [`TaggerHandle`]. Every
/// failure is shown to the user through `host.notify` and still returned, so
/// callers can decide what to do next. Nothing is retried.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use aitagger::{FsVault, Settings, TaggerHandle, TaggingService};
///
/// # fn main() -> Result<(), aitagger::TaggerError> {
/// let vault = FsVault::open("notes")?;
/// let service = TaggingService::new(vault, TaggerHandle::new(Settings::default()));
/// let added = service.tag_document(Path::new("redis.md"))?;
/// println!("added {added:?}");
/// # Ok(())
/// # }
/// ```
pub struct TaggingService<H: DocumentHost> {
    host: H,
    tagger: TaggerHandle,
}

/// Outcome of tagging every document under a folder.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderReport {
    /// Documents that were processed, with the tags added to each.
    pub tagged: Vec<(PathBuf, Vec<String>)>,
    /// Documents that failed, with the notice shown for each.
    pub failed: Vec<(PathBuf, String)>,
}

impl FolderReport {
    pub fn total(&self) -> usize {
        self.tagged.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<H: DocumentHost> TaggingService<H> {
    pub fn new(host: H, tagger: TaggerHandle) -> Self {
        Self { host, tagger }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn tagger(&self) -> &TaggerHandle {
        &self.tagger
    }

    /// Tags a whole document. The front matter is not sent to the model.
    ///
    /// Returns the tags that were added (possibly none).
    pub fn tag_document(&self, path: &Path) -> Result<Vec<String>, TaggerError> {
        self.notify_on_error(self.tag_one(path, None))
    }

    /// Tags a document using only `selection` as model input; the tags are
    /// still written to the document's front matter.
    pub fn tag_selection(&self, path: &Path, selection: &str) -> Result<Vec<String>, TaggerError> {
        self.notify_on_error(self.tag_one(path, Some(selection)))
    }

    /// Tags every document under `dir`, continuing past failures.
    ///
    /// Only setup failures (no tagger, unreadable folder) are returned as
    /// errors; per-document failures are collected in the report.
    pub fn tag_folder(&self, dir: &Path) -> Result<FolderReport, TaggerError> {
        let tagger = self.notify_on_error(self.tagger.current())?;
        let documents = self.notify_on_error(self.host.documents_in(dir))?;
        let vault_tags = self.vault_tags();

        let mut report = FolderReport::default();
        for path in documents {
            match self.tag_with(&tagger, &path, None, &vault_tags) {
                Ok(added) => report.tagged.push((path, added)),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to tag document");
                    report.failed.push((path, err.user_message()));
                }
            }
        }

        self.host.notify(&format!(
            "Tagged {} of {} documents in {}.",
            report.tagged.len(),
            report.total(),
            dir.display()
        ));
        for (path, message) in &report.failed {
            self.host.notify(&format!("{}: {message}", path.display()));
        }
        Ok(report)
    }

    fn tag_one(&self, path: &Path, selection: Option<&str>) -> Result<Vec<String>, TaggerError> {
        let tagger = self.tagger.current()?;
        let vault_tags = self.vault_tags();
        let added = self.tag_with(&tagger, path, selection, &vault_tags)?;

        if added.is_empty() {
            self.host.notify("No new tags to add.");
        } else {
            self.host.notify(&format!("Added tags: {}", added.join(", ")));
        }
        Ok(added)
    }

    fn tag_with(
        &self,
        tagger: &Tagger,
        path: &Path,
        selection: Option<&str>,
        vault_tags: &[String],
    ) -> Result<Vec<String>, TaggerError> {
        let existing = self.host.document_tags(path)?;
        let added = match selection {
            Some(text) => tagger.generate_tags(text, &existing, vault_tags)?,
            None => {
                let text = self.host.read_document(path)?;
                let body = &text[FrontMatter::content_start(&text)..];
                tagger.generate_tags(body, &existing, vault_tags)?
            }
        };

        if !added.is_empty() {
            self.host
                .process_front_matter(path, &mut |fm| apply_to_front_matter(fm, &added))?;
        }
        tracing::info!(path = %path.display(), added = added.len(), "document tagged");
        Ok(added)
    }

    /// Tags across the whole store. Unreadable documents are skipped.
    fn vault_tags(&self) -> Vec<String> {
        let documents = match self.host.all_documents() {
            Ok(documents) => documents,
            Err(err) => {
                tracing::warn!(error = %err, "could not list documents for tag context");
                return Vec::new();
            }
        };

        collect_tags(documents.iter().filter_map(|path| {
            self.host
                .document_tags(path)
                .inspect_err(|err| tracing::debug!(path = %path.display(), error = %err, "skipping document"))
                .ok()
        }))
    }

    fn notify_on_error<T>(&self, result: Result<T, TaggerError>) -> Result<T, TaggerError> {
        if let Err(err) = &result {
            self.host.notify(&err.user_message());
        }
        result
    }
}

#[cfg(test)]
mod tests;
