use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{DocumentHost, FrontMatter};
use crate::error::TaggerError;

/// A directory of Markdown notes.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Opens the vault rooted at `root`, which must be a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TaggerError> {
        let root = root.into();
        let metadata = std::fs::metadata(&root).map_err(|e| TaggerError::io(&root, e))?;
        if !metadata.is_dir() {
            return Err(TaggerError::io(
                &root,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "vault root is not a directory"),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths are taken from the vault root.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl DocumentHost for FsVault {
    fn read_document(&self, path: &Path) -> Result<String, TaggerError> {
        let path = self.resolve(path);
        std::fs::read_to_string(&path).map_err(|e| TaggerError::io(path, e))
    }

    fn all_documents(&self) -> Result<Vec<PathBuf>, TaggerError> {
        markdown_files(&self.root)
    }

    fn documents_in(&self, dir: &Path) -> Result<Vec<PathBuf>, TaggerError> {
        markdown_files(&self.resolve(dir))
    }

    fn process_front_matter(
        &self,
        path: &Path,
        update: &mut dyn FnMut(&mut FrontMatter),
    ) -> Result<(), TaggerError> {
        let path = self.resolve(path);
        let text = std::fs::read_to_string(&path).map_err(|e| TaggerError::io(&path, e))?;
        let updated = FrontMatter::apply(&text, update);
        std::fs::write(&path, updated).map_err(|e| TaggerError::io(&path, e))
    }

    fn notify(&self, message: &str) {
        tracing::debug!(message, "notice shown");
        eprintln!("{message}");
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Every `*.md` file under `dir`, hidden directories skipped, sorted.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, TaggerError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            TaggerError::io(path, e.into())
        })?;

        let is_markdown = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if entry.file_type().is_file() && is_markdown {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), count = files.len(), "collected markdown files");
    Ok(files)
}
