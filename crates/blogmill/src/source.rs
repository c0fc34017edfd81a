//! Source document providers.
//!
//! The batch pipeline takes an explicit ordered list of source identifiers
//! and resolves each through a `SourceStore`, so the pipeline itself never
//! scans the filesystem. Implementations must be `Clone` to support shared
//! access patterns; `InMemorySource` backs filesystem-free tests.

use anyhow::{anyhow, Context, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Extensions probed when an identifier has no extension of its own.
const SOURCE_EXTENSIONS: &[&str] = &["txt", "md"];

/// Trait for providers of raw document text.
///
/// Identifiers are caller-chosen names ("blog1", "drafts/intro"); how they
/// map to stored text is the provider's business. Reads return the full
/// document as UTF-8.
pub trait SourceStore: Clone {
    /// Whether a document exists for this identifier.
    fn contains(&self, id: &str) -> bool;

    /// Read the full text of a document.
    ///
    /// # Errors
    ///
    /// Returns an error naming the identifier (and path, where there is one)
    /// when the document is absent or unreadable.
    fn read_document(&self, id: &str) -> Result<String>;

    /// List all available document identifiers, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be enumerated.
    fn list_documents(&self) -> Result<Vec<String>>;
}

/// Directory-backed source provider.
///
/// Resolves `<root>/<id>` directly when the identifier carries an extension,
/// otherwise probes `<id>.txt` then `<id>.md`.
#[derive(Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a provider rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The directory this provider reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let direct = self.root.join(id);
        if direct.is_file() {
            return Some(direct);
        }
        if Path::new(id).extension().is_some() {
            return None;
        }
        SOURCE_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", id, ext)))
            .find(|p| p.is_file())
    }
}

impl SourceStore for DirSource {
    fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    fn read_document(&self, id: &str) -> Result<String> {
        let path = self.resolve(id).ok_or_else(|| {
            anyhow!(
                "Source not found: {} (looked in {})",
                id,
                self.root.display()
            )
        })?;
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read source file: {}", path.display()))
    }

    fn list_documents(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read source directory: {}", self.root.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| SOURCE_EXTENSIONS.contains(&e))
                .unwrap_or(false);
            if !matches_ext {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

/// In-memory source provider for testing.
///
/// Uses `Rc<RefCell<>>` for shared interior mutability - clones share the
/// same documents.
#[derive(Clone, Default)]
pub struct InMemorySource {
    documents: Rc<RefCell<HashMap<String, String>>>,
}

impl InMemorySource {
    /// Create an empty in-memory provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn insert(&self, id: impl Into<String>, text: impl Into<String>) {
        self.documents.borrow_mut().insert(id.into(), text.into());
    }
}

impl SourceStore for InMemorySource {
    fn contains(&self, id: &str) -> bool {
        self.documents.borrow().contains_key(id)
    }

    fn read_document(&self, id: &str) -> Result<String> {
        self.documents
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Source not found: {}", id))
    }

    fn list_documents(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.documents.borrow().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_source_probes_extensions() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("blog1.txt"), "one").unwrap();
        std::fs::write(temp.path().join("blog2.md"), "two").unwrap();

        let source = DirSource::new(temp.path());
        assert!(source.contains("blog1"));
        assert_eq!(source.read_document("blog1").unwrap(), "one");
        assert_eq!(source.read_document("blog2").unwrap(), "two");
        assert_eq!(source.read_document("blog2.md").unwrap(), "two");
    }

    #[test]
    fn test_dir_source_missing_document() {
        let temp = tempfile::tempdir().unwrap();
        let source = DirSource::new(temp.path());

        assert!(!source.contains("blog9"));
        let err = source.read_document("blog9").unwrap_err();
        assert!(err.to_string().contains("blog9"));
    }

    #[test]
    fn test_dir_source_lists_sorted_stems() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("b.txt"), "").unwrap();
        std::fs::write(temp.path().join("a.md"), "").unwrap();
        std::fs::write(temp.path().join("ignored.docx"), "").unwrap();

        let source = DirSource::new(temp.path());
        assert_eq!(source.list_documents().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_trait_read_with_both_backends() {
        fn check<S: SourceStore>(source: S) {
            assert!(source.contains("doc"));
            assert_eq!(source.read_document("doc").unwrap(), "text");
            assert!(source.read_document("nope").is_err());
        }

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("doc.txt"), "text").unwrap();
        check(DirSource::new(temp.path()));

        let memory = InMemorySource::new();
        memory.insert("doc", "text");
        check(memory);
    }

    #[test]
    fn test_in_memory_clones_share_documents() {
        let source = InMemorySource::new();
        let clone = source.clone();
        source.insert("doc", "text");
        assert!(clone.contains("doc"));
    }
}
