// SPDX-License-Identifier: AGPL-3.0-or-later
//! Linklist Store - in-memory document store
//!
//! Provides:
//! - A snapshot format holding documents and bookmarks as exported from the
//!   content repository
//! - `MemoryStore`, a `DocumentStore` answering lookups from a snapshot

use indexmap::IndexMap;
use linklist_core::{BoxError, Document, DocumentStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate document id: {0}")]
    DuplicateDocument(String),

    #[error("Bookmark {bookmark} points at unknown document {id}")]
    DanglingBookmark { bookmark: String, id: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Documents and bookmarks exported from a content repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Bookmark name to document id
    #[serde(default)]
    pub bookmarks: HashMap<String, String>,
}

/// Read-only document store held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: IndexMap<String, Document>,
    bookmarks: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, rejecting duplicate ids and dangling bookmarks
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Self::new();
        for document in snapshot.documents {
            if store.documents.contains_key(&document.id) {
                return Err(StoreError::DuplicateDocument(document.id));
            }
            store.insert(document);
        }
        for (bookmark, id) in snapshot.bookmarks {
            if !store.documents.contains_key(&id) {
                return Err(StoreError::DanglingBookmark { bookmark, id });
            }
            store.bookmark(bookmark, id);
        }
        debug!(
            documents = store.documents.len(),
            bookmarks = store.bookmarks.len(),
            "snapshot loaded"
        );
        Ok(store)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(input)?)
    }

    /// Load a JSON snapshot from disk
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&input)
    }

    /// Add a document, replacing any document with the same id
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(document.id.clone(), document)
    }

    pub fn bookmark(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.bookmarks.insert(name.into(), id.into());
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get_by_id(&self, id: &str) -> std::result::Result<Option<Document>, BoxError> {
        Ok(self.documents.get(id).cloned())
    }

    fn get_by_bookmark(&self, name: &str) -> std::result::Result<Option<String>, BoxError> {
        Ok(self.bookmarks.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linklist_core::{Link, LinkListResolver, LinkNode, Lookup, ResolveError};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const FLAT: &str = include_str!("../../linklist-core/fixtures/link-list.json");
    const NESTED_PARENT: &str = include_str!("../../linklist-core/fixtures/nested-parent.json");
    const NESTED_CHILD: &str = include_str!("../../linklist-core/fixtures/nested-child.json");
    const RECURSIVE_CHILD: &str = include_str!("../../linklist-core/fixtures/recursive-child.json");

    fn snapshot_json(documents: &[&str], bookmarks: &[(&str, &str)]) -> String {
        let bookmarks: Vec<String> = bookmarks
            .iter()
            .map(|(name, id)| format!("\"{name}\": \"{id}\""))
            .collect();
        format!(
            "{{\"documents\": [{}], \"bookmarks\": {{{}}}}}",
            documents.join(","),
            bookmarks.join(",")
        )
    }

    fn href(link: &Link) -> Option<String> {
        link.url().map(str::to_string)
    }

    #[test]
    fn test_from_json_str() {
        let json = snapshot_json(&[FLAT, NESTED_PARENT], &[("main-nav", "VwHr0CcAAP8Bhb0U")]);
        let store = MemoryStore::from_json_str(&json).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get_by_bookmark("main-nav").unwrap().as_deref(),
            Some("VwHr0CcAAP8Bhb0U")
        );
        assert!(store.get_by_id("DocumentID").unwrap().is_some());
        assert!(store.get_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let json = snapshot_json(&[NESTED_CHILD, RECURSIVE_CHILD], &[]);
        assert!(matches!(
            MemoryStore::from_json_str(&json),
            Err(StoreError::DuplicateDocument(id)) if id == "ChildID"
        ));
    }

    #[test]
    fn test_dangling_bookmark_is_rejected() {
        let json = snapshot_json(&[FLAT], &[("footer", "nope")]);
        assert!(matches!(
            MemoryStore::from_json_str(&json),
            Err(StoreError::DanglingBookmark { bookmark, .. }) if bookmark == "footer"
        ));
    }

    #[test]
    fn test_insert_replaces_by_id() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.insert(serde_json::from_str(NESTED_CHILD).unwrap()).is_none());
        assert!(store.insert(serde_json::from_str(RECURSIVE_CHILD).unwrap()).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = snapshot_json(&[NESTED_PARENT, NESTED_CHILD], &[("nav", "DocumentID")]);
        file.write_all(json.as_bytes()).unwrap();

        let store = MemoryStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("ChildID").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MemoryStore::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_resolve_nested_bookmark() {
        let json = snapshot_json(&[NESTED_PARENT, NESTED_CHILD], &[("nav", "DocumentID")]);
        let store = MemoryStore::from_json_str(&json).unwrap();
        let resolver = LinkListResolver::new(&store, href);
        let links = resolver.resolve_by_bookmark("nav").unwrap();

        let texts: Vec<&str> = links.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Home", "More"]);
        assert_eq!(links[1].children.len(), 1);
        assert_eq!(links[1].children[0].href(), Some("https://example.com/child"));
        assert!(links[1].children.iter().all(LinkNode::is_leaf));
    }

    #[test]
    fn test_resolve_recursive_snapshot_fails() {
        let json = snapshot_json(&[NESTED_PARENT, RECURSIVE_CHILD], &[("nav", "DocumentID")]);
        let store = MemoryStore::from_json_str(&json).unwrap();
        let resolver = LinkListResolver::new(store, href);

        assert!(matches!(
            resolver.resolve_by_bookmark("nav"),
            Err(ResolveError::CyclicReference { id, .. }) if id == "DocumentID"
        ));
        assert!(matches!(
            resolver.resolve_by_bookmark("other"),
            Err(ResolveError::NotFound(Lookup::Bookmark(_)))
        ));
    }
}
