// SPDX-License-Identifier: AGPL-3.0-or-later
//! Collaborator traits, configuration and errors for link tree resolution

use crate::model::{Document, Link};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boxed error raised by a collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Key used to look up a document in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Bookmark(String),
    Id(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bookmark(name) => write!(f, "the bookmark {name}"),
            Self::Id(id) => write!(f, "the id {id}"),
        }
    }
}

/// Error type for link tree resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("There is no document with {0}")]
    NotFound(Lookup),

    #[error(
        "The given document with id {id} and type {doc_type} does not contain a fragment \
         with the name {fragment}, or, the fragment is not a group"
    )]
    MissingOrInvalidGroup {
        id: String,
        doc_type: String,
        fragment: String,
    },

    #[error("Infinite recursion detected for the link list with ID {id} (path: {})", .path.join(" -> "))]
    CyclicReference { id: String, path: Vec<String> },

    #[error("Document store error: {0}")]
    Store(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Source of documents, typically a remote content repository
pub trait DocumentStore {
    /// Fetch a document by id, `Ok(None)` when no such document exists
    fn get_by_id(&self, id: &str) -> std::result::Result<Option<Document>, BoxError>;

    /// Map a bookmark name to a document id
    fn get_by_bookmark(&self, name: &str) -> std::result::Result<Option<String>, BoxError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn get_by_id(&self, id: &str) -> std::result::Result<Option<Document>, BoxError> {
        (**self).get_by_id(id)
    }

    fn get_by_bookmark(&self, name: &str) -> std::result::Result<Option<String>, BoxError> {
        (**self).get_by_bookmark(name)
    }
}

/// Turns a link that is not an internal link list into an href
pub trait HrefResolver {
    /// `None` when the link cannot be resolved, e.g. a broken document link
    fn resolve(&self, link: &Link) -> Option<String>;
}

impl<F> HrefResolver for F
where
    F: Fn(&Link) -> Option<String>,
{
    fn resolve(&self, link: &Link) -> Option<String> {
        self(link)
    }
}

/// Configuration for link list resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Document type expanded inline as a submenu
    pub document_type: String,
    /// Field holding the group of link records
    pub fragment_name: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            document_type: "link-list".to_string(),
            fragment_name: "links".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Parse from TOML; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// The `{type}.{fragment}` path of the link group in a document of `doc_type`
    pub fn fragment_path(&self, doc_type: &str) -> String {
        format!("{}.{}", doc_type, self.fragment_name)
    }
}
