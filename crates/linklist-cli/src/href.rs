// SPDX-License-Identifier: MPL-2.0-or-later
//! Pattern based href resolution

use linklist_core::model::DocumentLink;
use linklist_core::{HrefResolver, Link};

/// Resolves URL-bearing links to their URL and document links through a pattern
#[derive(Debug, Clone)]
pub struct PatternHrefResolver {
    document_pattern: String,
}

impl PatternHrefResolver {
    pub fn new(document_pattern: impl Into<String>) -> Self {
        Self {
            document_pattern: document_pattern.into(),
        }
    }

    fn expand(&self, link: &DocumentLink) -> String {
        let uid = link.uid.as_deref().unwrap_or(&link.id);
        let slug = link.slug.as_deref().unwrap_or(uid);
        self.document_pattern
            .replace("{type}", &link.doc_type)
            .replace("{id}", &link.id)
            .replace("{uid}", uid)
            .replace("{slug}", slug)
    }
}

impl HrefResolver for PatternHrefResolver {
    fn resolve(&self, link: &Link) -> Option<String> {
        match link {
            Link::Document(doc) if doc.broken => None,
            Link::Document(doc) => Some(self.expand(doc)),
            other => other.url().map(str::to_string),
        }
    }
}
