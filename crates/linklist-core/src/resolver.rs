// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recursive link tree resolution
//!
//! A link list document holds a group of records. Each record pairs one link
//! with optional anchor text (`text`) and any number of extra fields that
//! become attributes. A link to another link list document expands inline as
//! that document's links, so resolution is a depth-first descent guarded by
//! the chain of documents currently open.

use crate::model::{Document, Fragment, Group, Link, Record};
use crate::node::LinkNode;
use crate::traits::{
    DocumentStore, HrefResolver, Lookup, ResolveError, ResolverConfig, Result,
};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

/// Field holding the anchor text of a record
pub const ANCHOR_FIELD: &str = "text";

/// A record split into its link, anchor text and leftover attribute fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified<'a> {
    pub link: Option<&'a Link>,
    pub anchor: Option<&'a Fragment>,
    pub attributes: Vec<(&'a str, &'a Fragment)>,
    /// Link fields overridden by a later link in the same record
    pub discarded_links: Vec<&'a str>,
}

/// Find the group of link records in `document`
pub fn locate_group<'d>(document: &'d Document, config: &ResolverConfig) -> Result<&'d Group> {
    document
        .get(&config.fragment_path(&document.doc_type))
        .and_then(Fragment::as_group)
        .ok_or_else(|| ResolveError::MissingOrInvalidGroup {
            id: document.id.clone(),
            doc_type: document.doc_type.clone(),
            fragment: config.fragment_name.clone(),
        })
}

/// Partition a record's fields.
///
/// Every link field is taken as the link; when a record carries several, the
/// last one wins and the others are reported in `discarded_links`. A
/// non-link field named `text` is the anchor. Everything else is kept, in
/// order, as an attribute.
pub fn classify(record: &Record) -> Classified<'_> {
    let mut classified = Classified::default();
    let mut link_field = None;

    for (name, fragment) in record.iter() {
        if let Some(link) = fragment.as_link() {
            if let Some(previous) = link_field.replace(name) {
                classified.discarded_links.push(previous);
            }
            classified.link = Some(link);
        } else if name == ANCHOR_FIELD {
            classified.anchor = Some(fragment);
        } else {
            classified.attributes.push((name, fragment));
        }
    }

    classified
}

/// Documents open on the current descent, root first
#[derive(Debug, Default)]
struct AncestorPath {
    ids: Vec<String>,
}

impl AncestorPath {
    /// Fail if `id` is already open on this path
    fn check(&self, id: &str) -> Result<()> {
        if self.ids.iter().any(|open| open == id) {
            return Err(ResolveError::CyclicReference {
                id: id.to_string(),
                path: self.ids.clone(),
            });
        }
        Ok(())
    }

    fn enter(&mut self, id: &str) -> Result<()> {
        self.check(id)?;
        self.ids.push(id.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.ids.pop();
    }

    fn depth(&self) -> usize {
        self.ids.len()
    }
}

/// Builds nested link trees from link list documents
pub struct LinkListResolver<S, H> {
    store: S,
    href: H,
    config: ResolverConfig,
}

impl<S: DocumentStore, H: HrefResolver> LinkListResolver<S, H> {
    pub fn new(store: S, href: H) -> Self {
        Self::with_config(store, href, ResolverConfig::default())
    }

    pub fn with_config(store: S, href: H, config: ResolverConfig) -> Self {
        Self {
            store,
            href,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn document_type(&self) -> &str {
        &self.config.document_type
    }

    pub fn set_document_type(&mut self, doc_type: impl Into<String>) {
        self.config.document_type = doc_type.into();
    }

    pub fn fragment_name(&self) -> &str {
        &self.config.fragment_name
    }

    pub fn set_fragment_name(&mut self, name: impl Into<String>) {
        self.config.fragment_name = name.into();
    }

    /// Resolve the document a bookmark points at
    pub fn resolve_by_bookmark(&self, bookmark: &str) -> Result<Vec<LinkNode>> {
        let id = self
            .store
            .get_by_bookmark(bookmark)
            .map_err(ResolveError::Store)?
            .ok_or_else(|| ResolveError::NotFound(Lookup::Bookmark(bookmark.to_string())))?;
        debug!(bookmark, %id, "bookmark resolved");
        self.resolve_by_id(&id)
    }

    /// Fetch a document by id and resolve it
    pub fn resolve_by_id(&self, id: &str) -> Result<Vec<LinkNode>> {
        let document = self.fetch(id)?;
        self.resolve_document(&document)
    }

    /// Resolve every linked record of `document` into a link tree.
    ///
    /// Records without a link are skipped. Any error aborts the whole call.
    pub fn resolve_document(&self, document: &Document) -> Result<Vec<LinkNode>> {
        let mut path = AncestorPath::default();
        self.parse_document(document, &mut path)
    }

    fn parse_document(&self, document: &Document, path: &mut AncestorPath) -> Result<Vec<LinkNode>> {
        path.enter(&document.id)?;
        let group = locate_group(document, &self.config)?;
        debug!(
            id = %document.id,
            doc_type = %document.doc_type,
            records = group.len(),
            depth = path.depth(),
            "resolving link list"
        );

        let mut links = Vec::with_capacity(group.len());
        for (index, record) in group.records().iter().enumerate() {
            let classified = classify(record);
            if !classified.discarded_links.is_empty() {
                warn!(
                    id = %document.id,
                    record = index,
                    discarded = ?classified.discarded_links,
                    "record has more than one link, keeping the last"
                );
            }
            match classified.link {
                Some(link) => links.push(self.generate_link(link, &classified, path)?),
                None => trace!(id = %document.id, record = index, "record has no link, skipped"),
            }
        }

        path.leave();
        Ok(links)
    }

    fn generate_link(
        &self,
        link: &Link,
        classified: &Classified<'_>,
        path: &mut AncestorPath,
    ) -> Result<LinkNode> {
        let text = classified
            .anchor
            .map(Fragment::as_text)
            .unwrap_or_default();

        let (href, children) = match link.document_of_type(&self.config.document_type) {
            Some(target) => {
                path.check(&target.id)?;
                let document = self.fetch(&target.id)?;
                (None, self.parse_document(&document, path)?)
            }
            None => (self.href.resolve(link), Vec::new()),
        };

        let mut attributes = IndexMap::with_capacity(classified.attributes.len() + 1);
        attributes.insert("href".to_string(), href);
        for (name, fragment) in &classified.attributes {
            attributes.insert((*name).to_string(), Some(fragment.as_text()));
        }

        Ok(LinkNode {
            text,
            attributes,
            children,
        })
    }

    fn fetch(&self, id: &str) -> Result<Document> {
        self.store
            .get_by_id(id)
            .map_err(ResolveError::Store)?
            .ok_or_else(|| ResolveError::NotFound(Lookup::Id(id.to_string())))
    }
}
