// SPDX-License-Identifier: AGPL-3.0-or-later
//! Linklist Core - navigation link trees from link list documents
//!
//! This crate provides:
//! - A content model for documents, groups, records and fragments
//! - The document store and href resolver traits the resolver depends on
//! - The recursive resolver turning link list documents into nested
//!   `{text, attributes, children}` nodes, with cycle detection

pub mod model;
pub mod node;
pub mod resolver;
mod text;
pub mod traits;

pub use model::{Document, Fragment, Group, Link, Record};
pub use node::LinkNode;
pub use resolver::{classify, locate_group, Classified, LinkListResolver};
pub use traits::{
    BoxError, DocumentStore, HrefResolver, Lookup, ResolveError, ResolverConfig, Result,
};
