// SPDX-License-Identifier: AGPL-3.0-or-later
//! Template-ready link tree nodes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One rendered link with its nested submenu.
///
/// Serializes as `{"text": ..., "attributes": {...}, "children": [...]}`. The
/// `href` attribute is always the first entry; it is `null` for links that
/// expand into a submenu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkNode {
    pub text: String,
    pub attributes: IndexMap<String, Option<String>>,
    pub children: Vec<LinkNode>,
}

impl LinkNode {
    pub fn href(&self) -> Option<&str> {
        self.attributes.get("href").and_then(|href| href.as_deref())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes below this one, at any depth
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}
