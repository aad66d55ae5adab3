// SPDX-License-Identifier: AGPL-3.0-or-later
//! Content model for link list documents
//!
//! Documents are deserialized in the content API's shape: every field lives
//! under `data.{type}.{field}` and every fragment carries a `type` tag next to
//! its `value`. In memory the four link tags collapse into a single
//! [`Fragment::Link`] so consumers only ever ask "is this a link, is this
//! text, what is its plain text".

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A content document as returned by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub slugs: Vec<String>,
    /// Fields keyed by document type, then by field name
    #[serde(default)]
    pub data: IndexMap<String, IndexMap<String, Fragment>>,
}

impl Document {
    /// Create a new document without any fields
    pub fn new(id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            doc_type: doc_type.into(),
            uid: None,
            tags: Vec::new(),
            slugs: Vec::new(),
            data: IndexMap::new(),
        }
    }

    /// Add a field under this document's own type
    pub fn with_fragment(mut self, name: impl Into<String>, fragment: Fragment) -> Self {
        self.data
            .entry(self.doc_type.clone())
            .or_default()
            .insert(name.into(), fragment);
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Look up a fragment by its `{type}.{field}` path.
    ///
    /// Returns `None` when the type prefix is not this document's type.
    pub fn get(&self, path: &str) -> Option<&Fragment> {
        let (doc_type, name) = path.split_once('.')?;
        if doc_type != self.doc_type {
            return None;
        }
        self.data.get(doc_type)?.get(name)
    }
}

/// A typed content value attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireFragment", into = "WireFragment")]
pub enum Fragment {
    Link(Link),
    Text(String),
    StructuredText(Vec<TextBlock>),
    Number(f64),
    Date(String),
    Color(String),
    Select(String),
    Group(Group),
    /// Any other fragment kind, kept as its raw value
    Other {
        kind: String,
        value: serde_json::Value,
    },
}

impl Fragment {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }

    /// Plain text rendering, used for anchor text and attribute values
    pub fn as_text(&self) -> String {
        let mut output = String::new();
        crate::text::render_fragment(&mut output, self);
        output
    }
}

impl From<Link> for Fragment {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<Group> for Fragment {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// A hyperlink target
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// Reference to another document in the same repository
    Document(DocumentLink),
    Web(WebLink),
    File(FileLink),
    Image(ImageLink),
}

impl Link {
    pub fn document(id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self::Document(DocumentLink {
            id: id.into(),
            doc_type: doc_type.into(),
            uid: None,
            slug: None,
            tags: Vec::new(),
            broken: false,
        })
    }

    pub fn web(url: impl Into<String>) -> Self {
        Self::Web(WebLink {
            url: url.into(),
            target: None,
        })
    }

    /// The document link if this link targets a document of `doc_type`
    pub fn document_of_type(&self, doc_type: &str) -> Option<&DocumentLink> {
        match self {
            Self::Document(link) if link.doc_type == doc_type => Some(link),
            _ => None,
        }
    }

    /// Target URL for links that carry one directly
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Document(_) => None,
            Self::Web(link) => Some(&link.url),
            Self::File(link) => Some(&link.url),
            Self::Image(link) => Some(&link.url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLink {
    pub id: String,
    pub doc_type: String,
    pub uid: Option<String>,
    pub slug: Option<String>,
    pub tags: Vec<String>,
    /// The target no longer exists in the repository
    pub broken: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// An ordered sequence of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Vec<Record>);

impl Group {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Record> for Group {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One entry of a group: field name to fragment, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Fragment>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, fragment: impl Into<Fragment>) -> Self {
        self.0.insert(name.into(), fragment.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.0.iter().map(|(name, fragment)| (name.as_str(), fragment))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Block of a structured text field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TextBlock {
    Heading1 { text: String },
    Heading2 { text: String },
    Heading3 { text: String },
    Heading4 { text: String },
    Heading5 { text: String },
    Heading6 { text: String },
    Paragraph { text: String },
    Preformatted { text: String },
    ListItem { text: String },
    OListItem { text: String },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Embed {
        #[serde(default)]
        oembed: serde_json::Value,
    },
}

impl TextBlock {
    /// The text content, if this block carries any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Heading1 { text }
            | Self::Heading2 { text }
            | Self::Heading3 { text }
            | Self::Heading4 { text }
            | Self::Heading5 { text }
            | Self::Heading6 { text }
            | Self::Paragraph { text }
            | Self::Preformatted { text }
            | Self::ListItem { text }
            | Self::OListItem { text } => Some(text),
            Self::Image { .. } | Self::Embed { .. } => None,
        }
    }
}

// Wire shape of a fragment: `{"type": "...", "value": ...}`

const KNOWN_KINDS: [&str; 11] = [
    "Link.document",
    "Link.web",
    "Link.file",
    "Link.image",
    "Text",
    "StructuredText",
    "Number",
    "Date",
    "Color",
    "Select",
    "Group",
];

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireFragment {
    Known(RawFragment),
    Other {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        value: serde_json::Value,
    },
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
enum RawFragment {
    #[serde(rename = "Link.document")]
    DocumentLink(RawDocumentLink),
    #[serde(rename = "Link.web")]
    WebLink(WebLink),
    #[serde(rename = "Link.file")]
    FileLink(FileLink),
    #[serde(rename = "Link.image")]
    ImageLink(ImageLink),
    Text(String),
    StructuredText(Vec<TextBlock>),
    Number(f64),
    Date(String),
    Color(String),
    Select(String),
    Group(Group),
}

#[derive(Clone, Serialize, Deserialize)]
struct RawDocumentLink {
    document: RawDocumentRef,
    #[serde(rename = "isBroken", default)]
    is_broken: bool,
}

#[derive(Clone, Serialize, Deserialize)]
struct RawDocumentRef {
    id: String,
    #[serde(rename = "type")]
    doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl TryFrom<WireFragment> for Fragment {
    type Error = String;

    fn try_from(wire: WireFragment) -> Result<Self, Self::Error> {
        match wire {
            WireFragment::Known(raw) => Ok(raw.into()),
            WireFragment::Other { kind, .. } if KNOWN_KINDS.contains(&kind.as_str()) => {
                Err(format!("invalid value for {kind} fragment"))
            }
            WireFragment::Other { kind, value } => Ok(Fragment::Other { kind, value }),
        }
    }
}

impl From<RawFragment> for Fragment {
    fn from(raw: RawFragment) -> Self {
        match raw {
            RawFragment::DocumentLink(raw) => Fragment::Link(Link::Document(DocumentLink {
                id: raw.document.id,
                doc_type: raw.document.doc_type,
                uid: raw.document.uid,
                slug: raw.document.slug,
                tags: raw.document.tags,
                broken: raw.is_broken,
            })),
            RawFragment::WebLink(link) => Fragment::Link(Link::Web(link)),
            RawFragment::FileLink(link) => Fragment::Link(Link::File(link)),
            RawFragment::ImageLink(link) => Fragment::Link(Link::Image(link)),
            RawFragment::Text(text) => Fragment::Text(text),
            RawFragment::StructuredText(blocks) => Fragment::StructuredText(blocks),
            RawFragment::Number(n) => Fragment::Number(n),
            RawFragment::Date(d) => Fragment::Date(d),
            RawFragment::Color(c) => Fragment::Color(c),
            RawFragment::Select(s) => Fragment::Select(s),
            RawFragment::Group(g) => Fragment::Group(g),
        }
    }
}

impl From<Fragment> for WireFragment {
    fn from(fragment: Fragment) -> Self {
        let raw = match fragment {
            Fragment::Other { kind, value } => return WireFragment::Other { kind, value },
            Fragment::Link(Link::Document(link)) => RawFragment::DocumentLink(RawDocumentLink {
                document: RawDocumentRef {
                    id: link.id,
                    doc_type: link.doc_type,
                    uid: link.uid,
                    slug: link.slug,
                    tags: link.tags,
                },
                is_broken: link.broken,
            }),
            Fragment::Link(Link::Web(link)) => RawFragment::WebLink(link),
            Fragment::Link(Link::File(link)) => RawFragment::FileLink(link),
            Fragment::Link(Link::Image(link)) => RawFragment::ImageLink(link),
            Fragment::Text(text) => RawFragment::Text(text),
            Fragment::StructuredText(blocks) => RawFragment::StructuredText(blocks),
            Fragment::Number(n) => RawFragment::Number(n),
            Fragment::Date(d) => RawFragment::Date(d),
            Fragment::Color(c) => RawFragment::Color(c),
            Fragment::Select(s) => RawFragment::Select(s),
            Fragment::Group(g) => RawFragment::Group(g),
        };
        WireFragment::Known(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_get_requires_type_prefix() {
        let doc = Document::new("D1", "link-list").with_fragment("links", Group::default().into());

        assert!(doc.get("link-list.links").is_some());
        assert!(doc.get("menu.links").is_none());
        assert!(doc.get("links").is_none());
        assert!(doc.get("link-list.other").is_none());
    }

    #[test]
    fn test_parse_document_link_fragment() {
        let json = r#"{
            "type": "Link.document",
            "value": {
                "document": {"id": "X1", "type": "page", "slug": "about", "tags": ["a"]},
                "isBroken": true
            }
        }"#;
        let fragment: Fragment = serde_json::from_str(json).unwrap();
        let link = fragment.as_link().unwrap();

        match link {
            Link::Document(doc) => {
                assert_eq!(doc.id, "X1");
                assert_eq!(doc.doc_type, "page");
                assert_eq!(doc.slug.as_deref(), Some("about"));
                assert!(doc.broken);
            }
            other => panic!("expected a document link, got {other:?}"),
        }
        assert!(link.document_of_type("page").is_some());
        assert!(link.document_of_type("link-list").is_none());
    }

    #[test]
    fn test_parse_record_keeps_field_order() {
        let json = r#"{
            "zeta": {"type": "Text", "value": "z"},
            "link": {"type": "Link.web", "value": {"url": "https://example.com"}},
            "alpha": {"type": "Select", "value": "a"}
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["zeta", "link", "alpha"]);
        assert_eq!(
            record.get("link").and_then(Fragment::as_link).and_then(Link::url),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_unknown_fragment_kind_passes_through() {
        let json = r#"{
            "link": {"type": "Link.web", "value": {"url": "https://example.com"}},
            "icon": {"type": "Image", "value": {"main": {"url": "https://cdn.example.com/i.png"}}},
            "published": {"type": "Timestamp", "value": "2016-05-01T10:00:00+0000"}
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();

        match record.get("icon") {
            Some(Fragment::Other { kind, value }) => {
                assert_eq!(kind, "Image");
                assert_eq!(value["main"]["url"], "https://cdn.example.com/i.png");
            }
            other => panic!("expected a pass-through fragment, got {other:?}"),
        }
        assert_eq!(
            record.get("published").map(Fragment::as_text).as_deref(),
            Some("2016-05-01T10:00:00+0000")
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["icon"]["type"], "Image");
        assert_eq!(value["published"]["value"], "2016-05-01T10:00:00+0000");
    }

    #[test]
    fn test_malformed_known_fragment_is_rejected() {
        let json = r#"{"type": "Link.web", "value": {"href": "missing url"}}"#;
        assert!(serde_json::from_str::<Fragment>(json).is_err());
    }

    #[test]
    fn test_document_link_serializes_in_wire_shape() {
        let fragment = Fragment::Link(Link::document("X1", "link-list"));
        let value = serde_json::to_value(&fragment).unwrap();

        assert_eq!(value["type"], "Link.document");
        assert_eq!(value["value"]["document"]["id"], "X1");
        assert_eq!(value["value"]["isBroken"], false);
    }
}
