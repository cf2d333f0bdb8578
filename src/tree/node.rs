//! Node and paragraph types of a document tree

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a node represents, derived from which of its fields are populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Table-of-contents page with child links
    TableOfContents,
    /// Section page with paragraphs
    Leaf,
    /// Not fetched yet, or the last fetch produced nothing
    Unvisited,
}

/// One paragraph of a section page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Zero-based position within the section
    pub order: usize,

    /// Trimmed paragraph text
    pub text: String,

    /// Indentation depth from a `level-N` class, as `N - 1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_level: Option<u32>,
}

/// Parsed content of a section page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafContent {
    pub effective_date: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

impl LeafContent {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// A page in the document tree
///
/// A node holds either child links or paragraphs, never both. The setters
/// below are the only way to populate a node so that rule always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    children: IndexMap<String, Node>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    paragraphs: Vec<Paragraph>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    effective_date: Option<String>,
}

impl Node {
    /// Creates an unvisited node for a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates an unvisited node with a subtitle
    pub fn with_title(url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            url: url.into(),
            title,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> NodeKind {
        if !self.children.is_empty() {
            NodeKind::TableOfContents
        } else if !self.paragraphs.is_empty() {
            NodeKind::Leaf
        } else {
            NodeKind::Unvisited
        }
    }

    /// Returns true once the node holds data, which makes dedupe skip it
    pub fn is_populated(&self) -> bool {
        self.kind() != NodeKind::Unvisited
    }

    pub fn children(&self) -> &IndexMap<String, Node> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn effective_date(&self) -> Option<&str> {
        self.effective_date.as_deref()
    }

    /// Turns the node into a table-of-contents node with the given children
    ///
    /// Children are stored in the given order. A child whose name was already
    /// present keeps its cached subtree; only its URL and title are refreshed.
    /// Names that no longer appear are dropped.
    pub fn set_children(&mut self, children: IndexMap<String, Node>) {
        let mut previous = std::mem::take(&mut self.children);

        self.children = children
            .into_iter()
            .map(|(name, mut fresh)| {
                if let Some(cached) = previous.swap_remove(&name) {
                    fresh.children = cached.children;
                    fresh.paragraphs = cached.paragraphs;
                    fresh.effective_date = cached.effective_date;
                }
                (name, fresh)
            })
            .collect();

        self.paragraphs.clear();
        self.effective_date = None;
    }

    /// Turns the node into a leaf holding the parsed section content
    pub fn set_leaf(&mut self, content: LeafContent) {
        self.children.clear();
        self.paragraphs = content.paragraphs;
        self.effective_date = content.effective_date;
    }

    /// Returns true if both children and paragraphs are set, which only a
    /// hand-edited cache file can produce
    pub(crate) fn is_mixed(&self) -> bool {
        !self.children.is_empty() && !self.paragraphs.is_empty()
    }
}
