//! In-memory document tree
//!
//! A document is a tree of pages: table-of-contents nodes map child names to
//! child nodes in navigation order, and leaf nodes hold the paragraphs of one
//! section. The tree is the unit of persistence, see [`crate::storage`].

mod document;
mod node;

pub use document::DocumentTree;
pub use node::{LeafContent, Node, NodeKind, Paragraph};

use thiserror::Error;

/// Errors from resolving paths in a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Path not found in {document}: /{}", .path.join("/"))]
    NotFound {
        document: String,
        /// Path up to and including the first missing segment
        path: Vec<String>,
    },
}

impl TreeError {
    pub(crate) fn not_found<S: AsRef<str>>(document: &str, path: &[S]) -> Self {
        Self::NotFound {
            document: document.to_string(),
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}
