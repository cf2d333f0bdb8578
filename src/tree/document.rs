//! Document tree aggregate and path resolution

use crate::tree::{Node, TreeError};
use serde::{Deserialize, Serialize};

/// The cached tree of one document, e.g. `ohio-constitution`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    /// Document identifier
    pub name: String,

    /// URL of the document's top-level table of contents
    pub root_url: String,

    pub root: Node,
}

impl DocumentTree {
    /// Creates an empty tree whose root points at the document URL
    pub fn new(name: impl Into<String>, root_url: impl Into<String>) -> Self {
        let root_url = root_url.into();
        Self {
            name: name.into(),
            root: Node::new(root_url.clone()),
            root_url,
        }
    }

    /// Resolves a child-name path from the root
    ///
    /// An empty path resolves to the root node.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Result<&Node, TreeError> {
        let mut node = &self.root;
        for (depth, segment) in path.iter().enumerate() {
            node = node
                .child(segment.as_ref())
                .ok_or_else(|| TreeError::not_found(&self.name, &path[..=depth]))?;
        }
        Ok(node)
    }

    /// Mutable counterpart of [`DocumentTree::get`]
    pub fn get_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Result<&mut Node, TreeError> {
        let mut node = &mut self.root;
        for (depth, segment) in path.iter().enumerate() {
            node = match node.child_mut(segment.as_ref()) {
                Some(child) => child,
                None => return Err(TreeError::not_found(&self.name, &path[..=depth])),
            };
        }
        Ok(node)
    }

    /// Visits every node depth-first in navigation order
    ///
    /// The callback receives the node's path and the node itself.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&[String], &Node),
    {
        let mut stack: Vec<(Vec<String>, &Node)> = vec![(Vec::new(), &self.root)];

        while let Some((path, node)) = stack.pop() {
            f(&path, node);

            for (name, child) in node.children().iter().rev() {
                let mut child_path = path.clone();
                child_path.push(name.clone());
                stack.push((child_path, child));
            }
        }
    }

    /// Returns the path of the first node holding both children and paragraphs
    pub(crate) fn find_mixed_node(&self) -> Option<Vec<String>> {
        let mut found = None;
        self.visit(|path, node| {
            if found.is_none() && node.is_mixed() {
                found = Some(path.to_vec());
            }
        });
        found
    }
}
