//! Storage traits and error types
//!
//! This module defines the trait interface for tree storage backends and
//! associated error types.

use crate::tree::DocumentTree;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read cache {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt cache {}: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write cache {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for tree storage backends
///
/// The whole tree is read at session start and rewritten after every page,
/// so backends store one complete document per tree rather than patches.
pub trait Storage {
    /// Loads the tree for a document
    ///
    /// A missing cache is the normal first-run state and yields an empty
    /// tree rooted at `root_url`.
    ///
    /// # Arguments
    ///
    /// * `name` - Document identifier
    /// * `root_url` - URL of the document's top-level table of contents
    fn load(&self, name: &str, root_url: &str) -> StorageResult<DocumentTree>;

    /// Replaces the stored tree
    ///
    /// Readers must never observe a partially written tree.
    fn save(&self, tree: &DocumentTree) -> StorageResult<()>;
}
