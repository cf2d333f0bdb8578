//! JSON file storage implementation
//!
//! Each document tree lives in one pretty-printed JSON file so the cache can
//! be diffed between runs.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::tree::DocumentTree;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// JSON file backend holding a single document tree
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage handle for the given cache file
    ///
    /// Nothing is touched on disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, name: &str, root_url: &str) -> StorageResult<DocumentTree> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Cache file not found, starting fresh: {}", self.path.display());
                return Ok(DocumentTree::new(name, root_url));
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let tree: DocumentTree =
            serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if tree.name != name {
            return Err(StorageError::Corrupt {
                path: self.path.clone(),
                message: format!("cache holds '{}', expected '{}'", tree.name, name),
            });
        }

        if let Some(path) = tree.find_mixed_node() {
            return Err(StorageError::Corrupt {
                path: self.path.clone(),
                message: format!("node /{} has both children and paragraphs", path.join("/")),
            });
        }

        tracing::debug!("Loaded cache {}", self.path.display());
        Ok(tree)
    }

    fn save(&self, tree: &DocumentTree) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(tree)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        // Write to a sibling temp file, then rename over the cache
        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path).map_err(|e| self.write_error(e))?;
        let written = file
            .write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                tracing::debug!("Could not remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(self.write_error(e));
        }

        Ok(())
    }
}
