//! Storage module for persisting document trees
//!
//! This module handles durable storage of the crawl cache:
//! - Loading a whole tree at session start (a missing file means a fresh tree)
//! - Rewriting the whole tree after every populated page
//! - Atomic replacement so readers never see a half-written cache

mod json;
mod traits;

pub use json::JsonFileStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::config::{Config, Document};

/// Opens the JSON cache of a document as configured
pub fn open_storage(config: &Config, document: Document) -> JsonFileStorage {
    JsonFileStorage::new(config.cache_path(document))
}
