//! codes-mirror: an incremental mirror of the Ohio legal codes
//!
//! This crate walks the table-of-contents pages of codes.ohio.gov down to the
//! individual section pages, extracts their text into a tree, and persists the
//! tree after every page so that an interrupted crawl resumes where it stopped.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod storage;
pub mod tree;
pub mod url;
pub mod view;

use thiserror::Error;

/// Main error type for codes-mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Tree error: {0}")]
    Tree(#[from] tree::TreeError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown document: {0}")]
    UnknownDocument(String),
}

/// Result type alias for codes-mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Document};
pub use crawler::{Coordinator, CrawlReport, Fetcher, HttpFetcher};
pub use tree::{DocumentTree, Node, NodeKind, Paragraph};
pub use view::{Library, PageView};
