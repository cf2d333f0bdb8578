//! Configuration module for codes-mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use codes_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Cache file: {}", config.cache_path(config.crawler.document).display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, Document, OutputConfig, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_DELAY, MAX_REQUEST_DELAY,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
