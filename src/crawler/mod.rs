//! Crawler module for mirroring a document tree
//!
//! This module contains the core crawling logic, including:
//! - Page classification (table of contents or section)
//! - Table-of-contents and section parsing
//! - HTTP fetching behind the [`Fetcher`] trait
//! - Overall crawl coordination

mod classifier;
mod coordinator;
mod fetcher;
mod leaf;
mod markup;
mod toc;

pub use classifier::{classify, PageKind};
pub use coordinator::{run_crawl, Coordinator, CrawlReport, FetchFailure};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use leaf::parse_leaf;
pub use toc::parse_toc;
