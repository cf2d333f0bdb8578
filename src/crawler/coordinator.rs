//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that walks one document tree:
//! - Loading the cached tree at session start
//! - Depth-first descent over an explicit worklist of paths
//! - Skipping nodes that already hold data (dedupe)
//! - Fetching, classifying and parsing each remaining page
//! - Persisting the whole tree after every populated page
//!
//! A failed fetch leaves its node unvisited so the next run retries it. A
//! failed save aborts the session.

use crate::config::{Config, Document};
use crate::crawler::classifier::{classify_document, PageKind};
use crate::crawler::leaf::parse_leaf_document;
use crate::crawler::toc::parse_toc_document;
use crate::crawler::{Fetcher, HttpFetcher};
use crate::storage::{open_storage, JsonFileStorage, Storage};
use crate::tree::{DocumentTree, TreeError};
use crate::MirrorError;
use scraper::Html;
use std::time::Duration;
use tracing::{Instrument, Span};
use url::Url;

/// A fetch that failed during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub path: Vec<String>,
    pub url: String,
    pub message: String,
}

/// Counters for one crawl session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages retrieved successfully
    pub pages_fetched: usize,
    /// Nodes skipped because they already held data
    pub pages_skipped: usize,
    /// Times the tree was written to storage
    pub saves: usize,
    pub failures: Vec<FetchFailure>,
}

/// A path waiting on the worklist
struct Pending {
    path: Vec<String>,
    /// Children wait out the request delay, the starting node does not
    is_child: bool,
}

/// Main crawler coordinator structure
///
/// Owns the document tree and its storage for the whole session.
pub struct Coordinator<F = HttpFetcher, S = JsonFileStorage> {
    fetcher: F,
    storage: S,
    tree: DocumentTree,
    base_url: Url,
    document: Document,
    request_delay: Duration,
    span: Span,
    report: CrawlReport,
}

impl<F: Fetcher, S: Storage> Coordinator<F, S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `document` - The document tree to mirror
    /// * `fetcher` - Source of page markup
    /// * `storage` - Backend holding the cached tree
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - The cached tree was loaded, or a fresh tree was created
    /// * `Err(MirrorError)` - The cache exists but could not be read
    pub fn new(
        config: &Config,
        document: Document,
        fetcher: F,
        storage: S,
    ) -> Result<Self, MirrorError> {
        let base_url = Url::parse(&config.crawler.base_url)?;
        let span = tracing::info_span!("crawl", document = %document);

        let tree = span.in_scope(|| storage.load(document.as_str(), &config.document_url(document)))?;

        Ok(Self {
            fetcher,
            storage,
            tree,
            base_url,
            document,
            request_delay: config.crawler.request_delay(),
            span,
            report: CrawlReport::default(),
        })
    }

    /// Replaces the session span every crawl event is recorded in
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    pub fn into_tree(self) -> DocumentTree {
        self.tree
    }

    /// Crawls the whole document from its root
    pub async fn run(&mut self, dedupe: bool) -> Result<&DocumentTree, MirrorError> {
        self.crawl(&[], dedupe).await
    }

    /// Crawls the subtree at `path`
    ///
    /// With `dedupe`, nodes that already hold data are not fetched again, but
    /// the children of cached tables of contents are still walked so earlier
    /// failures get retried.
    ///
    /// # Errors
    ///
    /// * `MirrorError::Tree` - `path` does not exist in the tree
    /// * `MirrorError::Storage` - The tree could not be saved
    pub async fn crawl(
        &mut self,
        path: &[String],
        dedupe: bool,
    ) -> Result<&DocumentTree, MirrorError> {
        let span = self.span.clone();
        self.walk(path, dedupe).instrument(span).await?;
        Ok(&self.tree)
    }

    async fn walk(&mut self, start: &[String], dedupe: bool) -> Result<(), MirrorError> {
        self.tree.get(start)?;

        tracing::info!("Starting crawl at {}", display_path(start));
        let mut worklist = vec![Pending {
            path: start.to_vec(),
            is_child: false,
        }];

        while let Some(pending) = worklist.pop() {
            self.visit(&pending, dedupe).await?;

            // Reversed so the first child is popped first
            let node = self.tree.get(&pending.path)?;
            for name in node.children().keys().rev() {
                let mut path = pending.path.clone();
                path.push(name.clone());
                if self.links_to_ancestor(&path) {
                    tracing::warn!("Skipping {}: links back to an ancestor", display_path(&path));
                    continue;
                }
                worklist.push(Pending {
                    path,
                    is_child: true,
                });
            }
        }

        tracing::info!(
            "Crawl finished: {} fetched, {} skipped, {} failed, {} saves",
            self.report.pages_fetched,
            self.report.pages_skipped,
            self.report.failures.len(),
            self.report.saves
        );
        Ok(())
    }

    /// Fetches and stores one node unless dedupe skips it
    async fn visit(&mut self, pending: &Pending, dedupe: bool) -> Result<(), MirrorError> {
        let node = self.tree.get(&pending.path)?;
        if dedupe && node.is_populated() {
            tracing::debug!("Already cached: {}", display_path(&pending.path));
            self.report.pages_skipped += 1;
            return Ok(());
        }
        let url = node.url.clone();

        if pending.is_child {
            let delay = self.effective_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        tracing::info!("Fetching {} ({})", display_path(&pending.path), url);
        let raw = match self.fetcher.fetch_text(&url).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", display_path(&pending.path), e);
                self.report.failures.push(FetchFailure {
                    path: pending.path.clone(),
                    url,
                    message: e.to_string(),
                });
                return Ok(());
            }
        };
        self.report.pages_fetched += 1;

        if self.apply_page(&pending.path, &raw)? {
            self.persist()?;
        }
        Ok(())
    }

    /// Classifies and parses a page into the node at `path`
    ///
    /// Returns false when the page yielded nothing, which leaves the node
    /// unvisited.
    fn apply_page(&mut self, path: &[String], raw_html: &str) -> Result<bool, TreeError> {
        let html = Html::parse_document(raw_html);
        let node = self.tree.get_mut(path)?;

        match classify_document(&html) {
            PageKind::TableOfContents => {
                let children = parse_toc_document(&html, &self.base_url, self.document.as_str());
                if children.is_empty() {
                    tracing::warn!("Table of contents without entries at {}", node.url);
                    return Ok(false);
                }
                tracing::debug!("{} children at {}", children.len(), display_path(path));
                node.set_children(children);
            }
            PageKind::Leaf => {
                let content = parse_leaf_document(&html);
                if content.is_empty() {
                    tracing::debug!("No section text at {}", node.url);
                    return Ok(false);
                }
                node.set_leaf(content);
            }
        }

        Ok(true)
    }

    fn persist(&mut self) -> Result<(), MirrorError> {
        if let Err(e) = self.storage.save(&self.tree) {
            tracing::error!("Failed to save {}: {}", self.document, e);
            return Err(e.into());
        }
        self.report.saves += 1;
        Ok(())
    }

    /// True when the node at `path` has the URL of a node above it
    fn links_to_ancestor(&self, path: &[String]) -> bool {
        let Ok(node) = self.tree.get(path) else {
            return false;
        };
        (0..path.len()).any(|depth| {
            self.tree
                .get(&path[..depth])
                .is_ok_and(|ancestor| ancestor.url == node.url)
        })
    }

    /// Configured delay, raised to the site's Crawl-delay when that is longer
    fn effective_delay(&self) -> Duration {
        match self.fetcher.crawl_delay() {
            Some(robots_delay) => self.request_delay.max(robots_delay),
            None => self.request_delay,
        }
    }
}

fn display_path(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}

/// Runs a complete crawl of one document
///
/// Builds the HTTP fetcher and the JSON cache from configuration, then crawls
/// from the document root.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `document` - The document tree to mirror
/// * `dedupe` - Skip nodes that already hold data
///
/// # Example
///
/// ```no_run
/// use codes_mirror::config::load_config;
/// use codes_mirror::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let report = run_crawl(&config, config.crawler.document, true).await?;
/// println!("{} pages fetched", report.pages_fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    document: Document,
    dedupe: bool,
) -> Result<CrawlReport, MirrorError> {
    let fetcher = HttpFetcher::new(config)?;
    let storage = open_storage(config, document);

    let mut coordinator = Coordinator::new(config, document, fetcher, storage)?;
    coordinator.run(dedupe).await?;
    Ok(coordinator.report().clone())
}
