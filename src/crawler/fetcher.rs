//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Honoring the site's robots.txt, fetched once per session
//! - Mapping transport and status failures to [`FetchError`]
//!
//! The coordinator only sees the [`Fetcher`] trait so tests can serve pages
//! from memory.

use crate::config::{Config, UserAgentConfig};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::MirrorError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use url::Url;

/// Longest Crawl-delay honored; larger values from robots.txt are clamped
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(300);

/// Errors for a single page request
///
/// None of these stop a crawl; the coordinator logs them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Disallowed by robots.txt: {url}")]
    Disallowed { url: String },
}

/// Source of page markup
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieves the body of a page as text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Minimum delay the site asks for between requests, if known
    fn crawl_delay(&self) -> Option<Duration> {
        None
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total time allowed for one request
///
/// # Example
///
/// ```no_run
/// use codes_mirror::config::UserAgentConfig;
/// use codes_mirror::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "CodesMirror".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    /// Product token matched against robots.txt groups
    agent: String,
    /// `None` when robots.txt is ignored
    robots_url: Option<String>,
    robots: OnceCell<ParsedRobots>,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration
    ///
    /// robots.txt is resolved against the site root of the configured base URL
    /// and is not requested until the first page fetch.
    pub fn new(config: &Config) -> Result<Self, MirrorError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;

        let robots_url = if config.crawler.respect_robots_txt {
            let base = Url::parse(&config.crawler.base_url)?;
            Some(base.join("/robots.txt")?.to_string())
        } else {
            None
        };

        Ok(Self {
            client,
            agent: config.user_agent.crawler_name.clone(),
            robots_url,
            robots: OnceCell::new(),
        })
    }

    async fn robots(&self) -> Option<&ParsedRobots> {
        let robots_url = self.robots_url.as_deref()?;
        let robots = self
            .robots
            .get_or_init(|| async move {
                tracing::debug!("Fetching {}", robots_url);
                let robots = fetch_robots(&self.client, robots_url).await;
                if let Some(seconds) = robots.crawl_delay(&self.agent) {
                    if seconds > MAX_CRAWL_DELAY.as_secs_f64() {
                        tracing::warn!(
                            "Crawl-delay {} in {} is out of range, using {}s",
                            seconds,
                            robots_url,
                            MAX_CRAWL_DELAY.as_secs()
                        );
                    }
                }
                robots
            })
            .await;
        Some(robots)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if let Some(robots) = self.robots().await {
            if !robots.is_allowed(url, &self.agent) {
                return Err(FetchError::Disallowed {
                    url: url.to_string(),
                });
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    fn crawl_delay(&self) -> Option<Duration> {
        let seconds = self.robots.get()?.crawl_delay(&self.agent)?;
        clamp_crawl_delay(seconds)
    }
}

/// Converts a Crawl-delay value, capping it at [`MAX_CRAWL_DELAY`]
///
/// Negative and NaN values are ignored.
fn clamp_crawl_delay(seconds: f64) -> Option<Duration> {
    if seconds.is_nan() || seconds < 0.0 {
        return None;
    }
    Some(
        Duration::try_from_secs_f64(seconds)
            .map_or(MAX_CRAWL_DELAY, |delay| delay.min(MAX_CRAWL_DELAY)),
    )
}
