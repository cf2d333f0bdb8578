use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Base URL of the Ohio codes website
pub const DEFAULT_BASE_URL: &str = "https://codes.ohio.gov/";

/// Seconds to wait between page requests
pub const DEFAULT_REQUEST_DELAY: f64 = 2.0;

/// Largest accepted request-delay (one hour)
pub const MAX_REQUEST_DELAY: f64 = 3600.0;

/// Main configuration structure for codes-mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Path of the JSON cache file for a document
    pub fn cache_path(&self, document: Document) -> PathBuf {
        PathBuf::from(&self.output.cache_dir).join(format!("{}.json", document))
    }

    /// Root URL of a document, e.g. `https://codes.ohio.gov/ohio-constitution`
    pub fn document_url(&self, document: Document) -> String {
        format!("{}{}", self.crawler.base_url, document)
    }
}

/// One of the three document trees published on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Document {
    OhioConstitution,
    OhioRevisedCode,
    OhioAdministrativeCode,
}

impl Document {
    /// All known documents, in the order the site lists them
    pub const ALL: [Document; 3] = [
        Document::OhioConstitution,
        Document::OhioRevisedCode,
        Document::OhioAdministrativeCode,
    ];

    /// The path segment identifying this document on the site
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OhioConstitution => "ohio-constitution",
            Self::OhioRevisedCode => "ohio-revised-code",
            Self::OhioAdministrativeCode => "ohio-administrative-code",
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Document {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::ALL
            .into_iter()
            .find(|doc| doc.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownDocument(s.to_string()))
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL of the site, always ending with a slash after validation
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Document tree to mirror
    #[serde(default = "default_document")]
    pub document: Document,

    /// Delay before every child page request (seconds)
    #[serde(rename = "request-delay", default = "default_request_delay")]
    pub request_delay: f64,

    /// Whether to honor the site's robots.txt
    #[serde(rename = "respect-robots-txt", default = "default_true")]
    pub respect_robots_txt: bool,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay.min(MAX_REQUEST_DELAY)).unwrap_or_default()
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            document: default_document(),
            request_delay: default_request_delay(),
            respect_robots_txt: true,
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_document() -> Document {
    Document::OhioConstitution
}

fn default_request_delay() -> f64 {
    DEFAULT_REQUEST_DELAY
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Full user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one `<document>.json` cache per document
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_str() {
        assert_eq!(
            "ohio-revised-code".parse::<Document>().unwrap(),
            Document::OhioRevisedCode
        );
        assert!(matches!(
            "ohio-tax-code".parse::<Document>(),
            Err(ConfigError::UnknownDocument(_))
        ));
    }

    #[test]
    fn test_cache_path_and_document_url() {
        let config = Config {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig {
                crawler_name: "Test".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com".to_string(),
                contact_email: "a@example.com".to_string(),
            },
            output: OutputConfig {
                cache_dir: "/tmp/cache".to_string(),
                summary_path: "/tmp/summary.md".to_string(),
            },
        };

        assert_eq!(
            config.cache_path(Document::OhioAdministrativeCode),
            PathBuf::from("/tmp/cache/ohio-administrative-code.json")
        );
        assert_eq!(
            config.document_url(Document::OhioConstitution),
            "https://codes.ohio.gov/ohio-constitution"
        );
    }
}
