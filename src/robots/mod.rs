//! Robots.txt handling module
//!
//! The site's robots.txt is fetched once per crawl session. A missing or
//! unreachable file allows everything.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;

/// Fetches and parses robots.txt
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `robots_url` - Absolute URL of the robots.txt file
///
/// # Returns
///
/// The parsed rules, or [`ParsedRobots::allow_all`] when the file cannot be
/// retrieved
pub async fn fetch_robots(client: &Client, robots_url: &str) -> ParsedRobots {
    let response = match client.get(robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Could not fetch {}: {}; allowing all", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "No robots.txt at {} (HTTP {}); allowing all",
            robots_url,
            response.status().as_u16()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Could not read {}: {}; allowing all", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
