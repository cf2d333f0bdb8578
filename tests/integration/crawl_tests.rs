//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small copy of the codes site and run
//! the full fetch, parse and persist cycle against a temporary cache.

use codes_mirror::config::{parse_config, Config, Document};
use codes_mirror::crawler::{run_crawl, Coordinator, HttpFetcher};
use codes_mirror::storage::{open_storage, Storage, StorageError};
use codes_mirror::tree::{DocumentTree, NodeKind};
use codes_mirror::MirrorError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC: Document = Document::OhioConstitution;

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, cache_dir: &Path) -> Config {
    parse_config(&format!(
        r#"
[crawler]
base-url = "{}/"
document = "ohio-constitution"
request-delay = 0.0
request-timeout = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
cache-dir = "{}"
summary-path = "{}/summary.md"
"#,
        base_url,
        cache_dir.display(),
        cache_dir.display()
    ))
    .expect("valid test config")
}

fn toc_page(links: &[(&str, &str)]) -> String {
    let rows: String = links
        .iter()
        .map(|(href, label)| format!(r#"<tr><td><a href="{}">{}</a></td></tr>"#, href, label))
        .collect();
    format!(
        r#"<html><body>
             <a class="btn" href="/ohio-constitution/pdf">PDF</a>
             <table class="laws-table"><tbody>{}</tbody></table>
           </body></html>"#,
        rows
    )
}

fn leaf_page(date: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<p class="level-1">{}</p>"#, p))
        .collect();
    format!(
        r#"<html><body>
             <div class="laws-section-info-module">
               <div class="label">Effective:</div><div class="value">{}</div>
             </div>
             <section class="laws-body">{}</section>
           </body></html>"#,
        date, body
    )
}

/// Mounts one page, expected to be requested `times` times over the test
async fn mount_page(server: &MockServer, page_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_error(server: &MockServer, page_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_root(server: &MockServer, times: u64) {
    let root = toc_page(&[
        (
            "/ohio-constitution/article-1",
            "Article I<span>|</span> Bill of Rights",
        ),
        ("/ohio-constitution/article-2", "Article II"),
    ]);
    mount_page(server, "/ohio-constitution", root, times).await;
}

async fn mount_article_1(server: &MockServer, times: u64) {
    let article = toc_page(&[(
        "/ohio-constitution/section-1.1",
        "Section 1.01, Inalienable Rights",
    )]);
    mount_page(server, "/ohio-constitution/article-1", article, times).await;
}

async fn mount_section_1_1(server: &MockServer, times: u64) {
    let section = leaf_page(
        "1851",
        &["All men are, by nature, free and independent."],
    );
    mount_page(server, "/ohio-constitution/section-1.1", section, times).await;
}

async fn mount_article_2(server: &MockServer, times: u64) {
    let section = leaf_page(
        "1851",
        &[
            "The legislative power of the state shall be vested in a general assembly.",
            "The people reserve to themselves the power to propose laws.",
        ],
    );
    mount_page(server, "/ohio-constitution/article-2", section, times).await;
}

fn load_cache(config: &Config) -> DocumentTree {
    open_storage(config, DOC)
        .load(DOC.as_str(), &config.document_url(DOC))
        .expect("cache loads")
}

#[tokio::test]
async fn test_full_crawl_writes_cache() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    mount_root(&mock_server, 1).await;
    mount_article_1(&mock_server, 1).await;
    mount_section_1_1(&mock_server, 1).await;
    mount_article_2(&mock_server, 1).await;

    let report = run_crawl(&config, DOC, true).await.unwrap();
    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.saves, 4);
    assert!(report.failures.is_empty());

    assert!(config.cache_path(DOC).exists());
    let tree = load_cache(&config);

    let names: Vec<&String> = tree.root.children().keys().collect();
    assert_eq!(names, vec!["Article I", "Article II"]);

    let article = tree.get(&["Article I"]).unwrap();
    assert_eq!(article.title.as_deref(), Some("Bill of Rights"));
    assert_eq!(
        article.url,
        format!("{}/ohio-constitution/article-1", mock_server.uri())
    );

    let section = tree.get(&["Article I", "Inalienable Rights"]).unwrap();
    assert_eq!(section.kind(), NodeKind::Leaf);
    assert_eq!(section.effective_date(), Some("1851"));
    assert_eq!(section.paragraphs()[0].indent_level, Some(0));

    let article_2 = tree.get(&["Article II"]).unwrap();
    let orders: Vec<usize> = article_2.paragraphs().iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    // Each page is fetched exactly once across both runs
    mount_root(&mock_server, 1).await;
    mount_article_1(&mock_server, 1).await;
    mount_section_1_1(&mock_server, 1).await;
    mount_article_2(&mock_server, 1).await;

    run_crawl(&config, DOC, true).await.unwrap();
    let first = fs::read(config.cache_path(DOC)).unwrap();

    let report = run_crawl(&config, DOC, true).await.unwrap();
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.pages_skipped, 4);
    assert_eq!(report.saves, 0);

    let second = fs::read(config.cache_path(DOC)).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resume_fetches_only_missing_pages() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    // First run: the site goes down after the tables of contents
    mount_root(&mock_server, 1).await;
    mount_article_1(&mock_server, 1).await;
    mount_error(&mock_server, "/ohio-constitution/section-1.1", 503).await;
    mount_error(&mock_server, "/ohio-constitution/article-2", 503).await;

    let report = run_crawl(&config, DOC, true).await.unwrap();
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.failures.len(), 2);

    let partial = load_cache(&config);
    assert_eq!(
        partial.get(&["Article II"]).unwrap().kind(),
        NodeKind::Unvisited
    );

    mock_server.verify().await;
    mock_server.reset().await;

    // Second run: cached pages must not be requested again
    mount_root(&mock_server, 0).await;
    mount_article_1(&mock_server, 0).await;
    mount_section_1_1(&mock_server, 1).await;
    mount_article_2(&mock_server, 1).await;

    let report = run_crawl(&config, DOC, true).await.unwrap();
    assert_eq!(report.pages_fetched, 2);
    assert!(report.failures.is_empty());

    let tree = load_cache(&config);
    assert_eq!(
        tree.get(&["Article I", "Inalienable Rights"]).unwrap().kind(),
        NodeKind::Leaf
    );
    assert_eq!(tree.get(&["Article II"]).unwrap().kind(), NodeKind::Leaf);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    mount_root(&mock_server, 1).await;
    mount_error(&mock_server, "/ohio-constitution/article-1", 500).await;
    mount_article_2(&mock_server, 1).await;

    let report = run_crawl(&config, DOC, true).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, vec!["Article I".to_string()]);
    assert!(report.failures[0].message.contains("500"));

    let tree = load_cache(&config);
    assert_eq!(tree.get(&["Article I"]).unwrap().kind(), NodeKind::Unvisited);
    assert_eq!(tree.get(&["Article II"]).unwrap().kind(), NodeKind::Leaf);
}

#[tokio::test]
async fn test_robots_disallowed_pages_are_skipped() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /ohio-constitution/article-2\n"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_root(&mock_server, 1).await;
    mount_article_1(&mock_server, 1).await;
    mount_section_1_1(&mock_server, 1).await;
    mount_article_2(&mock_server, 0).await;

    let report = run_crawl(&config, DOC, true).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.contains("robots.txt"));

    let tree = load_cache(&config);
    assert_eq!(tree.get(&["Article II"]).unwrap().kind(), NodeKind::Unvisited);
}

#[tokio::test]
async fn test_corrupt_cache_aborts_before_fetching() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    fs::write(config.cache_path(DOC), "{ not json").unwrap();
    mount_root(&mock_server, 0).await;

    let result = run_crawl(&config, DOC, true).await;
    assert!(matches!(
        result,
        Err(MirrorError::Storage(StorageError::Corrupt { .. }))
    ));

    // The broken file is left for inspection
    assert_eq!(fs::read_to_string(config.cache_path(DOC)).unwrap(), "{ not json");
}

#[tokio::test]
async fn test_crawl_subtree_with_custom_span() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path());

    mount_root(&mock_server, 1).await;
    mount_error(&mock_server, "/ohio-constitution/article-1", 503).await;
    mount_error(&mock_server, "/ohio-constitution/article-2", 503).await;
    run_crawl(&config, DOC, true).await.unwrap();

    mock_server.reset().await;
    mount_article_2(&mock_server, 1).await;

    let fetcher = HttpFetcher::new(&config).unwrap();
    let mut coordinator = Coordinator::new(&config, DOC, fetcher, open_storage(&config, DOC))
        .unwrap()
        .with_span(tracing::info_span!("subtree-test"));

    let tree = coordinator
        .crawl(&["Article II".to_string()], true)
        .await
        .unwrap();
    assert_eq!(tree.get(&["Article II"]).unwrap().kind(), NodeKind::Leaf);
    assert_eq!(tree.get(&["Article I"]).unwrap().kind(), NodeKind::Unvisited);

    assert_eq!(coordinator.report().pages_fetched, 1);
    assert_eq!(load_cache(&config), *coordinator.tree());
}
