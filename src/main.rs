//! codes-mirror main entry point
//!
//! This is the command-line interface for the Ohio legal codes mirror.

use anyhow::Context;
use clap::Parser;
use codes_mirror::config::{load_config_with_hash, Config, Document};
use codes_mirror::crawler::run_crawl;
use codes_mirror::output::{generate_markdown_summary, print_statistics, TreeStatistics};
use codes_mirror::storage::{open_storage, Storage};
use codes_mirror::view::Library;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// codes-mirror: an incremental mirror of codes.ohio.gov
///
/// Walks the tables of contents of a document down to its sections, saving
/// the tree after every page. An interrupted run resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "codes-mirror")]
#[command(version)]
#[command(about = "An incremental mirror of the Ohio legal codes", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Document to work on, overriding the config file
    #[arg(long, value_name = "DOC")]
    document: Option<Document>,

    /// Refetch every page, even those already cached
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary", "show"])]
    dry_run: bool,

    /// Show statistics from the cache and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary", "show"])]
    stats: bool,

    /// Generate markdown summary from the cache and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "show"])]
    export_summary: bool,

    /// Print a cached page, e.g. "ohio-constitution/Article I"
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    show: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let document = cli.document.unwrap_or(config.crawler.document);

    if cli.dry_run {
        handle_dry_run(&config, document);
    } else if cli.stats {
        handle_stats(&config, cli.document)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else if let Some(location) = &cli.show {
        handle_show(&config, location)?;
    } else {
        handle_crawl(&config, document, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("codes_mirror=info,warn"),
            1 => EnvFilter::new("codes_mirror=debug,info"),
            2 => EnvFilter::new("codes_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, document: Document) {
    println!("=== codes-mirror Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Document: {}", document);
    println!("  Request delay: {}s", config.crawler.request_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots_txt);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Cache: {}", config.cache_path(document).display());
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.document_url(document));
}

/// Handles the --stats mode: shows statistics for one or all documents
fn handle_stats(config: &Config, only: Option<Document>) -> anyhow::Result<()> {
    let library = Library::load(config)?;

    for document in Document::ALL {
        if only.is_some_and(|doc| doc != document) {
            continue;
        }
        if let Some(tree) = library.tree(document) {
            println!("Cache: {}\n", config.cache_path(document).display());
            print_statistics(&TreeStatistics::from_tree(tree));
            println!();
        }
    }

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Mirror Summary ===\n");
    println!("Cache directory: {}", config.output.cache_dir);
    println!("Output: {}", config.output.summary_path);
    println!();

    let library = Library::load(config)?;
    let stats: Vec<TreeStatistics> = Document::ALL
        .into_iter()
        .filter_map(|document| library.tree(document))
        .map(TreeStatistics::from_tree)
        .collect();

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&stats, None, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);
    Ok(())
}

/// Handles the --show mode: prints one cached page
fn handle_show(config: &Config, location: &str) -> anyhow::Result<()> {
    let library = Library::load(config)?;
    let view = library.lookup(location)?;
    print!("{}", view);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, document: Document, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl of {} (refetching cached pages)", document);
    } else {
        tracing::info!("Starting crawl of {} (cached pages are skipped)", document);
    }

    let report = match run_crawl(config, document, !fresh).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    for failure in &report.failures {
        tracing::warn!("Not mirrored: /{} ({})", failure.path.join("/"), failure.message);
    }

    let tree = open_storage(config, document)
        .load(document.as_str(), &config.document_url(document))?;
    generate_markdown_summary(
        &[TreeStatistics::from_tree(&tree)],
        Some(&report),
        Path::new(&config.output.summary_path),
    )?;
    tracing::info!("Summary written to {}", config.output.summary_path);

    tracing::info!("Crawl completed successfully");
    Ok(())
}
