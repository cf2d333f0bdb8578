//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of the mirror:
//! per-document node counts, depth breakdown, pending URLs and, after a
//! crawl, the session's fetch failures.

use crate::crawler::CrawlReport;
use crate::output::stats::TreeStatistics;
use crate::output::{OutputError, OutputResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Generates a markdown summary and writes it to `output_path`
///
/// # Arguments
///
/// * `stats` - Statistics for each document to include
/// * `report` - Counters from the crawl that just ran, if any
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    stats: &[TreeStatistics],
    report: Option<&CrawlReport>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats, report, Utc::now());

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;
    }
    fs::write(output_path, markdown).map_err(|source| OutputError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Formats statistics as markdown
pub fn format_markdown_summary(
    stats: &[TreeStatistics],
    report: Option<&CrawlReport>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut md = String::new();

    md.push_str("# Ohio Codes Mirror Summary\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if let Some(report) = report {
        md.push_str("## Last Crawl\n\n");
        md.push_str(&format!("- **Pages Fetched**: {}\n", report.pages_fetched));
        md.push_str(&format!("- **Skipped (cached)**: {}\n", report.pages_skipped));
        md.push_str(&format!("- **Saves**: {}\n", report.saves));
        md.push_str(&format!("- **Failures**: {}\n\n", report.failures.len()));

        if !report.failures.is_empty() {
            md.push_str("| Path | Error |\n");
            md.push_str("|------|-------|\n");
            for failure in &report.failures {
                md.push_str(&format!(
                    "| /{} | {} |\n",
                    failure.path.join("/"),
                    failure.message.replace('|', "\\|")
                ));
            }
            md.push('\n');
        }
    }

    for document in stats {
        md.push_str(&format!("## {}\n\n", document.document));

        md.push_str("| Kind | Nodes |\n");
        md.push_str("|------|-------|\n");
        md.push_str(&format!("| Table of contents | {} |\n", document.toc_nodes));
        md.push_str(&format!("| Section | {} |\n", document.leaf_nodes));
        md.push_str(&format!("| Not yet mirrored | {} |\n\n", document.unvisited_nodes));

        md.push_str(&format!("- **Paragraphs**: {}\n", document.paragraphs));
        md.push_str(&format!("- **Maximum Depth**: {}\n", document.max_depth));
        md.push_str(&format!("- **Completion**: {:.2}%\n\n", document.completion()));

        if document.depth_breakdown.len() > 1 {
            md.push_str("### Depth Breakdown\n\n");
            md.push_str("| Depth | Nodes |\n");
            md.push_str("|-------|-------|\n");
            for (depth, count) in &document.depth_breakdown {
                md.push_str(&format!("| {} | {} |\n", depth, count));
            }
            md.push('\n');
        }

        if !document.unvisited_urls.is_empty() {
            md.push_str("### Pending URLs\n\n");
            for url in document.unvisited_urls.iter().take(50) {
                md.push_str(&format!("- {}\n", url));
            }
            if document.unvisited_urls.len() > 50 {
                md.push_str(&format!(
                    "\n... and {} more\n",
                    document.unvisited_urls.len() - 50
                ));
            }
            md.push('\n');
        }
    }

    md
}
