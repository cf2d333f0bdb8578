//! Statistics over a cached document tree
//!
//! This module provides functionality for measuring how much of a document
//! has been mirrored and for displaying those numbers.

use crate::tree::{DocumentTree, NodeKind};
use std::collections::BTreeMap;

/// Mirror statistics for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatistics {
    /// Document identifier
    pub document: String,

    /// Number of table-of-contents nodes
    pub toc_nodes: usize,

    /// Number of section nodes holding text
    pub leaf_nodes: usize,

    /// Nodes known from a parent but not fetched yet
    pub unvisited_nodes: usize,

    /// Total paragraphs across all sections
    pub paragraphs: usize,

    /// Deepest path length below the root
    pub max_depth: usize,

    /// Node count per depth, the root being depth 0
    pub depth_breakdown: BTreeMap<usize, usize>,

    /// URLs the next run will fetch, in navigation order
    pub unvisited_urls: Vec<String>,
}

impl TreeStatistics {
    /// Walks a tree and counts its nodes
    pub fn from_tree(tree: &DocumentTree) -> Self {
        let mut stats = TreeStatistics {
            document: tree.name.clone(),
            ..Default::default()
        };

        tree.visit(|path, node| {
            let depth = path.len();
            *stats.depth_breakdown.entry(depth).or_insert(0) += 1;
            stats.max_depth = stats.max_depth.max(depth);

            match node.kind() {
                NodeKind::TableOfContents => stats.toc_nodes += 1,
                NodeKind::Leaf => {
                    stats.leaf_nodes += 1;
                    stats.paragraphs += node.paragraphs().len();
                }
                NodeKind::Unvisited => {
                    stats.unvisited_nodes += 1;
                    stats.unvisited_urls.push(node.url.clone());
                }
            }
        });

        stats
    }

    pub fn total_nodes(&self) -> usize {
        self.toc_nodes + self.leaf_nodes + self.unvisited_nodes
    }

    /// Percentage of known nodes that hold data
    pub fn completion(&self) -> f64 {
        let total = self.total_nodes();
        if total == 0 {
            return 0.0;
        }
        (total - self.unvisited_nodes) as f64 / total as f64 * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &TreeStatistics) {
    println!("=== {} ===\n", stats.document);

    println!("Overview:");
    println!("  Tables of contents: {}", stats.toc_nodes);
    println!("  Sections: {}", stats.leaf_nodes);
    println!("  Not yet mirrored: {}", stats.unvisited_nodes);
    println!("  Paragraphs: {}", stats.paragraphs);
    println!("  Maximum depth: {}", stats.max_depth);
    println!();

    if stats.depth_breakdown.len() > 1 {
        println!("Nodes by Depth:");
        for (depth, count) in &stats.depth_breakdown {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if !stats.unvisited_urls.is_empty() {
        println!("Pending URLs ({}):", stats.unvisited_urls.len());
        for url in stats.unvisited_urls.iter().take(20) {
            println!("  - {}", url);
        }
        if stats.unvisited_urls.len() > 20 {
            println!("  ... and {} more", stats.unvisited_urls.len() - 20);
        }
        println!();
    }

    println!(
        "Completion: {:.1}% ({} / {} nodes mirrored)",
        stats.completion(),
        stats.total_nodes() - stats.unvisited_nodes,
        stats.total_nodes()
    );
}
