//! Statistics for a finished crawl
//!
//! This module provides functionality for summarizing a crawl report and
//! printing the summary to stdout.

use crate::crawler::CrawlReport;
use crate::state::PageState;
use crate::url::extract_domain;
use std::collections::{HashMap, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of pages in the graph
    pub total_pages: usize,

    /// Total number of links (edges)
    pub total_links: usize,

    /// Pages without outgoing links
    pub leaf_pages: usize,

    /// Count of pages by state
    pub pages_by_state: HashMap<PageState, usize>,

    /// Number of unique hosts encountered
    pub unique_hosts: usize,

    /// Outbound requests issued
    pub requests: u64,

    /// Pages whose expansion failed
    pub failures: usize,

    pub duration_seconds: i64,

    pub budget_exhausted: bool,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let graph = &report.graph;
        let mut pages_by_state = HashMap::new();
        let mut hosts = HashSet::new();
        let mut leaf_pages = 0;

        for (url, node) in graph.nodes() {
            *pages_by_state.entry(node.state()).or_insert(0) += 1;
            if node.is_leaf() {
                leaf_pages += 1;
            }
            if let Some(host) = extract_domain(url) {
                hosts.insert(host);
            }
        }

        let failures = pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum();

        Self {
            total_pages: graph.len(),
            total_links: graph.edge_count(),
            leaf_pages,
            pages_by_state,
            unique_hosts: hosts.len(),
            requests: report.requests,
            failures,
            duration_seconds: report.duration().num_seconds(),
            budget_exhausted: report.budget_exhausted,
        }
    }

    /// Number of pages in the given state
    pub fn count(&self, state: PageState) -> usize {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages: {}", stats.total_pages);
    println!("  Total links: {}", stats.total_links);
    println!("  Leaf pages: {}", stats.leaf_pages);
    println!("  Unique hosts: {}", stats.unique_hosts);
    println!("  Requests issued: {}", stats.requests);
    println!("  Duration: {}s", stats.duration_seconds);
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (state, count) in state_counts {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if stats.budget_exhausted {
        println!("Budget exhausted: the crawl stopped before the frontier was empty");
        println!();
    }

    let expanded = stats.count(PageState::Expanded);
    let success_rate = if stats.total_pages > 0 {
        (expanded as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Expanded: {:.1}% ({} / {} pages), {} failed",
        success_rate, expanded, stats.total_pages, stats.failures
    );
}
