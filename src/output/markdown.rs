//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl:
//! run information, totals, state/depth/host breakdowns, the most connected
//! pages and every page that could not be expanded.

use crate::output::style::StyledGraph;
use crate::output::traits::{OutputResult, Renderer, RunMetadata};
use crate::state::PageState;
use crate::url::{extract_domain, CanonicalUrl};
use std::collections::BTreeMap;
use std::path::Path;

const TOP_PAGES: usize = 20;
const TOP_HOSTS: usize = 50;

/// Writes `<stem>.md`
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn render(&self, graph: &StyledGraph, meta: &RunMetadata, path: &Path) -> OutputResult<()> {
        std::fs::write(path, format_markdown_summary(graph, meta))?;
        Ok(())
    }
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(graph: &StyledGraph, meta: &RunMetadata) -> String {
    let mut md = String::new();

    md.push_str("# Sitegraph Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", meta.root_url));
    md.push_str(&format!("- **Max Depth**: {}\n", meta.max_depth));
    md.push_str(&format!("- **Started**: {}\n", meta.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", meta.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {} seconds\n", meta.duration_seconds()));
    md.push_str(&format!("- **Requests**: {}\n", meta.requests));
    if meta.budget_exhausted {
        md.push_str("- **Budget**: exhausted before the crawl completed\n");
    }
    if let Some(hash) = &meta.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    let leaves = graph
        .nodes
        .iter()
        .filter(|node| !graph.edges.iter().any(|edge| edge.from == node.index))
        .count();
    let failures = graph.nodes.iter().filter(|node| node.state.is_error()).count();

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Pages**: {}\n", graph.nodes.len()));
    md.push_str(&format!("- **Total Links**: {}\n", graph.edges.len()));
    md.push_str(&format!("- **Leaf Pages**: {}\n", leaves));
    md.push_str(&format!("- **Failed Pages**: {}\n", failures));
    md.push_str(&format!("- **Max Degree**: {}\n\n", graph.max_degree));

    // State breakdown
    md.push_str("## Page State Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    for state in PageState::all_states() {
        let count = graph.nodes.iter().filter(|node| node.state == state).count();
        if count > 0 {
            md.push_str(&format!("| {} | {} |\n", state, count));
        }
    }
    md.push('\n');

    // Depth breakdown, counted in hops from the root
    let mut by_hop: BTreeMap<u32, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *by_hop
            .entry(meta.max_depth.saturating_sub(node.depth))
            .or_default() += 1;
    }

    md.push_str("## Depth Breakdown\n\n");
    md.push_str("| Hops From Root | Pages |\n");
    md.push_str("|----------------|-------|\n");
    for (hop, count) in &by_hop {
        md.push_str(&format!("| {} | {} |\n", hop, count));
    }
    md.push('\n');

    // Hosts
    let mut by_host: BTreeMap<String, usize> = BTreeMap::new();
    for node in &graph.nodes {
        let host = CanonicalUrl::parse(&node.url)
            .ok()
            .and_then(|url| extract_domain(&url))
            .unwrap_or_else(|| "(unknown)".to_string());
        *by_host.entry(host).or_default() += 1;
    }

    let mut hosts: Vec<_> = by_host.into_iter().collect();
    hosts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    md.push_str("## Hosts\n\n");
    md.push_str(&format!("Total hosts: {}\n\n", hosts.len()));
    md.push_str("| Host | Pages |\n");
    md.push_str("|------|-------|\n");
    for (host, count) in hosts.iter().take(TOP_HOSTS) {
        md.push_str(&format!("| {} | {} |\n", host, count));
    }
    if hosts.len() > TOP_HOSTS {
        md.push_str(&format!("\n... and {} more\n", hosts.len() - TOP_HOSTS));
    }
    md.push('\n');

    // Most connected pages
    let mut connected: Vec<_> = graph.nodes.iter().filter(|node| node.degree > 0).collect();
    connected.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.index.cmp(&b.index)));

    if !connected.is_empty() {
        md.push_str(&format!("## Top {} Most Connected Pages\n\n", TOP_PAGES));
        md.push_str("| URL | Degree |\n");
        md.push_str("|-----|--------|\n");
        for node in connected.iter().take(TOP_PAGES) {
            md.push_str(&format!("| {} | {} |\n", node.url, node.degree));
        }
        md.push('\n');
    }

    // Failures
    let failed: Vec<_> = graph.nodes.iter().filter(|node| node.state.is_error()).collect();
    if !failed.is_empty() {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | State | Error |\n");
        md.push_str("|-----|-------|-------|\n");
        for node in failed {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                node.url,
                node.state,
                node.error.as_deref().unwrap_or("").replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}
