//! Crawl orchestrator
//!
//! Drives a depth-bounded, depth-first walk outward from a root URL:
//! - Resolving every newly seen URL to its effective post-redirect form
//! - Registering one node per canonical URL in the page graph
//! - Fetching, parsing and extracting links for nodes with depth left
//! - Recording edges, including edges back to already-known pages
//!
//! Per-page failures only turn the affected node into a leaf. The only fatal
//! condition is a root URL that cannot be validated or resolved.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Transport;
use crate::crawler::parser::{extract_links, parse_html};
use crate::crawler::scheduler::{CrawlBudget, Pacer};
use crate::graph::{NodeIndex, PageGraph};
use crate::state::PageState;
use crate::url::CanonicalUrl;
use crate::{SitegraphError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;

/// Outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Index of the root node in `graph`
    pub root: NodeIndex,
    pub graph: PageGraph,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Outbound requests issued (HEAD and GET)
    pub requests: u64,
    /// Whether the node or time budget cut the crawl short
    pub budget_exhausted: bool,
}

impl CrawlReport {
    /// Canonical URL of the root node
    pub fn root_url(&self) -> Option<&CanonicalUrl> {
        self.graph.url_of(self.root)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// How a link found on a page was attached to the graph
enum Discovery {
    /// The target was already a node
    Known(NodeIndex),
    /// A new node was created and should be expanded
    Created(NodeIndex),
    /// A new node was created but its URL could not be resolved
    Failed(NodeIndex),
    /// The budget does not allow another node
    OverBudget,
}

/// Mutable state of a single crawl run
struct CrawlRun {
    graph: PageGraph,
    pacer: Pacer,
    budget: CrawlBudget,
    budget_exhausted: bool,
}

/// Crawl orchestrator
///
/// Borrows its transport; the caller builds it once and owns it.
pub struct Crawler<'a, T: Transport> {
    transport: &'a T,
    config: CrawlerConfig,
}

impl<'a, T: Transport> Crawler<'a, T> {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `transport` - Network collaborator used for every request
    /// * `config` - Pacing, budget and redirect-resolution settings
    pub fn new(transport: &'a T, config: &CrawlerConfig) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    /// Crawls outward from `root`, following links up to `max_depth` hops
    ///
    /// # Arguments
    ///
    /// * `root` - Absolute http(s) URL to start from
    /// * `max_depth` - Number of link hops to follow beyond the root
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The finished graph; individual pages may have failed
    /// * `Err(SitegraphError)` - The root URL is invalid or could not be resolved
    pub async fn crawl(&self, root: &str, max_depth: u32) -> Result<CrawlReport> {
        let requested = CanonicalUrl::parse(root)?;
        let started_at = Utc::now();

        tracing::info!("Starting crawl of {} (max depth {})", requested, max_depth);

        let mut run = CrawlRun {
            graph: PageGraph::new(),
            pacer: Pacer::new(Duration::from_millis(self.config.politeness_delay_ms)),
            budget: CrawlBudget::new(
                self.config.max_nodes,
                self.config.time_budget_secs.map(Duration::from_secs),
            ),
            budget_exhausted: false,
        };

        let root_url = if self.config.resolve_redirects {
            run.pacer.wait().await;
            self.transport
                .head_resolve(&requested)
                .await
                .map_err(|e| SitegraphError::RootResolution {
                    url: requested.to_string(),
                    reason: e.to_string(),
                })?
        } else {
            requested
        };

        let root_index = run.graph.get_or_create(&root_url, max_depth);
        let mut pending: Vec<(NodeIndex, u32)> = vec![(root_index, max_depth)];

        while let Some((index, depth)) = pending.pop() {
            if run.budget.is_expired() {
                if !run.budget_exhausted {
                    tracing::warn!("Time budget exhausted; no further pages will be expanded");
                }
                run.budget_exhausted = true;
                set_state(&mut run.graph, index, PageState::BudgetExhausted, None);
                continue;
            }

            let children = self.expand(&mut run, index, depth).await;

            // Reverse so the first link found is expanded first
            pending.extend(children.into_iter().rev());
        }

        let finished_at = Utc::now();
        let graph = run.graph;

        tracing::info!(
            "Crawl finished: {} pages, {} links, {} requests in {}s",
            graph.len(),
            graph.edge_count(),
            run.pacer.requests(),
            (finished_at - started_at).num_seconds()
        );

        Ok(CrawlReport {
            root: root_index,
            graph,
            max_depth,
            started_at,
            finished_at,
            requests: run.pacer.requests(),
            budget_exhausted: run.budget_exhausted,
        })
    }

    /// Expands one node and returns the newly created children to visit
    async fn expand(
        &self,
        run: &mut CrawlRun,
        index: NodeIndex,
        depth: u32,
    ) -> Vec<(NodeIndex, u32)> {
        if depth == 0 {
            set_state(&mut run.graph, index, PageState::DepthExhausted, None);
            return Vec::new();
        }

        let Some(url) = run.graph.url_of(index).cloned() else {
            return Vec::new();
        };

        tracing::debug!("Expanding {} (depth {})", url, depth);

        run.pacer.wait().await;
        let page = match self.transport.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                set_state(&mut run.graph, index, PageState::FetchFailed, Some(e.to_string()));
                return Vec::new();
            }
        };

        if !page.is_html() {
            let content_type = page.content_type.unwrap_or_default();
            tracing::debug!("Skipping {}: content type {}", url, content_type);
            set_state(
                &mut run.graph,
                index,
                PageState::ContentMismatch,
                Some(format!("Expected HTML, got {}", content_type)),
            );
            return Vec::new();
        }

        // Relative links resolve against the URL the body was actually served from
        let links = match parse_html(&page.body, &page.final_url) {
            Ok(document) => extract_links(&document, &page.final_url),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", url, e);
                set_state(&mut run.graph, index, PageState::ParseFailed, Some(e.to_string()));
                return Vec::new();
            }
        };

        tracing::debug!("Found {} links on {}", links.len(), url);

        let child_depth = depth - 1;
        let mut linked = HashSet::new();
        let mut created = Vec::new();

        for link in links {
            let child = match self.discover(run, &link, child_depth).await {
                Discovery::Known(child) | Discovery::Failed(child) => child,
                Discovery::Created(child) => {
                    created.push((child, child_depth));
                    child
                }
                Discovery::OverBudget => {
                    if !run.budget_exhausted {
                        tracing::warn!("Crawl budget exhausted; new pages will not be added");
                    }
                    run.budget_exhausted = true;
                    continue;
                }
            };

            if linked.insert(child) {
                run.graph.add_edge(index, child);
            } else {
                tracing::debug!("Skipping duplicate link {} -> {}", url, link);
            }
        }

        set_state(&mut run.graph, index, PageState::Expanded, None);
        created
    }

    /// Attaches a link target to the graph, creating a node on first sight
    async fn discover(&self, run: &mut CrawlRun, link: &CanonicalUrl, depth: u32) -> Discovery {
        if let Some(known) = run.graph.index_of(link) {
            return Discovery::Known(known);
        }

        if !run.budget.allows_new_node(run.graph.len()) {
            return Discovery::OverBudget;
        }

        if !self.config.resolve_redirects {
            return Discovery::Created(run.graph.get_or_create(link, depth));
        }

        run.pacer.wait().await;
        match self.transport.head_resolve(link).await {
            Ok(effective) => {
                let (child, created) = run.graph.insert(&effective, depth);
                if created {
                    Discovery::Created(child)
                } else {
                    tracing::debug!("{} redirects to known page {}", link, effective);
                    Discovery::Known(child)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to resolve {}: {}", link, e);
                let child = run.graph.get_or_create(link, depth);
                set_state(&mut run.graph, child, PageState::FetchFailed, Some(e.to_string()));
                Discovery::Failed(child)
            }
        }
    }
}

fn set_state(graph: &mut PageGraph, index: NodeIndex, state: PageState, error: Option<String>) {
    if let Some(node) = graph.get_mut(index) {
        node.set_state(state, error);
    }
}
