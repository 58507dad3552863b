//! Crawler module for building the page graph
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport with effective-URL resolution
//! - HTML parsing and link extraction
//! - Request pacing and crawl budgets
//! - Overall crawl orchestration

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{CrawlReport, Crawler};
pub use fetcher::{FetchError, FetchedPage, HttpTransport, Transport};
pub use parser::{anchors, extract_links, parse_html, ParseError};
pub use scheduler::{CrawlBudget, Pacer};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl with a freshly built HTTP transport
///
/// # Arguments
///
/// * `config` - The full configuration
/// * `root` - Absolute http(s) URL to start from
/// * `max_depth` - Number of link hops to follow beyond the root
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The finished crawl
/// * `Err(SitegraphError)` - The transport could not be built, or the root is invalid
pub async fn crawl(config: &Config, root: &str, max_depth: u32) -> Result<CrawlReport> {
    let transport = HttpTransport::new(&config.http)?;
    Crawler::new(&transport, &config.crawler)
        .crawl(root, max_depth)
        .await
}
