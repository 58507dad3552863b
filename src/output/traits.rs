//! Renderer trait and export metadata
//!
//! This module defines the interface every graph renderer implements and the
//! run metadata that renderers may embed in their artifacts.

use crate::crawler::CrawlReport;
use crate::output::style::StyledGraph;
use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Facts about the crawl run that produced a graph
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub root_url: String,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub requests: u64,
    pub budget_exhausted: bool,
    /// SHA-256 of the configuration file, when one was used
    pub config_hash: Option<String>,
}

impl RunMetadata {
    pub fn from_report(report: &CrawlReport, config_hash: Option<&str>) -> Self {
        Self {
            root_url: report
                .root_url()
                .map(|url| url.to_string())
                .unwrap_or_default(),
            max_depth: report.max_depth,
            started_at: report.started_at,
            finished_at: report.finished_at,
            requests: report.requests,
            budget_exhausted: report.budget_exhausted,
            config_hash: config_hash.map(str::to_string),
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Trait for graph renderers
///
/// A renderer turns a styled graph into one artifact on disk. Renderers do
/// no crawling and never change the graph's topology.
pub trait Renderer {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Writes the artifact for `graph` to `path`
    ///
    /// # Arguments
    ///
    /// * `graph` - The styled graph to render
    /// * `meta` - Metadata about the run that produced it
    /// * `path` - Destination file, overwritten if it exists
    fn render(&self, graph: &StyledGraph, meta: &RunMetadata, path: &Path) -> OutputResult<()>;
}
