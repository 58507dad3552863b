//! Output module for exporting finished page graphs
//!
//! This module handles:
//! - Weighting nodes and edges by degree and mapping weights to heat colors
//! - Rendering the styled graph as DOT, SVG, markdown or SQLite
//! - Computing and printing crawl statistics

mod dot;
mod markdown;
mod sqlite_output;
pub mod stats;
mod style;
mod svg;
mod traits;

pub use dot::{format_dot, DotRenderer};
pub use markdown::{format_markdown_summary, MarkdownRenderer};
pub use sqlite_output::{write_graph, SqliteRenderer};
pub use stats::{print_statistics, CrawlStatistics};
pub use style::{degrees, heat_color, node_size, Rgba, StyledEdge, StyledGraph, StyledNode};
pub use svg::{layout, Position, SvgRenderer};
pub use traits::{OutputError, OutputResult, Renderer, RunMetadata};

use crate::config::{OutputConfig, OutputFormat};
use crate::crawler::CrawlReport;
use std::path::PathBuf;

/// Returns the renderer responsible for `format`
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Svg => Box::new(SvgRenderer::default()),
        OutputFormat::Dot => Box::new(DotRenderer),
        OutputFormat::Markdown => Box::new(MarkdownRenderer),
        OutputFormat::Sqlite => Box::new(SqliteRenderer),
    }
}

/// Styles a finished crawl and writes every configured artifact
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `config` - Output directory, file stem and formats
/// * `config_hash` - Hash of the configuration file, recorded in the artifacts
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths written, in format order; empty for an empty graph
/// * `Err(OutputError)` - A directory or artifact could not be written
pub fn export(
    report: &CrawlReport,
    config: &OutputConfig,
    config_hash: Option<&str>,
) -> OutputResult<Vec<PathBuf>> {
    if report.graph.is_empty() {
        tracing::info!("Graph is empty; nothing to export");
        return Ok(Vec::new());
    }

    let styled = StyledGraph::new(&report.graph, report.root);
    let meta = RunMetadata::from_report(report, config_hash);

    std::fs::create_dir_all(&config.directory)?;

    let mut written = Vec::with_capacity(config.formats.len());
    for &format in &config.formats {
        let path = config.path_for(format);
        let renderer = renderer_for(format);

        tracing::debug!("Rendering {} to {}", renderer.name(), path.display());
        renderer.render(&styled, &meta, &path)?;
        tracing::info!("Wrote {} output: {}", format, path.display());

        written.push(path);
    }

    Ok(written)
}
