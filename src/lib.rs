//! Sitegraph: a depth-bounded web crawler that maps pages into a link graph
//!
//! This crate crawls outward from a root URL, following hyperlinks up to a
//! bounded number of hops, and assembles the visited pages and their link
//! relationships into a directed graph that can be exported as DOT, SVG,
//! markdown or SQLite.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitegraph operations
#[derive(Debug, Error)]
pub enum SitegraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot resolve root URL {url}: {reason}")]
    RootResolution { url: String, reason: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitegraph operations
pub type Result<T> = std::result::Result<T, SitegraphError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, HttpTransport, Transport};
pub use graph::{PageGraph, PageNode};
pub use state::PageState;
pub use url::{is_valid, normalize, resolve, CanonicalUrl};
