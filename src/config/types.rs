use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for Sitegraph
///
/// Every section and key is optional in the TOML file; missing values take
/// the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL to start crawling from when none is given on the command line
    #[serde(rename = "root-url", skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,

    /// Number of link hops to follow beyond the root
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Minimum time between two outbound requests (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Maximum number of nodes in the graph
    #[serde(rename = "max-nodes", skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,

    /// Wall-clock time after which no new page is expanded (seconds)
    #[serde(rename = "time-budget-secs", skip_serializing_if = "Option::is_none")]
    pub time_budget_secs: Option<u64>,

    /// Resolve each new URL through a HEAD request before creating its node
    #[serde(rename = "resolve-redirects")]
    pub resolve_redirects: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            max_depth: 3,
            politeness_delay_ms: 100,
            max_nodes: None,
            time_budget_secs: None,
            resolve_redirects: true,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total timeout for a page fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout for a page fetch (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Total timeout for effective-URL resolution (seconds)
    #[serde(rename = "head-timeout-secs")]
    pub head_timeout_secs: u64,

    /// Connect timeout for effective-URL resolution (seconds)
    #[serde(rename = "head-connect-timeout-secs")]
    pub head_connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("Mozilla/5.0 (compatible; sitegraph/{})", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            head_timeout_secs: 30,
            head_connect_timeout_secs: 15,
            max_redirects: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the artifacts are written to
    pub directory: PathBuf,

    /// File name (without extension) shared by every artifact
    #[serde(rename = "file-stem")]
    pub file_stem: String,

    /// Artifacts to produce
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_stem: "graph".to_string(),
            formats: vec![OutputFormat::Svg, OutputFormat::Dot, OutputFormat::Markdown],
        }
    }
}

impl OutputConfig {
    /// Path of the artifact for `format`
    pub fn path_for(&self, format: OutputFormat) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.file_stem, format.extension()))
    }
}

/// Graph export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Dot,
    Markdown,
    Sqlite,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
            Self::Markdown => "md",
            Self::Sqlite => "db",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
            Self::Markdown => "markdown",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "dot" => Ok(Self::Dot),
            "markdown" | "md" => Ok(Self::Markdown),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(format!(
                "unknown format '{}' (expected svg, dot, markdown or sqlite)",
                other
            )),
        }
    }
}
