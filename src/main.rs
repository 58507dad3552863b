//! Sitegraph main entry point
//!
//! This is the command-line interface for the sitegraph crawler.

use anyhow::{bail, Context};
use clap::Parser;
use sitegraph::config::{load_config_with_hash, validate, validate_depth, Config, OutputFormat};
use sitegraph::crawler::crawl;
use sitegraph::output::{export, print_statistics, CrawlStatistics};
use sitegraph::CanonicalUrl;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitegraph: maps the link structure around a web page
///
/// Sitegraph follows hyperlinks outward from a root URL up to a bounded
/// number of hops and exports the resulting page graph as SVG, Graphviz DOT,
/// a markdown summary or a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "A depth-bounded web crawler that maps pages into a link graph", long_about = None)]
struct Cli {
    /// Root URL to start crawling from (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Number of link hops to follow beyond the root
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Delay between consecutive requests, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Stop creating nodes once the graph holds this many pages
    #[arg(long, value_name = "N")]
    max_nodes: Option<usize>,

    /// Directory to write the exported artifacts to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Export format (repeatable): svg, dot, markdown, sqlite
    #[arg(short, long = "format", value_name = "FORMAT")]
    formats: Vec<OutputFormat>,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let (root, depth) = match config.crawler.root_url.clone() {
        Some(root) => (root, config.crawler.max_depth),
        None => {
            let root = request_url()?;
            let depth = match cli.depth {
                Some(depth) => depth,
                None => request_depth()?,
            };

            config.crawler.root_url = Some(root.clone());
            config.crawler.max_depth = depth;
            validate(&config).context("Invalid configuration")?;
            (root, depth)
        }
    };

    handle_crawl(&config, &root, depth, config_hash.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            2 => EnvFilter::new("sitegraph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line flags on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawler.root_url = Some(url.clone());
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(delay) = cli.delay_ms {
        config.crawler.politeness_delay_ms = delay;
    }
    if let Some(max_nodes) = cli.max_nodes {
        config.crawler.max_nodes = Some(max_nodes);
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if !cli.formats.is_empty() {
        config.output.formats = cli.formats.clone();
    }
}

/// Prompts until a valid http(s) root URL is entered
fn request_url() -> anyhow::Result<String> {
    loop {
        let input = prompt("Root URL: ")?;
        match CanonicalUrl::parse(&input) {
            Ok(_) => return Ok(input),
            Err(e) => eprintln!("Invalid URL ({}). Please enter an absolute http or https URL.", e),
        }
    }
}

/// Prompts until a non-negative integer depth within the supported limit is
/// entered
fn request_depth() -> anyhow::Result<u32> {
    loop {
        let input = prompt("Crawl depth: ")?;
        match parse_depth(&input) {
            Ok(depth) => return Ok(depth),
            Err(message) => eprintln!("{}", message),
        }
    }
}

fn parse_depth(input: &str) -> Result<u32, String> {
    let depth = input
        .parse::<u32>()
        .map_err(|_| "Depth must be a non-negative integer.".to_string())?;
    validate_depth(depth).map_err(|e| e.to_string())?;
    Ok(depth)
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        bail!("No input available; pass the root URL as an argument");
    }

    Ok(line.trim().to_string())
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Sitegraph Dry Run ===\n");

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);

    println!("✓ Configuration is valid");
    match &config.crawler.root_url {
        Some(root) => println!(
            "✓ Would crawl {} to depth {}",
            root, config.crawler.max_depth
        ),
        None => println!("✓ Root URL will be prompted for"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    root: &str,
    depth: u32,
    config_hash: Option<&str>,
) -> anyhow::Result<()> {
    let report = match crawl(config, root, depth).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed: {} pages, {} links",
                report.graph.len(),
                report.graph.edge_count()
            );
            report
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_statistics(&CrawlStatistics::from_report(&report));

    let written = export(&report, &config.output, config_hash).context("Failed to export graph")?;
    for path in &written {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}
