use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::url::CanonicalUrl;
use crate::ConfigError;

const MAX_DEPTH: u32 = 64;
const MAX_POLITENESS_DELAY_MS: u64 = 60_000;
const MAX_REDIRECTS: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Checks a crawl depth against the supported maximum
///
/// Shared by the config file, command-line flags and the interactive prompt.
pub fn validate_depth(depth: u32) -> Result<(), ConfigError> {
    if depth > MAX_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max-depth must be <= {}, got {}",
            MAX_DEPTH, depth
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.root_url {
        CanonicalUrl::parse(root)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root-url '{}': {}", root, e)))?;
    }

    validate_depth(config.max_depth)?;

    if config.politeness_delay_ms > MAX_POLITENESS_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "politeness-delay-ms must be <= {}ms, got {}ms",
            MAX_POLITENESS_DELAY_MS, config.politeness_delay_ms
        )));
    }

    if config.max_nodes == Some(0) {
        return Err(ConfigError::Validation(
            "max-nodes must be >= 1".to_string(),
        ));
    }

    if config.time_budget_secs == Some(0) {
        return Err(ConfigError::Validation(
            "time-budget-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    let timeouts = [
        ("request-timeout-secs", config.request_timeout_secs),
        ("connect-timeout-secs", config.connect_timeout_secs),
        ("head-timeout-secs", config.head_timeout_secs),
        ("head-connect-timeout-secs", config.head_connect_timeout_secs),
    ];

    for (name, value) in timeouts {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{} must be >= 1", name)));
        }
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    validate_file_stem(&config.file_stem)?;

    if config.formats.is_empty() {
        return Err(ConfigError::Validation(
            "formats must list at least one output format".to_string(),
        ));
    }

    Ok(())
}

/// A file stem is a bare file name: no separators, no parent references
fn validate_file_stem(stem: &str) -> Result<(), ConfigError> {
    if stem.trim().is_empty() {
        return Err(ConfigError::Validation(
            "file-stem cannot be empty".to_string(),
        ));
    }

    if stem.contains('/') || stem.contains('\\') || stem == "." || stem == ".." {
        return Err(ConfigError::Validation(format!(
            "file-stem must be a plain file name, got '{}'",
            stem
        )));
    }

    Ok(())
}
