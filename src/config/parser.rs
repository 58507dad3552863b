use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitegraph::config::load_config;
///
/// let config = load_config(Path::new("sitegraph.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// An empty document yields [`Config::default`].
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Recorded alongside exported graphs so a run can be traced back to the
/// exact configuration that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Loads a configuration and returns both the config and its hash
///
/// The file is read once, so the hash always matches the parsed content.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
root-url = "https://example.com/"
max-depth = 2
politeness-delay-ms = 250
max-nodes = 500
time-budget-secs = 60
resolve-redirects = false

[http]
user-agent = "TestCrawler/1.0"
request-timeout-secs = 20
max-redirects = 5

[output]
directory = "./out"
file-stem = "example"
formats = ["dot", "sqlite"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.root_url.as_deref(), Some("https://example.com/"));
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.politeness_delay_ms, 250);
        assert_eq!(config.crawler.max_nodes, Some(500));
        assert_eq!(config.crawler.time_budget_secs, Some(60));
        assert!(!config.crawler.resolve_redirects);
        assert_eq!(config.http.user_agent, "TestCrawler/1.0");
        assert_eq!(config.http.request_timeout_secs, 20);
        assert_eq!(config.http.max_redirects, 5);
        // Unset keys keep their defaults
        assert_eq!(config.http.head_timeout_secs, 30);
        assert_eq!(config.output.file_stem, "example");
        assert_eq!(config.output.formats, vec![OutputFormat::Dot, OutputFormat::Sqlite]);
    }

    #[test]
    fn test_parse_config_from_str() {
        let config = parse_config("[crawler]\nmax-depth = 0\n").unwrap();
        assert_eq!(config.crawler.max_depth, 0);
        assert!(parse_config("[crawler]\nmax-depth = 100\n").is_err());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_unknown_format() {
        let config_content = r#"
[output]
formats = ["png"]
"#;
        let file = create_temp_config(config_content);
        assert!(matches!(load_config(file.path()).unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-depth = 3

[http]
request-timeout-secs = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[crawler]\nmax-depth = 1\n");
        let file2 = create_temp_config("[crawler]\nmax-depth = 2\n");

        let (config1, hash1) = load_config_with_hash(file1.path()).unwrap();
        let (config2, hash2) = load_config_with_hash(file2.path()).unwrap();

        assert_eq!(config1.crawler.max_depth, 1);
        assert_eq!(config2.crawler.max_depth, 2);
        assert_ne!(hash1, hash2);
    }
}
