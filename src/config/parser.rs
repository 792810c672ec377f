use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use job_spider::config::load_config;
///
/// let config = load_config(Path::new("spider.toml")).unwrap();
/// println!("Search term: {}", config.crawler.search_term);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    tracing::debug!(
        "Loaded config for {} (search term '{}')",
        config.api.base_url,
        config.crawler.search_term
    );
    Ok(config)
}

/// Computes the hex-encoded SHA-256 fingerprint of a configuration file
///
/// The fingerprint is logged when a crawl starts so that rows harvested by
/// different runs can be tied back to the settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&content)))
}

/// Loads a configuration together with its fingerprint
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[api]
base-url = "https://api.example.com"

[crawler]
search-term = "software engineer"

[user-agent]
crawler-name = "TestSpider"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./test.db"
report-path = "./listings.md"
"#;

    #[test]
    fn test_load_valid_config_applies_defaults() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.search_path, "/v2/search");
        assert_eq!(config.api.detail_path, "/v2/jobs");
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.crawler.search_term, "software engineer");
        assert_eq!(config.crawler.pacing_batch_size, 10);
        assert_eq!(config.crawler.pacing_interval, 3000);
        assert_eq!(config.crawler.search_retries, 2);
        assert_eq!(config.user_agent.crawler_name, "TestSpider");
    }

    #[test]
    fn test_load_config_with_overrides() {
        let content = VALID_CONFIG.replace(
            "search-term = \"software engineer\"",
            "search-term = \"data analyst\"\npacing-batch-size = 5\npacing-interval = 500",
        );
        let file = create_temp_config(&content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.search_term, "data analyst");
        assert_eq!(config.crawler.pacing_batch_size, 5);
        assert_eq!(config.crawler.pacing_interval().as_millis(), 500);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/spider.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_section() {
        let content = VALID_CONFIG.replace("[api]\nbase-url = \"https://api.example.com\"\n", "");
        let file = create_temp_config(&content);
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = VALID_CONFIG.replace("search-term = \"software engineer\"", "search-term = \"  \"");
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
