use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Job-Spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Remote job-listing API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the API, e.g. `https://api.mycareersfuture.gov.sg`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the search endpoint
    #[serde(rename = "search-path", default = "default_search_path")]
    pub search_path: String,

    /// Path under which detail records live (`{detail-path}/{id}`)
    #[serde(rename = "detail-path", default = "default_detail_path")]
    pub detail_path: String,

    /// Number of results requested per search page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Search term submitted to the search endpoint
    #[serde(rename = "search-term")]
    pub search_term: String,

    /// Number of items processed between pacing pauses
    #[serde(rename = "pacing-batch-size", default = "default_pacing_batch_size")]
    pub pacing_batch_size: u32,

    /// Length of a pacing pause (milliseconds)
    #[serde(rename = "pacing-interval", default = "default_pacing_interval")]
    pub pacing_interval: u64,

    /// Extra attempts for a failed search page request
    #[serde(rename = "search-retries", default = "default_search_retries")]
    pub search_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown listing report
    #[serde(rename = "report-path")]
    pub report_path: String,
}

fn default_search_path() -> String {
    "/v2/search".to_string()
}

fn default_detail_path() -> String {
    "/v2/jobs".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_pacing_batch_size() -> u32 {
    10
}

fn default_pacing_interval() -> u64 {
    3000
}

fn default_search_retries() -> u32 {
    2
}

fn default_request_timeout() -> u64 {
    30
}
