//! Crawler module for harvesting listings
//!
//! This module contains the core crawl-and-normalize pipeline, including:
//! - HTTP fetching of search pages and detail records
//! - Pacing between outbound requests
//! - Page-by-page traversal of a search result set
//! - Crawl bootstrap (storage and client setup)

mod fetcher;
mod pacing;
mod walker;

pub use fetcher::{
    build_http_client, classify_transport_error, fetch_search_page, FetchError, ItemFetcher,
};
pub use pacing::{FixedBatchPacing, NoPacing, PacingPolicy};
pub use walker::{has_next_page, PageWalker};

use crate::config::Config;
use crate::state::CrawlProgress;
use crate::storage::open_storage;
use crate::SpiderError;
use std::path::Path;

/// Runs a complete crawl for the configured search term
pub async fn crawl(config: &Config) -> Result<CrawlProgress, SpiderError> {
    run_crawl(config, &config.crawler.search_term).await
}

/// Runs a complete crawl for one search term
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the database and bootstrap the schema
/// 2. Build the HTTP client
/// 3. Walk every search page from page 0, persisting each listing
///
/// # Arguments
///
/// * `config` - The spider configuration
/// * `search_term` - The query to harvest
///
/// # Returns
///
/// * `Ok(CrawlProgress)` - Crawl ran to completion (individual items may have failed)
/// * `Err(SpiderError)` - Storage could not be opened or a search page failed
///
/// # Example
///
/// ```no_run
/// use job_spider::config::load_config;
/// use job_spider::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("spider.toml"))?;
/// let progress = run_crawl(&config, "software engineer").await?;
/// println!("{} listings stored", progress.items_persisted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, search_term: &str) -> Result<CrawlProgress, SpiderError> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;

    let mut walker = PageWalker::new(config, client, storage)?;
    walker.crawl(search_term).await
}
