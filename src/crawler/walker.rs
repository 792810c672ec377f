//! Page walker - drives one search query across successive result pages
//!
//! For every page the walker:
//! - Requests the page (retrying transport failures a bounded number of times)
//! - Derives each result's item identifier and hands it to the item fetcher
//! - Records per-item outcomes without letting a failure abort the page
//! - Consults the pacing policy between items
//! - Decides from the reported total whether another page exists

use crate::config::Config;
use crate::crawler::fetcher::{classify_transport_error, fetch_search_page, FetchError};
use crate::crawler::pacing::{FixedBatchPacing, PacingPolicy};
use crate::crawler::ItemFetcher;
use crate::listing::{SearchResponse, SearchResult};
use crate::state::{CrawlProgress, ItemOutcome};
use crate::storage::Storage;
use crate::url::{extract_item_id, search_url};
use crate::SpiderError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Returns true if results remain beyond `page` (0-based)
///
/// # Examples
///
/// ```
/// use job_spider::crawler::has_next_page;
///
/// assert!(has_next_page(1, 100, 250));
/// assert!(!has_next_page(2, 100, 250));
/// ```
pub fn has_next_page(page: u32, page_size: u32, total: u64) -> bool {
    (u64::from(page) + 1) * u64::from(page_size) < total
}

/// Walks the search result pages of one query
///
/// The walker owns the storage handle it is given; every item is written
/// through it sequentially, so no two writers ever touch the same listing.
pub struct PageWalker<S: Storage> {
    client: Client,
    fetcher: ItemFetcher,
    search_url: Url,
    page_size: u32,
    search_retries: u32,
    retry_delay: Duration,
    pacing: Box<dyn PacingPolicy>,
    storage: S,
}

impl<S: Storage> PageWalker<S> {
    /// Creates a walker using the configured API, retry and pacing settings
    ///
    /// # Arguments
    ///
    /// * `config` - The spider configuration
    /// * `client` - HTTP client shared by search and detail requests
    /// * `storage` - Storage handle every listing is persisted through
    pub fn new(config: &Config, client: Client, storage: S) -> Result<Self, SpiderError> {
        let search_url = search_url(&config.api.base_url, &config.api.search_path)?;
        let pacing = FixedBatchPacing::from_config(&config.crawler);

        Ok(Self {
            fetcher: ItemFetcher::new(client.clone(), &config.api),
            client,
            search_url,
            page_size: config.api.page_size,
            search_retries: config.crawler.search_retries,
            retry_delay: pacing.interval(),
            pacing: Box::new(pacing),
            storage,
        })
    }

    /// Replaces the pacing policy
    pub fn with_pacing(mut self, pacing: Box<dyn PacingPolicy>) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Crawls every page of `search_term`, starting at page 0
    ///
    /// Item failures are recorded in the returned progress. Only a search page
    /// that still fails after all retries (or cannot be parsed) aborts the
    /// crawl; listings persisted before that point stay committed.
    pub async fn crawl(&mut self, search_term: &str) -> Result<CrawlProgress, SpiderError> {
        tracing::info!("Starting crawl for '{}'", search_term);

        let mut progress = CrawlProgress::new(search_term);
        let mut page: u32 = 0;

        loop {
            let response = self.fetch_page(search_term, page).await?;
            progress.total_reported = response.total;

            tracing::info!(
                "Search page {}: {} results ({} total)",
                page,
                response.results.len(),
                response.total
            );

            if response.total == 0 || response.results.is_empty() {
                tracing::info!("Search page {} has no results, crawl complete", page);
                break;
            }

            self.walk_page(page, &response.results, &mut progress).await;
            progress.pages_walked += 1;

            if !has_next_page(page, self.page_size, response.total) {
                break;
            }
            page += 1;
        }

        progress.finish();

        tracing::info!(
            "Crawl for '{}' finished: {} pages, {} persisted, {} failed, {} pauses",
            search_term,
            progress.pages_walked,
            progress.items_persisted,
            progress.items_failed(),
            progress.pauses
        );

        Ok(progress)
    }

    /// Requests one search page, retrying transport and status failures
    async fn fetch_page(&self, search_term: &str, page: u32) -> Result<SearchResponse, SpiderError> {
        let mut attempt: u32 = 0;

        loop {
            match fetch_search_page(
                &self.client,
                &self.search_url,
                search_term,
                self.page_size,
                page,
            )
            .await
            {
                Ok(response) => return Ok(response),
                Err(e @ (SpiderError::Http { .. } | SpiderError::Status { .. }))
                    if attempt < self.search_retries =>
                {
                    attempt += 1;
                    tracing::warn!(
                        "Search page {} failed (attempt {}/{}): {}",
                        page,
                        attempt,
                        self.search_retries + 1,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    tracing::error!("Search page {} failed, aborting crawl: {}", page, e);
                    return Err(e);
                }
            }
        }
    }

    /// Processes every result on a page in order
    async fn walk_page(&mut self, page: u32, results: &[SearchResult], progress: &mut CrawlProgress) {
        for (index, result) in results.iter().enumerate() {
            self.process_result(result, progress).await;

            if (index + 1) % 10 == 0 {
                tracing::info!(
                    "Progress: page {}, item {}/{}, {} persisted, {} failed",
                    page,
                    index + 1,
                    results.len(),
                    progress.items_persisted,
                    progress.items_failed()
                );
            }

            if let Some(delay) = self.pacing.delay_after(index) {
                progress.pauses += 1;
                tracing::debug!("Pacing: pausing {:?} after item {} of page {}", delay, index, page);
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Fetches and persists a single result, containing any failure to it
    async fn process_result(&mut self, result: &SearchResult, progress: &mut CrawlProgress) {
        let details_url = &result.metadata.job_details_url;

        let id = match extract_item_id(details_url) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping result: {}", e);
                progress.record(details_url, ItemOutcome::InvalidId, Some(e.to_string()));
                return;
            }
        };

        match self.fetcher.fetch_and_store(&id, &mut self.storage).await {
            Ok(listing) => {
                tracing::debug!("Persisted {} ({})", id, listing.title);
                progress.record(&id, ItemOutcome::Persisted, None);
            }
            Err(e) => {
                log_item_failure(&e);
                progress.record(&id, ItemOutcome::from(&e), Some(e.to_string()));
            }
        }
    }
}

fn log_item_failure(err: &FetchError) {
    match err {
        FetchError::Transport { id, source } => {
            tracing::warn!(
                "Item {} failed ({}), skipping: {}",
                id,
                classify_transport_error(source),
                source
            );
        }
        e if e.is_constraint_violation() => {
            // Upserts should never violate a key; this is a bug, not a bad payload
            tracing::error!("Storage invariant violated for item {}: {}", e.item_id(), e);
        }
        e => {
            tracing::warn!("Item {} failed, skipping: {}", e.item_id(), e);
        }
    }
}
