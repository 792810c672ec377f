//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the spider, including:
//! - Building HTTP clients with proper user agent strings
//! - POST requests for search result pages
//! - GET requests for listing detail records (the Item Fetcher)
//! - Error classification for logging

use crate::config::{ApiConfig, UserAgentConfig};
use crate::listing::{
    normalize, parse_job_detail, parse_search_response, Listing, SearchRequest, SearchResponse,
};
use crate::storage::{Storage, StorageError};
use crate::url::detail_url;
use crate::{SpiderError, UrlError};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure to harvest a single item
///
/// Every variant names the item so it can be re-fetched by hand. None of them
/// is fatal to the page or the crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error fetching item {id}: {source}")]
    Transport {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Item {id} answered HTTP {status}")]
    Status { id: String, status: u16 },

    #[error("Malformed payload for item {id}: {source}")]
    Parse {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to store item {id}: {source}")]
    Persistence {
        id: String,
        #[source]
        source: StorageError,
    },

    #[error("Cannot address item {id}: {source}")]
    InvalidUrl {
        id: String,
        #[source]
        source: UrlError,
    },
}

impl FetchError {
    /// Identifier of the item that failed
    pub fn item_id(&self) -> &str {
        match self {
            Self::Transport { id, .. }
            | Self::Status { id, .. }
            | Self::Parse { id, .. }
            | Self::Persistence { id, .. }
            | Self::InvalidUrl { id, .. } => id,
        }
    }

    /// Returns true if the failure breaks a storage invariant
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Persistence { source, .. } if source.is_constraint_violation())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall per-request timeout
///
/// # Example
///
/// ```no_run
/// use job_spider::config::UserAgentConfig;
/// use job_spider::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "JobSpider".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Short description of a transport failure for log lines
pub fn classify_transport_error(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "request timeout"
    } else if err.is_connect() {
        "connection refused"
    } else if err.is_decode() || err.is_body() {
        "truncated body"
    } else {
        "request failed"
    }
}

/// Requests one page of search results
///
/// Sends `POST {search_url}?limit={page_size}&page={page}` with the search
/// term as a JSON body.
///
/// # Returns
///
/// * `Ok(SearchResponse)` - The parsed page
/// * `Err(SpiderError::Http)` - The endpoint could not be reached
/// * `Err(SpiderError::Status)` - The endpoint answered with a non-2xx status
/// * `Err(SpiderError::Json)` - The body is not a search page
pub async fn fetch_search_page(
    client: &Client,
    search_url: &Url,
    search_term: &str,
    page_size: u32,
    page: u32,
) -> Result<SearchResponse, SpiderError> {
    let response = client
        .post(search_url.clone())
        .query(&[("limit", page_size), ("page", page)])
        .json(&SearchRequest {
            search: search_term,
        })
        .send()
        .await
        .map_err(|source| SpiderError::Http {
            url: search_url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SpiderError::Status {
            url: search_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| SpiderError::Http {
        url: search_url.to_string(),
        source,
    })?;

    parse_search_response(&body).map_err(|source| SpiderError::Json {
        url: search_url.to_string(),
        source,
    })
}

/// Retrieves listing detail records
///
/// One attempt per call; retrying is left to callers.
#[derive(Debug, Clone)]
pub struct ItemFetcher {
    client: Client,
    base_url: String,
    detail_path: String,
}

impl ItemFetcher {
    pub fn new(client: Client, api: &ApiConfig) -> Self {
        Self {
            client,
            base_url: api.base_url.clone(),
            detail_path: api.detail_path.clone(),
        }
    }

    /// Fetches, parses and normalizes the detail record of one item
    pub async fn fetch_listing(&self, id: &str) -> Result<Listing, FetchError> {
        let url = detail_url(&self.base_url, &self.detail_path, id).map_err(|source| {
            FetchError::InvalidUrl {
                id: id.to_string(),
                source,
            }
        })?;

        let transport = |source| FetchError::Transport {
            id: id.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;

        let detail = parse_job_detail(&body).map_err(|source| FetchError::Parse {
            id: id.to_string(),
            source,
        })?;

        Ok(normalize(id, detail))
    }

    /// Fetches one item and persists it before reporting success
    pub async fn fetch_and_store<S>(&self, id: &str, storage: &mut S) -> Result<Listing, FetchError>
    where
        S: Storage + ?Sized,
    {
        let listing = self.fetch_listing(id).await?;

        storage
            .persist_listing(&listing)
            .map_err(|source| FetchError::Persistence {
                id: id.to_string(),
                source,
            })?;

        Ok(listing)
    }
}
