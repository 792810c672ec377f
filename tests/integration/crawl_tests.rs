//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the listing API and run the
//! page walker end-to-end against a temporary SQLite database.

use job_spider::config::{ApiConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use job_spider::crawler::{build_http_client, run_crawl, NoPacing, PageWalker};
use job_spider::storage::{SqliteStorage, Storage};
use job_spider::{AttributeKind, ItemOutcome, SpiderError};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_TERM: &str = "rust developer";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &Path) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            search_path: "/v2/search".to_string(),
            detail_path: "/v2/jobs".to_string(),
            page_size: 100,
        },
        crawler: CrawlerConfig {
            search_term: SEARCH_TERM.to_string(),
            pacing_batch_size: 10,
            pacing_interval: 0, // No real pauses in tests
            search_retries: 0,
            request_timeout: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.display().to_string(),
            report_path: db_path.with_extension("md").display().to_string(),
        },
    }
}

fn job_id(n: usize) -> String {
    format!("JOB{:02}", n)
}

fn search_body(total: u64, ids: &[String]) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "uuid": id,
                "metadata": {
                    "jobDetailsUrl": format!("https://www.example.com/job/engineering/rust-developer-{}", id)
                }
            })
        })
        .collect();

    json!({ "total": total, "results": results })
}

fn detail_body(id: &str, skills: &[&str]) -> Value {
    let skills: Vec<Value> = skills.iter().map(|s| json!({ "skill": s })).collect();

    json!({
        "uuid": id,
        "title": format!("Rust Developer {}", id),
        "description": "<p>Write <b>fast</b> services.</p>",
        "minimumYearsExperience": 3,
        "status": { "jobStatus": "Open" },
        "postedCompany": { "uen": "201234567K", "name": "ACME PTE. LTD." },
        "metadata": {
            "jobDetailsUrl": format!("https://www.example.com/job/engineering/rust-developer-{}", id)
        },
        "salary": { "minimum": 5000, "maximum": 8000 },
        "skills": skills,
        "categories": [{ "category": "Information Technology" }],
        "employmentTypes": [{ "employmentType": "Full Time" }],
        "positionLevels": [{ "position": "Senior Executive" }]
    })
}

async fn mount_search_page(server: &MockServer, page: u32, total: u64, ids: &[String]) {
    Mock::given(method("POST"))
        .and(path("/v2/search"))
        .and(query_param("limit", "100"))
        .and(query_param("page", page.to_string()))
        .and(body_json(json!({ "search": SEARCH_TERM })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(total, ids)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/jobs/{}", id)))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer, ids: &[String]) {
    for id in ids {
        mount_detail(
            server,
            id,
            ResponseTemplate::new(200).set_body_json(detail_body(id, &["Rust", "SQL"])),
        )
        .await;
    }
}

fn open_test_storage(dir: &TempDir) -> SqliteStorage {
    SqliteStorage::new(&dir.path().join("listings.db")).expect("Failed to open DB")
}

fn walker(config: &Config, storage: SqliteStorage) -> PageWalker<SqliteStorage> {
    walker_with_timeout(config, storage, Duration::from_secs(5))
}

fn walker_with_timeout(
    config: &Config,
    storage: SqliteStorage,
    timeout: Duration,
) -> PageWalker<SqliteStorage> {
    let client = build_http_client(&config.user_agent, timeout).expect("Failed to build client");
    PageWalker::new(config, client, storage).expect("Failed to create walker")
}

#[tokio::test]
async fn test_pagination_stops_after_reported_total() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let pages: Vec<Vec<String>> = vec![
        (0..3).map(job_id).collect(),
        (3..6).map(job_id).collect(),
        (6..8).map(job_id).collect(),
    ];
    for (page, ids) in pages.iter().enumerate() {
        mount_search_page(&server, page as u32, 250, ids).await;
        mount_details(&server, ids).await;
    }

    // A fourth page must never be requested
    Mock::given(method("POST"))
        .and(path("/v2/search"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(250, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.pages_walked, 3);
    assert_eq!(progress.total_reported, 250);
    assert_eq!(progress.items_seen, 8);
    assert_eq!(progress.items_persisted, 8);
    assert!(progress.failures.is_empty());
    assert_eq!(walker.storage().count_listings().unwrap(), 8);
}

#[tokio::test]
async fn test_empty_result_set() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_search_page(&server, 0, 0, &[]).await;

    // No detail request is made
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.pages_walked, 0);
    assert_eq!(progress.items_seen, 0);
    assert_eq!(walker.storage().count_listings().unwrap(), 0);
}

#[tokio::test]
async fn test_zero_total_skips_returned_results() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=3).map(job_id).collect();
    mount_search_page(&server, 0, 0, &ids).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.pages_walked, 0);
    assert_eq!(progress.items_seen, 0);
    assert_eq!(progress.total_reported, 0);
    assert_eq!(walker.storage().count_listings().unwrap(), 0);
}

#[tokio::test]
async fn test_item_failure_does_not_abort_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let first: Vec<String> = (1..=20).map(job_id).collect();
    let second: Vec<String> = (21..=25).map(job_id).collect();
    mount_search_page(&server, 0, 120, &first).await;
    mount_search_page(&server, 1, 120, &second).await;

    // Item 5 of 20 answers a server error
    mount_detail(&server, "JOB05", ResponseTemplate::new(500)).await;
    let healthy: Vec<String> = first
        .iter()
        .chain(second.iter())
        .filter(|id| id.as_str() != "JOB05")
        .cloned()
        .collect();
    mount_details(&server, &healthy).await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.pages_walked, 2);
    assert_eq!(progress.items_seen, 25);
    assert_eq!(progress.items_persisted, 24);
    assert_eq!(progress.failures.len(), 1);
    assert_eq!(progress.failures[0].id, "JOB05");
    assert_eq!(progress.failures[0].outcome, ItemOutcome::TransportFailed);

    let storage = walker.storage();
    assert!(storage.get_listing("JOB05").unwrap().is_none());
    assert!(storage.get_listing("JOB06").unwrap().is_some());
    assert!(storage.get_listing("JOB25").unwrap().is_some());
}

#[tokio::test]
async fn test_item_timeout_is_isolated() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=20).map(job_id).collect();
    mount_search_page(&server, 0, 20, &ids).await;

    // Item 5 answers only after the client has given up
    mount_detail(
        &server,
        "JOB05",
        ResponseTemplate::new(200)
            .set_body_json(detail_body("JOB05", &["Rust"]))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let healthy: Vec<String> = ids.iter().filter(|id| id.as_str() != "JOB05").cloned().collect();
    mount_details(&server, &healthy).await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker_with_timeout(
        &config,
        open_test_storage(&dir),
        Duration::from_millis(500),
    );

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.items_seen, 20);
    assert_eq!(progress.items_persisted, 19);
    assert_eq!(progress.failures.len(), 1);
    assert_eq!(progress.failures[0].id, "JOB05");
    assert_eq!(progress.failures[0].outcome, ItemOutcome::TransportFailed);
    assert!(
        progress.failures[0].error.starts_with("Transport error"),
        "unexpected error: {}",
        progress.failures[0].error
    );

    let storage = walker.storage();
    assert!(storage.get_listing("JOB05").unwrap().is_none());
    assert!(storage.get_listing("JOB06").unwrap().is_some());
}

#[tokio::test]
async fn test_duplicate_skills_collapse() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids = vec![job_id(1)];
    mount_search_page(&server, 0, 1, &ids).await;
    mount_detail(
        &server,
        &ids[0],
        ResponseTemplate::new(200).set_body_json(detail_body(&ids[0], &["Rust", "Rust", "Go"])),
    )
    .await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");
    assert_eq!(progress.items_persisted, 1);

    let storage = walker.storage();
    assert_eq!(storage.count_attribute_rows(AttributeKind::Skill).unwrap(), 2);

    let listing = storage.get_listing("JOB01").unwrap().unwrap();
    let skills: Vec<&str> = listing.skills.iter().map(String::as_str).collect();
    assert_eq!(skills, vec!["Go", "Rust"]);
    assert_eq!(listing.employer.name, "ACME PTE. LTD.");
    assert_eq!(listing.salary_min, 5000);
}

#[tokio::test]
async fn test_parse_failure_is_isolated() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=3).map(job_id).collect();
    mount_search_page(&server, 0, 3, &ids).await;

    let mut broken = detail_body("JOB02", &["Rust"]);
    broken.as_object_mut().unwrap().remove("title");
    mount_detail(&server, "JOB02", ResponseTemplate::new(200).set_body_json(broken)).await;
    mount_details(&server, &[job_id(1), job_id(3)]).await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.items_persisted, 2);
    assert_eq!(progress.count(ItemOutcome::ParseFailed), 1);
    assert_eq!(progress.failures[0].id, "JOB02");

    let storage = walker.storage();
    assert!(storage.get_listing("JOB02").unwrap().is_none());
    assert_eq!(storage.count_listings().unwrap(), 2);
}

#[tokio::test]
async fn test_pacing_pauses_twice_on_25_item_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=25).map(job_id).collect();
    mount_search_page(&server, 0, 25, &ids).await;
    mount_details(&server, &ids).await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    let mut walker = walker(&config, open_test_storage(&dir));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.items_persisted, 25);
    assert_eq!(progress.pauses, 2);
}

#[tokio::test]
async fn test_swapped_pacing_policy_never_pauses() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=25).map(job_id).collect();
    mount_search_page(&server, 0, 25, &ids).await;
    mount_details(&server, &ids).await;

    let mut config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    config.crawler.pacing_interval = 10_000;
    let mut walker = walker(&config, open_test_storage(&dir)).with_pacing(Box::new(NoPacing));

    let progress = walker.crawl(SEARCH_TERM).await.expect("Crawl failed");

    assert_eq!(progress.items_persisted, 25);
    assert_eq!(progress.pauses, 0);
}

#[tokio::test]
async fn test_search_failure_aborts_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // One retry: the page is requested twice before giving up
    Mock::given(method("POST"))
        .and(path("/v2/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    config.crawler.search_retries = 1;
    let mut walker = walker(&config, open_test_storage(&dir));

    let err = walker.crawl(SEARCH_TERM).await.unwrap_err();
    assert!(
        matches!(err, SpiderError::Status { status: 500, .. }),
        "unexpected error: {}",
        err
    );
    assert_eq!(walker.storage().count_listings().unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_search_page_aborts_without_retry() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/v2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &dir.path().join("listings.db"));
    config.crawler.search_retries = 3;
    let mut walker = walker(&config, open_test_storage(&dir));

    let err = walker.crawl(SEARCH_TERM).await.unwrap_err();
    assert!(matches!(err, SpiderError::Json { .. }));
}

#[tokio::test]
async fn test_recrawl_is_idempotent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=4).map(job_id).collect();
    Mock::given(method("POST"))
        .and(path("/v2/search"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(4, &ids)))
        .expect(2)
        .mount(&server)
        .await;
    mount_details(&server, &ids).await;

    let config = create_test_config(&server.uri(), &dir.path().join("listings.db"));

    let mut first = walker(&config, open_test_storage(&dir));
    first.crawl(SEARCH_TERM).await.expect("First crawl failed");
    let storage = first.into_storage();
    let listings = storage.count_listings().unwrap();
    let skills = storage.count_attribute_rows(AttributeKind::Skill).unwrap();
    let employers = storage.count_employers().unwrap();

    let mut second = walker(&config, storage);
    second.crawl(SEARCH_TERM).await.expect("Second crawl failed");
    let storage = second.storage();

    assert_eq!(listings, 4);
    assert_eq!(storage.count_listings().unwrap(), listings);
    assert_eq!(
        storage.count_attribute_rows(AttributeKind::Skill).unwrap(),
        skills
    );
    assert_eq!(storage.count_employers().unwrap(), employers);
}

#[tokio::test]
async fn test_run_crawl_end_to_end() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let ids: Vec<String> = (1..=2).map(job_id).collect();
    mount_search_page(&server, 0, 2, &ids).await;
    mount_details(&server, &ids).await;

    // Parent directories are created on demand
    let db_path = dir.path().join("data").join("listings.db");
    let config = create_test_config(&server.uri(), &db_path);

    let progress = run_crawl(&config, SEARCH_TERM).await.expect("Crawl failed");
    assert_eq!(progress.items_persisted, 2);
    assert!(progress.finished_at.is_some());

    let storage = SqliteStorage::new(&db_path).expect("Failed to reopen DB");
    let listing = storage.get_listing("JOB02").unwrap().unwrap();
    assert_eq!(listing.title, "Rust Developer JOB02");
    assert_eq!(listing.min_years_experience, 3);
    assert_eq!(listing.status, "Open");
    assert!(listing.employment_types.contains("Full Time"));
}
