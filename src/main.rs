//! Job-Spider main entry point
//!
//! This is the command-line interface for the Job-Spider listing harvester.

use anyhow::{bail, Context};
use clap::Parser;
use job_spider::config::{load_config_with_hash, validate_search_term, Config};
use job_spider::crawler::run_crawl;
use job_spider::output::{
    format_listing, format_match, generate_markdown_report, load_all_listings, load_statistics,
    print_crawl_summary, print_statistics,
};
use job_spider::storage::{open_storage, ListingQuery, Storage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Job-Spider: a paginated job-listing harvester
///
/// Job-Spider walks the search results of a job-listing API page by page,
/// fetches every listing's detail record and stores it in SQLite. Re-running
/// a crawl refreshes listings in place.
#[derive(Parser, Debug)]
#[command(name = "job-spider")]
#[command(version)]
#[command(about = "A paginated job-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search term to crawl instead of the configured one
    #[arg(long, value_name = "TERM")]
    term: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_report", "show", "find"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_report", "show", "find"])]
    stats: bool,

    /// Write a markdown report of stored listings and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "show", "find"])]
    export_report: bool,

    /// Print one stored listing and exit
    #[arg(long, value_name = "ID", conflicts_with_all = ["dry_run", "stats", "export_report", "find"])]
    show: Option<String>,

    /// Search stored listings by title or description and exit
    #[arg(long, value_name = "TERM", conflicts_with_all = ["dry_run", "stats", "export_report", "show"])]
    find: Option<String>,

    /// Lowest acceptable minimum salary (with --find)
    #[arg(long, requires = "find")]
    salary_min: Option<i64>,

    /// Highest acceptable maximum salary (with --find)
    #[arg(long, requires = "find")]
    salary_max: Option<i64>,

    /// Lowest acceptable years of experience (with --find)
    #[arg(long, requires = "find")]
    experience_min: Option<i64>,

    /// Highest acceptable years of experience (with --find)
    #[arg(long, requires = "find")]
    experience_max: Option<i64>,

    /// Maximum number of matches to print (with --find)
    #[arg(long, requires = "find")]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(term) = &cli.term {
        if let Err(e) = validate_search_term(term) {
            bail!("Invalid --term '{}': {}", term, e);
        }
    }

    let search_term = cli
        .term
        .clone()
        .unwrap_or_else(|| config.crawler.search_term.clone());

    if cli.dry_run {
        handle_dry_run(&config, &search_term)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.export_report {
        handle_export_report(&config)
    } else if let Some(id) = &cli.show {
        handle_show(&config, id)
    } else if let Some(term) = &cli.find {
        let query = ListingQuery {
            term: Some(term.clone()).filter(|t| !t.trim().is_empty()),
            salary_min: cli.salary_min,
            salary_max: cli.salary_max,
            experience_min: cli.experience_min,
            experience_max: cli.experience_max,
            limit: cli.limit,
        };
        handle_find(&config, &query)
    } else {
        handle_crawl(&config, &search_term).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_spider=info,warn"),
            1 => EnvFilter::new("job_spider=debug,info"),
            2 => EnvFilter::new("job_spider=trace,debug"),
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

fn open_database(config: &Config) -> anyhow::Result<job_spider::storage::SqliteStorage> {
    open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open database {}", config.output.database_path))
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, search_term: &str) -> anyhow::Result<()> {
    println!("=== Job-Spider Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Search path: {}", config.api.search_path);
    println!("  Detail path: {}", config.api.detail_path);
    println!("  Page size: {}", config.api.page_size);

    println!("\nCrawler Configuration:");
    println!("  Search term: {}", search_term);
    println!(
        "  Pacing: {}ms after every {} items",
        config.crawler.pacing_interval, config.crawler.pacing_batch_size
    );
    println!("  Search retries: {}", config.crawler.search_retries);
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl search term '{}' from page 0", search_term);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_database(config)?;
    let stats = load_statistics(&storage).context("Failed to load statistics")?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-report mode: writes a markdown report
fn handle_export_report(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Listing Report ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.report_path);
    println!();

    let storage = open_database(config)?;

    tracing::info!("Loading listings from database...");
    let listings = load_all_listings(&storage).context("Failed to load listings")?;

    tracing::info!("Generating markdown report for {} listings...", listings.len());
    generate_markdown_report(&listings, Path::new(&config.output.report_path))
        .with_context(|| format!("Failed to write report {}", config.output.report_path))?;

    println!("✓ Report exported to: {}", config.output.report_path);

    Ok(())
}

/// Handles the --show mode: prints one stored listing
fn handle_show(config: &Config, id: &str) -> anyhow::Result<()> {
    let storage = open_database(config)?;

    match storage.get_listing(id).context("Failed to read listing")? {
        Some(listing) => {
            println!("{}", format_listing(&listing));
            Ok(())
        }
        None => bail!("No stored listing with id '{}'", id),
    }
}

/// Handles the --find mode: searches stored listings
fn handle_find(config: &Config, query: &ListingQuery) -> anyhow::Result<()> {
    let storage = open_database(config)?;
    let matches = storage
        .find_listings(query)
        .context("Failed to search listings")?;

    if matches.is_empty() {
        println!("No matching listings.");
        return Ok(());
    }

    for hit in &matches {
        println!("{}", format_match(hit));
    }
    println!("{} matching listings", matches.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, search_term: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling '{}' from {} ({} results per page)",
        search_term,
        config.api.base_url,
        config.api.page_size
    );

    let progress = run_crawl(config, search_term)
        .await
        .with_context(|| format!("Crawl for '{}' failed", search_term))?;

    print_crawl_summary(&progress);

    Ok(())
}
