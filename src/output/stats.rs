//! Statistics generation from the listing database
//!
//! This module provides functionality for extracting and displaying
//! database and crawl statistics.

use crate::listing::AttributeKind;
use crate::state::{CrawlProgress, ItemOutcome};
use crate::storage::Storage;
use crate::SpiderError;

/// Number of most frequent values listed per attribute set
const TOP_VALUES: u32 = 10;

/// Listing database statistics
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    pub listings: u64,
    pub employers: u64,

    /// Row count per attribute table
    pub attribute_rows: Vec<(AttributeKind, u64)>,

    /// Most common skills across listings
    pub top_skills: Vec<(String, u64)>,

    /// Most common categories across listings
    pub top_categories: Vec<(String, u64)>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(SpiderError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, SpiderError> {
    let mut attribute_rows = Vec::with_capacity(AttributeKind::ALL.len());
    for kind in AttributeKind::ALL {
        attribute_rows.push((kind, storage.count_attribute_rows(kind)?));
    }

    Ok(StoreStatistics {
        listings: storage.count_listings()?,
        employers: storage.count_employers()?,
        attribute_rows,
        top_skills: storage.top_attribute_values(AttributeKind::Skill, TOP_VALUES)?,
        top_categories: storage.top_attribute_values(AttributeKind::Category, TOP_VALUES)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Listing Statistics ===\n");

    println!("Overview:");
    println!("  Listings: {}", stats.listings);
    println!("  Employer records: {}", stats.employers);
    println!();

    println!("Attribute Rows:");
    for (kind, count) in &stats.attribute_rows {
        let per_listing = if stats.listings > 0 {
            *count as f64 / stats.listings as f64
        } else {
            0.0
        };
        println!("  {}: {} ({:.1} per listing)", kind.label(), count, per_listing);
    }
    println!();

    print_ranking("Top Skills", &stats.top_skills);
    print_ranking("Top Categories", &stats.top_categories);
}

fn print_ranking(title: &str, values: &[(String, u64)]) {
    if values.is_empty() {
        return;
    }

    println!("{}:", title);
    for (value, count) in values {
        println!("  {:>5}  {}", count, value);
    }
    println!();
}

/// Prints the outcome of one crawl
pub fn print_crawl_summary(progress: &CrawlProgress) {
    println!("=== Crawl Summary: '{}' ===\n", progress.search_term);
    println!("  Results reported: {}", progress.total_reported);
    println!("  Pages walked: {}", progress.pages_walked);
    println!("  Items seen: {}", progress.items_seen);
    println!("  Persisted: {}", progress.items_persisted);
    println!("  Pacing pauses: {}", progress.pauses);
    if let Some(duration) = progress.duration_seconds() {
        println!("  Duration: {}s", duration);
    }

    if !progress.failures.is_empty() {
        println!("\nFailures ({}):", progress.items_failed());
        for outcome in [
            ItemOutcome::TransportFailed,
            ItemOutcome::ParseFailed,
            ItemOutcome::PersistFailed,
            ItemOutcome::InvalidId,
        ] {
            let count = progress.count(outcome);
            if count > 0 {
                println!("  {}: {}", outcome, count);
            }
        }

        println!("\nFailed items (re-fetch by id):");
        for failure in &progress.failures {
            println!("  - {} [{}] {}", failure.id, failure.outcome, failure.error);
        }
    }

    println!(
        "\nSuccess Rate: {:.1}% ({} / {} items persisted)",
        progress.success_rate() * 100.0,
        progress.items_persisted,
        progress.items_seen
    );
}
