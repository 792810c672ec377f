//! Output module for statistics and listing reports
//!
//! This module handles:
//! - Summary statistics of the listing database
//! - Plain-text listing cards for the terminal
//! - Markdown export of stored listings

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use report::{description_text, format_listing, format_match};
pub use stats::{load_statistics, print_crawl_summary, print_statistics, StoreStatistics};

use crate::listing::Listing;
use crate::storage::Storage;
use crate::SpiderError;

/// Loads every stored listing, ordered by id
pub fn load_all_listings(storage: &dyn Storage) -> Result<Vec<Listing>, SpiderError> {
    let mut listings = Vec::new();

    for id in storage.listing_ids()? {
        if let Some(listing) = storage.get_listing(&id)? {
            listings.push(listing);
        }
    }

    Ok(listings)
}
