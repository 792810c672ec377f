//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ItemOutcome`: what happened to a single search result
//! - `CrawlProgress`: running totals for one crawl of one search term

mod item_outcome;
mod progress;

// Re-export main types
pub use item_outcome::ItemOutcome;
pub use progress::{CrawlProgress, FailedItem};
