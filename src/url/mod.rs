//! URL handling module for Job-Spider
//!
//! This module derives item identifiers from detail-page URLs and builds the
//! addresses of the remote search and detail endpoints.

mod endpoint;
mod item_id;

// Re-export main functions
pub use endpoint::{detail_url, search_url};
pub use item_id::extract_item_id;
