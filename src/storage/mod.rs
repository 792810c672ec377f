//! Storage module for persisting harvested listings
//!
//! This module handles all database operations for the spider, including:
//! - SQLite database initialization and schema management
//! - Transactional, idempotent listing persistence
//! - Read-side queries for statistics, reports and searches

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::SpiderError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SpiderError)` - Failed to open the file or create the schema
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SpiderError> {
    SqliteStorage::new(path)
}

/// Filters for searching stored listings
///
/// Every bound is inclusive and optional; an empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring matched against title or description
    pub term: Option<String>,

    /// Lowest acceptable `salary_min`
    pub salary_min: Option<i64>,

    /// Highest acceptable `salary_max`
    pub salary_max: Option<i64>,

    pub experience_min: Option<i64>,
    pub experience_max: Option<i64>,

    /// Maximum number of rows returned
    pub limit: Option<u32>,
}

/// A stored listing matching a `ListingQuery`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingMatch {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub min_years_experience: i64,
    pub salary_min: i64,
    pub salary_max: i64,
    pub url: String,
}
