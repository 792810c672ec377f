//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::listing::{AttributeKind, Listing};
use crate::storage::{ListingMatch, ListingQuery};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns true if the error signals a broken schema invariant rather than
    /// an unavailable store
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(message.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => Self::Sqlite(err),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Writes go through `persist_listing`, which must be atomic: after it returns
/// either every row of the listing is visible or none of the new ones are.
pub trait Storage {
    // ===== Persistence =====

    /// Writes one normalized listing as a single unit of work
    ///
    /// Upserts the listing row and its employer row, then replaces each of
    /// the four attribute sets so that the stored set equals the given one.
    /// Persisting the same listing twice leaves identical state.
    fn persist_listing(&mut self, listing: &Listing) -> StorageResult<()>;

    // ===== Lookup =====

    /// Loads a listing with its attribute sets and employer
    fn get_listing(&self, id: &str) -> StorageResult<Option<Listing>>;

    /// Gets all stored listing ids, sorted
    fn listing_ids(&self) -> StorageResult<Vec<String>>;

    /// Searches stored listings
    fn find_listings(&self, query: &ListingQuery) -> StorageResult<Vec<ListingMatch>>;

    // ===== Statistics =====

    /// Gets total listing count
    fn count_listings(&self) -> StorageResult<u64>;

    /// Gets the number of employer rows
    fn count_employers(&self) -> StorageResult<u64>;

    /// Counts rows in one attribute table
    fn count_attribute_rows(&self, kind: AttributeKind) -> StorageResult<u64>;

    /// Gets the most frequent values of one attribute set
    ///
    /// Returns (value, number of listings) pairs, most frequent first
    fn top_attribute_values(
        &self,
        kind: AttributeKind,
        limit: u32,
    ) -> StorageResult<Vec<(String, u64)>>;
}
