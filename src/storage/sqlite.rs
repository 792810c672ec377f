//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::listing::{AttributeKind, Employer, Listing};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ListingMatch, ListingQuery};
use crate::SpiderError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;

/// Most recently written employer name for an employer id
///
/// `INSERT OR REPLACE` re-inserts the row on every write, so the highest rowid
/// is the latest name seen.
const LATEST_EMPLOYER_NAME: &str =
    "SELECT name FROM employers WHERE employer_id = ?1 ORDER BY rowid DESC LIMIT 1";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Missing parent directories are created and the schema is bootstrapped.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SpiderError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SpiderError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StorageError::from)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened listing database at {}", path.display());

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SpiderError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_attributes(&self, id: &str, kind: AttributeKind) -> StorageResult<BTreeSet<String>> {
        let sql = format!(
            "SELECT {column} FROM {table} WHERE listing_id = ?1",
            column = kind.column(),
            table = kind.table()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;

        let values = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(values)
    }

    fn count_rows(&self, table: &str) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    // ===== Persistence =====

    fn persist_listing(&mut self, listing: &Listing) -> StorageResult<()> {
        // Dropping the transaction without commit rolls every write back
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO listings
             (id, title, description, min_years_experience, status, employer_id, url, salary_min, salary_max)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                listing.id,
                listing.title,
                listing.description,
                listing.min_years_experience,
                listing.status,
                listing.employer.employer_id,
                listing.url,
                listing.salary_min,
                listing.salary_max,
            ],
        )?;

        tx.execute(
            "INSERT OR REPLACE INTO employers (employer_id, name) VALUES (?1, ?2)",
            params![listing.employer.employer_id, listing.employer.name],
        )?;

        for kind in AttributeKind::ALL {
            // Replace, not merge: values dropped since the last crawl must go
            tx.execute(
                &format!("DELETE FROM {} WHERE listing_id = ?1", kind.table()),
                params![listing.id],
            )?;

            let mut insert = tx.prepare_cached(&format!(
                "INSERT OR REPLACE INTO {table} (listing_id, {column}) VALUES (?1, ?2)",
                table = kind.table(),
                column = kind.column()
            ))?;
            for value in listing.attributes(kind) {
                insert.execute(params![listing.id, value])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    // ===== Lookup =====

    fn get_listing(&self, id: &str) -> StorageResult<Option<Listing>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, min_years_experience, status, employer_id, url,
             salary_min, salary_max
             FROM listings WHERE id = ?1",
        )?;

        let listing = stmt
            .query_row(params![id], |row| {
                Ok(Listing {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    min_years_experience: row.get(3)?,
                    status: row.get(4)?,
                    employer: Employer {
                        employer_id: row.get(5)?,
                        name: String::new(),
                    },
                    url: row.get(6)?,
                    salary_min: row.get(7)?,
                    salary_max: row.get(8)?,
                    skills: BTreeSet::new(),
                    categories: BTreeSet::new(),
                    employment_types: BTreeSet::new(),
                    position_levels: BTreeSet::new(),
                })
            })
            .optional()?;

        let Some(mut listing) = listing else {
            return Ok(None);
        };

        listing.employer.name = self
            .conn
            .query_row(
                LATEST_EMPLOYER_NAME,
                params![listing.employer.employer_id],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or_default();

        for kind in AttributeKind::ALL {
            *listing.attributes_mut(kind) = self.load_attributes(&listing.id, kind)?;
        }

        Ok(Some(listing))
    }

    fn listing_ids(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT id FROM listings ORDER BY id")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn find_listings(&self, query: &ListingQuery) -> StorageResult<Vec<ListingMatch>> {
        let mut sql = format!(
            "SELECT l.id, l.title, ({company}), l.min_years_experience, l.salary_min,
             l.salary_max, l.url
             FROM listings l
             WHERE 1 = 1",
            company = LATEST_EMPLOYER_NAME.replace("?1", "l.employer_id")
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(term) = query.term.as_deref().filter(|t| !t.trim().is_empty()) {
            sql.push_str(" AND (l.title LIKE ? ESCAPE '\\' OR l.description LIKE ? ESCAPE '\\')");
            let pattern = format!("%{}%", escape_like(term.trim()));
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }

        if let Some(salary_min) = query.salary_min {
            sql.push_str(" AND l.salary_min >= ?");
            values.push(Value::Integer(salary_min));
        }

        if let Some(salary_max) = query.salary_max {
            sql.push_str(" AND l.salary_max <= ?");
            values.push(Value::Integer(salary_max));
        }

        if let Some(experience_min) = query.experience_min {
            sql.push_str(" AND l.min_years_experience >= ?");
            values.push(Value::Integer(experience_min));
        }

        if let Some(experience_max) = query.experience_max {
            sql.push_str(" AND l.min_years_experience <= ?");
            values.push(Value::Integer(experience_max));
        }

        sql.push_str(" ORDER BY l.salary_max DESC, l.id");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let matches = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(ListingMatch {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    company: row.get(2)?,
                    min_years_experience: row.get(3)?,
                    salary_min: row.get(4)?,
                    salary_max: row.get(5)?,
                    url: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(matches)
    }

    // ===== Statistics =====

    fn count_listings(&self) -> StorageResult<u64> {
        self.count_rows("listings")
    }

    fn count_employers(&self) -> StorageResult<u64> {
        self.count_rows("employers")
    }

    fn count_attribute_rows(&self, kind: AttributeKind) -> StorageResult<u64> {
        self.count_rows(kind.table())
    }

    fn top_attribute_values(
        &self,
        kind: AttributeKind,
        limit: u32,
    ) -> StorageResult<Vec<(String, u64)>> {
        let sql = format!(
            "SELECT {column}, COUNT(*) AS count FROM {table}
             GROUP BY {column} ORDER BY count DESC, {column} LIMIT ?1",
            column = kind.column(),
            table = kind.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let values = stmt
            .query_map(params![limit], |row| {
                Ok((row.get(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(values)
    }
}

/// Escapes LIKE wildcards so a search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
