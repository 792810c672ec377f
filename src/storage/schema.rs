//! Database schema definitions
//!
//! One root table for listings, one employer table and one child table per
//! attribute set. Every statement is `IF NOT EXISTS`, so bootstrapping an
//! existing database is a no-op.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per listing, replaced wholesale on every re-crawl
CREATE TABLE IF NOT EXISTS listings (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    min_years_experience INTEGER NOT NULL,
    status TEXT NOT NULL,
    employer_id TEXT NOT NULL,
    url TEXT NOT NULL,
    salary_min INTEGER NOT NULL,
    salary_max INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_employer ON listings(employer_id);

-- Employers keyed by registration id and display name
CREATE TABLE IF NOT EXISTS employers (
    employer_id TEXT NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (employer_id, name)
);

-- Attribute sets, one row per (listing, value)
CREATE TABLE IF NOT EXISTS listing_skills (
    listing_id TEXT NOT NULL,
    skill TEXT NOT NULL,
    PRIMARY KEY (listing_id, skill)
);

CREATE TABLE IF NOT EXISTS listing_categories (
    listing_id TEXT NOT NULL,
    category TEXT NOT NULL,
    PRIMARY KEY (listing_id, category)
);

CREATE TABLE IF NOT EXISTS listing_employment_types (
    listing_id TEXT NOT NULL,
    employment_type TEXT NOT NULL,
    PRIMARY KEY (listing_id, employment_type)
);

CREATE TABLE IF NOT EXISTS listing_position_levels (
    listing_id TEXT NOT NULL,
    position_level TEXT NOT NULL,
    PRIMARY KEY (listing_id, position_level)
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
