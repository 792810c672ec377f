//! Listing module: wire schema and the normalized relational shape
//!
//! This module contains:
//! - Explicit serde structs for the search and detail responses
//! - The `Listing` and `Employer` records persisted by the storage layer
//! - The pure normalizer turning a detail payload into a `Listing`

mod normalize;
mod payload;

pub use normalize::normalize;
pub use payload::{
    parse_job_detail, parse_search_response, JobDetail, SearchRequest, SearchResponse,
    SearchResult,
};

use std::collections::BTreeSet;
use std::fmt;

/// A business entity referenced by listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employer {
    /// External business-registration identifier (UEN)
    pub employer_id: String,

    /// Display name as last seen on a listing
    pub name: String,
}

/// One normalized job posting plus its attribute sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Identifier extracted from the detail-page URL
    pub id: String,
    pub title: String,
    pub description: String,
    pub min_years_experience: i64,
    /// Status string as reported by the source API
    pub status: String,
    pub url: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub employer: Employer,

    pub skills: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub employment_types: BTreeSet<String>,
    pub position_levels: BTreeSet<String>,
}

impl Listing {
    /// Returns the attribute set of the given kind
    pub fn attributes(&self, kind: AttributeKind) -> &BTreeSet<String> {
        match kind {
            AttributeKind::Skill => &self.skills,
            AttributeKind::Category => &self.categories,
            AttributeKind::EmploymentType => &self.employment_types,
            AttributeKind::PositionLevel => &self.position_levels,
        }
    }

    /// Returns a mutable reference to the attribute set of the given kind
    pub fn attributes_mut(&mut self, kind: AttributeKind) -> &mut BTreeSet<String> {
        match kind {
            AttributeKind::Skill => &mut self.skills,
            AttributeKind::Category => &mut self.categories,
            AttributeKind::EmploymentType => &mut self.employment_types,
            AttributeKind::PositionLevel => &mut self.position_levels,
        }
    }
}

/// The four repeated attribute sets attached to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Skill,
    Category,
    EmploymentType,
    PositionLevel,
}

impl AttributeKind {
    /// All kinds, in persistence order
    pub const ALL: [AttributeKind; 4] = [
        AttributeKind::Skill,
        AttributeKind::Category,
        AttributeKind::EmploymentType,
        AttributeKind::PositionLevel,
    ];

    /// Child table holding this attribute set
    pub fn table(&self) -> &'static str {
        match self {
            Self::Skill => "listing_skills",
            Self::Category => "listing_categories",
            Self::EmploymentType => "listing_employment_types",
            Self::PositionLevel => "listing_position_levels",
        }
    }

    /// Value column of the child table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Category => "category",
            Self::EmploymentType => "employment_type",
            Self::PositionLevel => "position_level",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Skill => "Skills",
            Self::Category => "Categories",
            Self::EmploymentType => "Employment Terms",
            Self::PositionLevel => "Levels",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
