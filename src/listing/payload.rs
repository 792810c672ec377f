//! Wire schema of the remote search and detail endpoints
//!
//! Required fields are plain (non-`Option`) struct members, so a response
//! missing one of them fails in `serde_json` at the parse boundary instead of
//! surfacing later as a default value. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Body of a search request
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub search: &'a str,
}

/// One page of search results
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Total number of results for the query across all pages
    pub total: u64,

    /// Result summaries on this page
    pub results: Vec<SearchResult>,
}

/// Summary of a single search hit
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub metadata: SummaryMetadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    pub job_details_url: String,
}

/// Full detail record of a listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub title: String,
    pub description: String,
    pub minimum_years_experience: i64,
    pub status: JobStatus,
    pub posted_company: PostedCompany,
    pub metadata: DetailMetadata,
    pub salary: Salary,
    pub skills: Vec<SkillEntry>,
    pub categories: Vec<CategoryEntry>,
    pub employment_types: Vec<EmploymentTypeEntry>,
    pub position_levels: Vec<PositionLevelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job_status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostedCompany {
    pub uen: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailMetadata {
    pub job_details_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Salary {
    pub minimum: i64,
    pub maximum: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillEntry {
    pub skill: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentTypeEntry {
    pub employment_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionLevelEntry {
    pub position: String,
}

/// Parses a search page body
pub fn parse_search_response(body: &str) -> Result<SearchResponse, serde_json::Error> {
    serde_json::from_str(body)
}

/// Parses a detail record body
pub fn parse_job_detail(body: &str) -> Result<JobDetail, serde_json::Error> {
    serde_json::from_str(body)
}
