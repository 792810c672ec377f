use crate::listing::payload::JobDetail;
use crate::listing::{Employer, Listing};
use std::collections::BTreeSet;

/// Converts a parsed detail record into a normalized `Listing`
///
/// Pure transformation: each attribute array is reduced to the set of its
/// scalar values (duplicates collapse), and the employer reference is lifted
/// out of the nested company object. Salary bounds are passed through as
/// received, even when the minimum exceeds the maximum.
///
/// # Arguments
///
/// * `item_id` - Identifier the record was fetched under
/// * `detail` - The parsed detail payload
pub fn normalize(item_id: &str, detail: JobDetail) -> Listing {
    Listing {
        id: item_id.to_string(),
        title: detail.title,
        description: detail.description,
        min_years_experience: detail.minimum_years_experience,
        status: detail.status.job_status,
        url: detail.metadata.job_details_url,
        salary_min: detail.salary.minimum,
        salary_max: detail.salary.maximum,
        employer: Employer {
            employer_id: detail.posted_company.uen,
            name: detail.posted_company.name,
        },
        skills: collect_set(detail.skills.into_iter().map(|s| s.skill)),
        categories: collect_set(detail.categories.into_iter().map(|c| c.category)),
        employment_types: collect_set(
            detail
                .employment_types
                .into_iter()
                .map(|e| e.employment_type),
        ),
        position_levels: collect_set(detail.position_levels.into_iter().map(|p| p.position)),
    }
}

fn collect_set(values: impl Iterator<Item = String>) -> BTreeSet<String> {
    values.collect()
}
