//! Plain-text listing reports

use crate::listing::{AttributeKind, Listing};
use crate::storage::ListingMatch;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

const RULE: &str =
    "================================================================================";

/// Reduces a listing's HTML description to readable text
///
/// Paragraphs and list items become separate lines (list items prefixed
/// with `- `); all other whitespace is collapsed.
pub fn description_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);

    let blocks: Vec<String> = match Selector::parse("p, li") {
        Ok(selector) => fragment
            .select(&selector)
            .filter_map(|element| {
                let text = collapse_whitespace(&element.text().collect::<String>());
                if text.is_empty() {
                    None
                } else if element.value().name() == "li" {
                    Some(format!("- {}", text))
                } else {
                    Some(text)
                }
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    if blocks.is_empty() {
        collapse_whitespace(&fragment.root_element().text().collect::<String>())
    } else {
        blocks.join("\n")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn joined(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Formats a listing as a terminal card
pub fn format_listing(listing: &Listing) -> String {
    let attributes = |kind: AttributeKind| joined(listing.attributes(kind));

    format!(
        "{rule}
   Title: {title}
   Terms: {terms}
Employer: {employer}
     UEN: {uen}
      Id: {id}

Status: {status}
  Link: {url}

Min Years: {years}
   Salary: {salary_min} to {salary_max}

      Categories: {categories}
          Skills: {skills}
          Levels: {levels}

Description:
{description}
",
        rule = RULE,
        title = listing.title,
        terms = attributes(AttributeKind::EmploymentType),
        employer = listing.employer.name,
        uen = listing.employer.employer_id,
        id = listing.id,
        status = listing.status,
        url = listing.url,
        years = listing.min_years_experience,
        salary_min = listing.salary_min,
        salary_max = listing.salary_max,
        categories = attributes(AttributeKind::Category),
        skills = attributes(AttributeKind::Skill),
        levels = attributes(AttributeKind::PositionLevel),
        description = description_text(&listing.description),
    )
}

/// Formats a search hit as a short block
pub fn format_match(hit: &ListingMatch) -> String {
    format!(
        "{title} ({company})\n  {years}+ years, {salary_min} to {salary_max}\n  {url}\n",
        title = hit.title,
        company = hit.company.as_deref().unwrap_or("unknown employer"),
        years = hit.min_years_experience,
        salary_min = hit.salary_min,
        salary_max = hit.salary_max,
        url = hit.url,
    )
}
