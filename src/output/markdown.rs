//! Markdown report generation
//!
//! This module renders stored listings as a markdown document, one section
//! per listing, preceded by a short overview.

use crate::listing::{AttributeKind, Listing};
use crate::output::report::description_text;
use crate::SpiderError;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of the given listings
///
/// # Arguments
///
/// * `listings` - The listings to include
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(SpiderError)` - Failed to write the report
pub fn generate_markdown_report(listings: &[Listing], output_path: &Path) -> Result<(), SpiderError> {
    let markdown = format_markdown_report(listings, Utc::now());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats listings as a markdown document
pub fn format_markdown_report(listings: &[Listing], generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str("# Job Listings\n\n");
    md.push_str(&format!("- **Generated**: {}\n", generated_at.to_rfc3339()));
    md.push_str(&format!("- **Listings**: {}\n\n", listings.len()));

    if listings.is_empty() {
        md.push_str("_No listings stored._\n");
        return md;
    }

    md.push_str("| Title | Employer | Min Years | Salary |\n");
    md.push_str("|-------|----------|-----------|--------|\n");
    for listing in listings {
        md.push_str(&format!(
            "| [{}](#{}) | {} | {} | {} to {} |\n",
            escape_cell(&listing.title),
            listing.id.to_lowercase(),
            escape_cell(&listing.employer.name),
            listing.min_years_experience,
            listing.salary_min,
            listing.salary_max
        ));
    }
    md.push('\n');

    for listing in listings {
        md.push_str(&format!("## {}\n\n", listing.id));
        md.push_str(&format!("**{}**, {}\n\n", listing.title, listing.employer.name));
        md.push_str(&format!("- **Status**: {}\n", listing.status));
        md.push_str(&format!("- **Link**: <{}>\n", listing.url));
        md.push_str(&format!(
            "- **Salary**: {} to {}\n",
            listing.salary_min, listing.salary_max
        ));
        md.push_str(&format!(
            "- **Minimum experience**: {} years\n",
            listing.min_years_experience
        ));

        for kind in AttributeKind::ALL {
            let values = listing.attributes(kind);
            if !values.is_empty() {
                md.push_str(&format!(
                    "- **{}**: {}\n",
                    kind.label(),
                    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                ));
            }
        }

        md.push('\n');
        md.push_str(&description_text(&listing.description));
        md.push_str("\n\n");
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
