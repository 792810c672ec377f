use crate::{UrlError, UrlResult};

/// Extracts the item identifier from a listing's detail-page URL
///
/// The identifier is the segment following the last `-` of the URL, e.g.
/// `https://www.mycareersfuture.gov.sg/job/engineering/software-engineer-acme-0a1b2c`
/// yields `0a1b2c`. Surrounding whitespace and a trailing `/` are ignored. If
/// whatever follows the last `-` still spans a path separator, the URL carries
/// no identifier and an error is returned.
///
/// # Examples
///
/// ```
/// use job_spider::url::extract_item_id;
///
/// let id = extract_item_id("https://example.com/job/some-path-ABC123").unwrap();
/// assert_eq!(id, "ABC123");
/// ```
pub fn extract_item_id(detail_url: &str) -> UrlResult<String> {
    let trimmed = detail_url.trim().trim_end_matches('/');

    let id = trimmed.rsplit('-').next().unwrap_or_default();

    if id.is_empty() || id.contains('/') {
        return Err(UrlError::MissingItemId(detail_url.to_string()));
    }

    Ok(id.to_string())
}
