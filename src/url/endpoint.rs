use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the search endpoint address from the API base and search path
///
/// Pagination parameters are added per request by the caller.
pub fn search_url(base_url: &str, search_path: &str) -> UrlResult<Url> {
    let mut url = parse_base(base_url)?;
    url.set_path(search_path);
    Ok(url)
}

/// Builds the detail resource address `{base}{detail_path}/{id}`
///
/// The identifier is pushed as a single path segment, so characters such as
/// `/` or `?` inside it are percent-encoded rather than changing the route.
pub fn detail_url(base_url: &str, detail_path: &str, id: &str) -> UrlResult<Url> {
    let mut url = parse_base(base_url)?;
    url.set_path(detail_path);

    url.path_segments_mut()
        .map_err(|_| UrlError::Parse(format!("{} cannot be a base URL", base_url)))?
        .pop_if_empty()
        .push(id);

    Ok(url)
}

fn parse_base(base_url: &str) -> UrlResult<Url> {
    let url = Url::parse(base_url).map_err(|e| UrlError::Parse(format!("{}: {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
