//! Query-string extraction helpers.

use url::{form_urlencoded, Url};

/// Query parameters that commonly carry the visitor's search terms, in
/// lookup order.
pub const SEARCH_QUERY_PARAMS: &[&str] = &["q", "query", "search", "text", "p", "wd"];

/// Decoded query pairs of `url`, in their original order.
pub fn query_pairs(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Look up `key` ignoring case.
///
/// The whole query string is lower-cased before parsing, so the returned
/// value is lower-cased as well. Returns the first match, which may be empty.
pub fn case_insensitive_param(url: &Url, key: &str) -> Option<String> {
    let query = url.query()?.to_lowercase();
    let key = key.to_lowercase();
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.into_owned())
}

/// Pull a human search query out of an arbitrary external URL.
///
/// Returns the first non-empty value among [`SEARCH_QUERY_PARAMS`]. Anything
/// that does not look like a URL with a query string yields `None`.
pub fn extract_search_query(url: &str) -> Option<String> {
    let (_, rest) = url.split_once('?')?;
    let query = rest.split_once('#').map_or(rest, |(q, _)| q);
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    SEARCH_QUERY_PARAMS.iter().find_map(|term| {
        pairs
            .iter()
            .find(|(k, _)| k.as_str() == *term)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    })
}
