//! Result deduplication by URL key.
//!
//! The key is the raw URL cut at the first `?` or `#`. This deliberately
//! merges pages that differ only in their query string (pagination,
//! tracking parameters, and genuinely distinct pages alike). The first
//! occurrence wins; later duplicates are dropped even if their snippet is
//! richer.

use std::collections::HashSet;

use crate::types::SearchResult;

/// Dedup key for a URL: everything before the first `?` or `#`.
///
/// # Examples
///
/// ```
/// use fanout_search::orchestrator::dedup::dedup_key;
///
/// assert_eq!(dedup_key("https://example.com/a?page=2#top"), "https://example.com/a");
/// assert_eq!(dedup_key("https://example.com/a#x?y"), "https://example.com/a");
/// ```
pub fn dedup_key(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Keep the first result seen for every dedup key, preserving input order.
///
/// Callers pass results in provider registration order, then in each
/// provider's own order, so "first seen" means "from the earliest
/// registered provider".
pub fn dedup_first_seen(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());

    results
        .into_iter()
        .filter(|result| seen.insert(dedup_key(&result.url).to_string()))
        .collect()
}
