//! Final ordering: a stable title-match partition.
//!
//! Results whose title contains the query (case-insensitive substring)
//! move ahead of those that do not. Nothing else is scored; within each
//! bucket the incoming order is kept.

use crate::types::SearchResult;

/// Whether `title` contains the already-lowercased `needle`.
fn title_matches(title: &str, needle: &str) -> bool {
    title.to_lowercase().contains(needle)
}

/// Stable partition of `results` by title match against `query`.
pub fn partition_by_title(results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();

    let (mut matching, rest): (Vec<_>, Vec<_>) = results
        .into_iter()
        .partition(|result| title_matches(&result.title, &needle));

    tracing::trace!(matching = matching.len(), rest = rest.len(), "title partition");

    matching.extend(rest);
    matching
}
