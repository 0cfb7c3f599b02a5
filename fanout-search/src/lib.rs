//! # fanout-search
//!
//! Key-free, multi-provider search aggregation.
//!
//! A single query is fanned out to several independent public backends
//! (HTML-scraped engines, JSON APIs, a forum search and a Q&A site). The
//! responses that arrive within a deadline are deduplicated, ranked, and
//! returned as one list.
//!
//! ## Design
//!
//! - Providers implement one capability trait, [`SearchProvider`], and are
//!   registered on an [`Aggregator`] in a fixed order
//! - At most `max_concurrency` providers run at once; each has its own
//!   deadline and cancellation token
//! - Graceful degradation: a failing, slow, or panicking provider
//!   contributes nothing and never fails the aggregation
//! - Dedup keeps the first result per URL (query string and fragment
//!   ignored); ranking is a stable title-match partition
//! - [`Suggester`] runs the same fan-out over autosuggest endpoints and
//!   merges by frequency vote
//!
//! ## Security
//!
//! - No API keys or secrets
//! - No network listeners; this is a library, not a server
//! - Search queries are logged only at trace level

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod suggest;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use orchestrator::search::{
    Aggregation, Aggregator, OutcomeStatus, ProviderOutcome, PROVIDER_RESULT_CEILING,
};
pub use provider::{SearchProvider, SuggestSource};
pub use suggest::{Suggester, SUGGESTION_LIMIT};
pub use types::{QueryOptions, SearchEngine, SearchResult, SuggestEngine, Timeframe};

/// Search every built-in provider with the default configuration.
///
/// Queries all six providers under the default concurrency ceiling,
/// deduplicates by URL, and sorts title matches first.
///
/// # Errors
///
/// Returns [`SearchError::InvalidQuery`] for a blank query and
/// [`SearchError::Config`] for invalid options. Provider failures are
/// logged and otherwise ignored, so a call where every provider fails
/// returns `Ok` with an empty list.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> fanout_search::Result<()> {
/// let options = fanout_search::QueryOptions::default();
/// let results = fanout_search::aggregate("rust programming", &options).await?;
/// for result in &results {
///     println!("{} [{}]: {}", result.title, result.engine, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn aggregate(query: &str, options: &QueryOptions) -> Result<Vec<SearchResult>> {
    Aggregator::from_config(&SearchConfig::default())?
        .aggregate(query, options)
        .await
}

/// Autocomplete `query` from every built-in suggestion endpoint.
///
/// Returns at most [`SUGGESTION_LIMIT`] strings, most agreed-upon first.
///
/// # Errors
///
/// Only if the default configuration cannot produce a client.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> fanout_search::Result<()> {
/// for suggestion in fanout_search::suggest("rust borrow").await? {
///     println!("{suggestion}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn suggest(query: &str) -> Result<Vec<String>> {
    Suggester::from_config(&SearchConfig::default())?
        .suggest(query)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn aggregate_rejects_blank_query() {
        let result = aggregate("  ", &QueryOptions::default()).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn aggregate_rejects_zero_timeout() {
        let options = QueryOptions::default().with_timeout_ms(0);
        let result = aggregate("rust", &options).await;
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn suggest_blank_query_is_empty() {
        let suggestions = suggest("").await.expect("blank query is not an error");
        assert!(suggestions.is_empty());
    }
}
