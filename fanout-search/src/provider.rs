//! Capability traits for pluggable search and suggestion backends.
//!
//! Each built-in provider (DuckDuckGo, Mojeek, Qwant, Wikipedia, Reddit,
//! Stack Exchange) implements [`SearchProvider`]; each suggestion endpoint
//! implements [`SuggestSource`]. The engines iterate registered
//! implementations uniformly, so a new backend only needs to honour the
//! contract below.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::types::{QueryOptions, SearchResult};

/// A pluggable search backend.
///
/// Implementors must:
///
/// - abandon in-flight work and return promptly once `cancel` fires
/// - report remote failures (non-2xx, bad body, I/O) as an `Err` value and
///   never panic on them; malformed individual records are skipped
/// - map [`QueryOptions::timeframe`] onto the provider's own parameters,
///   omitting them when unset or unsupported
/// - return at most a small fixed number of results (10 to 20)
/// - tag every result with [`SearchProvider::name`]
///
/// Implementations hold no state between calls and must be `Send + Sync`
/// for concurrent dispatch.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Identifier written into [`SearchResult::engine`].
    fn name(&self) -> &str;

    /// Perform a search and return normalised results in source order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the response cannot be
    /// parsed, or `cancel` fires. The aggregation engine treats any error
    /// as "no results" from this provider.
    async fn search(
        &self,
        query: &str,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

/// A pluggable autosuggest backend returning candidate completions.
///
/// Same failure discipline as [`SearchProvider`].
#[async_trait]
pub trait SuggestSource: Send + Sync {
    /// Identifier used in diagnostics.
    fn name(&self) -> &str;

    /// Fetch completion candidates for `query`, in source order.
    async fn suggestions(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SearchError>;
}
