//! Autosuggest aggregator: fan out to suggestion endpoints, merge by vote.
//!
//! Uses the same bounded dispatcher and failure discipline as the search
//! orchestrator. Each source runs under a fixed deadline taken from
//! `SearchConfig::request_timeout_seconds`; when it elapses the source's
//! token fires and it contributes nothing.

pub mod sources;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{SearchConfig, DEFAULT_MAX_CONCURRENCY};
use crate::error::SearchError;
use crate::http;
use crate::orchestrator::dispatch::run_gated;
use crate::provider::SuggestSource;

pub use sources::{source_for, OpenSearchSource, QwantSuggest};

/// Maximum number of suggestions returned.
pub const SUGGESTION_LIMIT: usize = 10;

/// Per-source deadline when none is configured.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(15);

/// Merge suggestion lists by frequency vote.
///
/// Every occurrence of an exact string counts once. Ordered by count
/// descending, then lexicographically ascending; truncated to
/// [`SUGGESTION_LIMIT`]. Blank strings are ignored.
pub fn frequency_vote<I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for suggestion in lists.into_iter().flatten() {
        if suggestion.trim().is_empty() {
            continue;
        }
        *counts.entry(suggestion).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(SUGGESTION_LIMIT);
    ranked.into_iter().map(|(suggestion, _)| suggestion).collect()
}

/// Multi-source autosuggest engine.
///
/// Holds an ordered registry of sources, a concurrency ceiling and a
/// per-source deadline.
pub struct Suggester {
    sources: Vec<Arc<dyn SuggestSource>>,
    max_concurrency: usize,
    source_timeout: Duration,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl Suggester {
    /// Empty registry with the given concurrency ceiling and the default
    /// per-source deadline.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            sources: Vec::new(),
            max_concurrency,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    /// Replace the per-source deadline.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Register the built-in sources named in `config.suggest_sources`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration or
    /// [`SearchError::Http`] if the client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config)?;

        Ok(config
            .suggest_sources
            .iter()
            .fold(
                Self::new(config.max_concurrency)
                    .with_source_timeout(Duration::from_secs(config.request_timeout_seconds)),
                |suggester, engine| suggester.register_arc(source_for(*engine, client.clone())),
            ))
    }

    /// Append a source to the registry.
    pub fn register<S: SuggestSource + 'static>(self, source: S) -> Self {
        self.register_arc(Arc::new(source))
    }

    /// Append an already shared source to the registry.
    pub fn register_arc(mut self, source: Arc<dyn SuggestSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Registered source identifiers, in registration order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Collect completions from every source and merge them by vote.
    ///
    /// A blank query yields an empty list without any network traffic.
    ///
    /// # Errors
    ///
    /// [`SearchError::Config`] if no sources are registered, the ceiling
    /// is zero or the deadline is zero. Source failures and timeouts never
    /// surface here.
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, SearchError> {
        if self.sources.is_empty() {
            return Err(SearchError::Config("no suggest sources registered".into()));
        }
        if self.max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        if self.source_timeout.is_zero() {
            return Err(SearchError::Config(
                "suggest source timeout must be greater than 0".into(),
            ));
        }

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::trace!(query, sources = self.sources.len(), "suggest");

        let tasks: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let query = query.to_string();
                let deadline = self.source_timeout;
                move || run_source(source, query, deadline)
            })
            .collect();

        let joined = run_gated(tasks, self.max_concurrency).await;

        let mut lists = Vec::with_capacity(joined.len());
        for (source, outcome) in self.sources.iter().zip(joined) {
            match outcome {
                Ok(Ok(items)) => {
                    tracing::debug!(source = source.name(), count = items.len(), "suggestions received");
                    lists.push(items);
                }
                Ok(Err(err)) => {
                    tracing::warn!(source = source.name(), error = %err, "suggest source failed");
                }
                Err(err) => {
                    tracing::warn!(source = source.name(), error = %err, "suggest task aborted");
                }
            }
        }

        Ok(frequency_vote(lists))
    }
}

/// Run one source under its deadline; on elapse its token fires.
async fn run_source(
    source: Arc<dyn SuggestSource>,
    query: String,
    deadline: Duration,
) -> Result<Vec<String>, SearchError> {
    let cancel = CancellationToken::new();
    tokio::select! {
        result = source.suggestions(&query, &cancel) => result,
        () = tokio::time::sleep(deadline) => {
            cancel.cancel();
            Err(SearchError::Timeout(format!(
                "{} exceeded {}ms",
                source.name(),
                deadline.as_millis()
            )))
        }
    }
}
