//! Core search orchestrator: bounded fan-out, deadline per provider,
//! first-seen dedup, title partition.
//!
//! Every registered provider gets one task. Tasks run under a shared
//! concurrency ceiling, each with its own cancellation token and deadline.
//! A provider that fails, panics, or times out contributes nothing and is
//! otherwise invisible to the caller; only invalid input is an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::config::{SearchConfig, DEFAULT_MAX_CONCURRENCY};
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::providers::provider_for;
use crate::types::{QueryOptions, SearchResult};

use super::dedup::dedup_first_seen;
use super::dispatch::run_gated;
use super::ranking::partition_by_title;

/// Most results accepted from one provider, whatever it returns.
pub const PROVIDER_RESULT_CEILING: usize = 20;

/// How a single provider's task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The provider answered; `count` usable results were kept.
    Succeeded { count: usize },
    /// The provider failed (HTTP, parse, cancellation, panic).
    Failed { reason: String },
    /// The provider's deadline elapsed first.
    TimedOut,
}

/// Diagnostic record for one provider in one aggregation.
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    /// Provider identifier.
    pub engine: String,
    /// Terminal state of the provider's task.
    pub status: OutcomeStatus,
    /// Time from admission to terminal state.
    pub elapsed: Duration,
}

impl ProviderOutcome {
    /// Whether the provider answered (possibly with zero results).
    pub fn succeeded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }
}

/// Aggregated results plus per-provider diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Deduplicated, partitioned results.
    pub results: Vec<SearchResult>,
    /// One entry per registered provider, in registration order.
    pub outcomes: Vec<ProviderOutcome>,
}

/// Multi-provider search engine.
///
/// Holds an ordered registry of providers. Registration order is the
/// tie-break for deduplication and the base order for ranking.
pub struct Aggregator {
    providers: Vec<Arc<dyn SearchProvider>>,
    max_concurrency: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl Aggregator {
    /// Empty registry with the given concurrency ceiling.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            providers: Vec::new(),
            max_concurrency,
        }
    }

    /// Register the built-in providers named in `config.engines`, in order,
    /// sharing a single HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration or
    /// [`SearchError::Http`] if the client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config)?;

        let aggregator = config
            .engines
            .iter()
            .fold(Self::new(config.max_concurrency), |agg, engine| {
                agg.register_arc(provider_for(*engine, client.clone()))
            });
        Ok(aggregator)
    }

    /// Append a provider to the registry.
    pub fn register<P: SearchProvider + 'static>(self, provider: P) -> Self {
        self.register_arc(Arc::new(provider))
    }

    /// Append an already shared provider to the registry.
    pub fn register_arc(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Registered provider identifiers, in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The concurrency ceiling.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Search every registered provider and merge the results.
    ///
    /// An empty vector is a valid outcome (every provider failed or found
    /// nothing).
    ///
    /// # Errors
    ///
    /// Only for invalid input: [`SearchError::InvalidQuery`] for a blank
    /// query, [`SearchError::Config`] for bad options or an unusable
    /// registry. Provider failures never surface here.
    pub async fn aggregate(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.aggregate_with_report(query, options).await?.results)
    }

    /// Like [`Aggregator::aggregate`], also returning per-provider outcomes.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::aggregate`].
    pub async fn aggregate_with_report(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Aggregation, SearchError> {
        let query = validate_query(query)?;
        options.validate()?;
        self.validate_registry()?;

        tracing::trace!(query, providers = self.providers.len(), "aggregate search");
        let started = Instant::now();

        let tasks: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let query = query.to_string();
                let options = options.clone();
                move || run_provider(provider, query, options)
            })
            .collect();

        let joined = run_gated(tasks, self.max_concurrency).await;

        // Buffer every outcome first so merging depends on registration
        // order only, never on completion order.
        let mut collected = Vec::new();
        let mut outcomes = Vec::with_capacity(joined.len());
        for (provider, outcome) in self.providers.iter().zip(joined) {
            match outcome {
                Ok((results, outcome)) => {
                    collected.extend(results);
                    outcomes.push(outcome);
                }
                Err(err) => {
                    tracing::warn!(engine = provider.name(), error = %err, "provider task aborted");
                    outcomes.push(ProviderOutcome {
                        engine: provider.name().to_string(),
                        status: OutcomeStatus::Failed {
                            reason: format!("task aborted: {err}"),
                        },
                        elapsed: started.elapsed(),
                    });
                }
            }
        }

        let candidates = collected.len();
        let results = partition_by_title(dedup_first_seen(collected), query);

        tracing::debug!(
            providers = outcomes.len(),
            succeeded = outcomes.iter().filter(|o| o.succeeded()).count(),
            candidates,
            results = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation complete"
        );

        Ok(Aggregation { results, outcomes })
    }

    fn validate_registry(&self) -> Result<(), SearchError> {
        if self.providers.is_empty() {
            return Err(SearchError::Config("no search providers registered".into()));
        }
        if self.max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Trim the query, rejecting one with nothing left.
pub(crate) fn validate_query(query: &str) -> Result<&str, SearchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SearchError::InvalidQuery("query must not be empty".into()));
    }
    Ok(trimmed)
}

/// Run one provider under its own deadline and cancellation token.
///
/// The deadline starts once the task holds its concurrency permit. When it
/// elapses the token fires and the provider's future is dropped.
async fn run_provider(
    provider: Arc<dyn SearchProvider>,
    query: String,
    options: QueryOptions,
) -> (Vec<SearchResult>, ProviderOutcome) {
    let engine = provider.name().to_string();
    let cancel = CancellationToken::new();
    let started = Instant::now();

    let outcome = tokio::select! {
        result = provider.search(&query, &options, &cancel) => Some(result),
        () = tokio::time::sleep(options.timeout()) => None,
    };
    let elapsed = started.elapsed();

    let (results, status) = match outcome {
        Some(Ok(results)) => {
            let received = results.len();
            let mut usable: Vec<SearchResult> =
                results.into_iter().filter(|r| r.is_usable()).collect();
            usable.truncate(PROVIDER_RESULT_CEILING);

            tracing::debug!(
                engine = %engine,
                received,
                kept = usable.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "provider returned results"
            );
            let count = usable.len();
            (usable, OutcomeStatus::Succeeded { count })
        }
        Some(Err(SearchError::Timeout(reason))) => {
            tracing::warn!(engine = %engine, reason = %reason, "provider reported timeout");
            (Vec::new(), OutcomeStatus::TimedOut)
        }
        Some(Err(err)) => {
            tracing::warn!(engine = %engine, error = %err, "provider query failed");
            (
                Vec::new(),
                OutcomeStatus::Failed {
                    reason: err.to_string(),
                },
            )
        }
        None => {
            cancel.cancel();
            tracing::warn!(
                engine = %engine,
                timeout_ms = options.timeout_ms,
                "provider timed out"
            );
            (Vec::new(), OutcomeStatus::TimedOut)
        }
    };

    (
        results,
        ProviderOutcome {
            engine,
            status,
            elapsed,
        },
    )
}
