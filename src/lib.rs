//! Host for the `fanout-search` aggregation library.
//!
//! Loads TOML configuration, builds the configured [`Aggregator`] and
//! [`Suggester`], and renders their output for the `fanout` binary.

pub mod config;
pub mod error;
pub mod render;

pub use config::{AppConfig, QueryOverrides};
pub use error::{AppError, Result};

use fanout_search::{Aggregation, Aggregator, Suggester};

/// Run one aggregation with the configured providers.
///
/// # Errors
///
/// Returns [`AppError::Search`] for an invalid configuration, a blank
/// query, or invalid query options. Provider failures are not errors.
pub async fn run_search(
    config: &AppConfig,
    query: &str,
    overrides: &QueryOverrides,
) -> Result<Aggregation> {
    let options = overrides.apply(&config.query);
    let aggregator = Aggregator::from_config(&config.search)?;
    tracing::info!(
        providers = ?aggregator.provider_names(),
        timeout_ms = options.timeout_ms,
        "searching"
    );
    Ok(aggregator.aggregate_with_report(query, &options).await?)
}

/// Collect autosuggestions from the configured sources.
///
/// # Errors
///
/// Returns [`AppError::Search`] for an invalid configuration.
pub async fn run_suggest(config: &AppConfig, query: &str) -> Result<Vec<String>> {
    let suggester = Suggester::from_config(&config.search)?;
    Ok(suggester.suggest(query).await?)
}
