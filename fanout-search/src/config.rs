//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which providers are registered, how many may
//! run at once, and how the shared HTTP client behaves. Per-call knobs
//! (timeframe, safesearch, deadline) live in [`crate::QueryOptions`].

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{SearchEngine, SuggestEngine};

/// Default number of providers allowed to run concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Configuration for an [`crate::Aggregator`] / [`crate::Suggester`] pair.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search providers to register, in registration order. Registration
    /// order decides which duplicate survives deduplication.
    pub engines: Vec<SearchEngine>,
    /// Suggestion endpoints to register.
    pub suggest_sources: Vec<SuggestEngine>,
    /// Ceiling on providers executing at the same time.
    pub max_concurrency: usize,
    /// Deadline for each suggestion source, in seconds. Search providers
    /// are bounded by `QueryOptions::timeout_ms` instead.
    pub request_timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: SearchEngine::all().to_vec(),
            suggest_sources: SuggestEngine::all().to_vec(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_seconds: 15,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_concurrency` must be greater than 0
    /// - `request_timeout_seconds` must be greater than 0
    /// - `engines` must not be empty
    /// - `suggest_sources` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "request_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.engines.is_empty() {
            return Err(SearchError::Config(
                "at least one engine must be enabled".into(),
            ));
        }
        if self.suggest_sources.is_empty() {
            return Err(SearchError::Config(
                "at least one suggest source must be enabled".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.request_timeout_seconds, 15);
        assert!(config.user_agent.is_none());
        assert_eq!(config.engines, SearchEngine::all());
        assert_eq!(config.suggest_sources.len(), 4);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = SearchConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn zero_request_timeout_rejected() {
        let config = SearchConfig {
            request_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_seconds"));
    }

    #[test]
    fn empty_engines_rejected() {
        let config = SearchConfig {
            engines: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("engine"));
    }

    #[test]
    fn empty_suggest_sources_rejected() {
        let config = SearchConfig {
            suggest_sources: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("suggest"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"engines":["wikipedia","reddit"],"max_concurrency":2}"#)
                .expect("deserialize");
        assert_eq!(
            config.engines,
            vec![SearchEngine::Wikipedia, SearchEngine::Reddit]
        );
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.request_timeout_seconds, 15);
        assert!(config.validate().is_ok());
    }
}
