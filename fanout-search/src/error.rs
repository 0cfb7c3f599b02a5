//! Error types for the fanout-search crate.
//!
//! Only [`SearchError::InvalidQuery`] and [`SearchError::Config`] ever reach
//! the caller of an aggregation. The remaining variants describe why a
//! single provider produced nothing; the engine records them for
//! diagnostics and carries on with the other providers.

/// Errors that can occur during search aggregation.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query cannot be dispatched (empty or whitespace only).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid search configuration or query options.
    #[error("config error: {0}")]
    Config(String),

    /// An HTTP request to a provider failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A provider did not finish before its deadline.
    #[error("provider timed out: {0}")]
    Timeout(String),

    /// A provider abandoned its work because its cancellation token fired.
    #[error("provider cancelled: {0}")]
    Cancelled(String),
}

/// Convenience type alias for fanout-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
