//! Error types for the fanout host.

use fanout_search::SearchError;

/// Host-level error: configuration files and search setup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be parsed, serialized, or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The search library rejected the request or its settings.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Output could not be encoded.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_pass_through_unchanged() {
        let err: AppError = SearchError::InvalidQuery("query must not be empty".into()).into();
        assert_eq!(err.to_string(), "invalid query: query must not be empty");
    }

    #[test]
    fn io_error_display() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.to_string(), "I/O error: missing");
    }
}
