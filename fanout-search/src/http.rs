//! Shared HTTP client and cancellable request helpers.
//!
//! Provides a configured [`reqwest::Client`] with browser-like headers,
//! cookie support, and rotating User-Agent strings, plus fetch helpers
//! that race every network await against a [`CancellationToken`].

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Realistic browser User-Agent strings, rotated per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build the [`reqwest::Client`] shared by every registered provider.
///
/// The client has:
/// - Cookie store enabled (for consent interstitials)
/// - No client-wide timeout: each caller owns its deadline
/// - Random User-Agent from built-in rotation list (or custom if configured)
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is non-empty, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Send `request` and read the body as text, abandoning the request as
/// soon as `cancel` fires.
///
/// Non-2xx statuses are reported as [`SearchError::Http`]; a fired token
/// yields [`SearchError::Cancelled`].
pub async fn fetch_text(
    request: reqwest::RequestBuilder,
    engine: &str,
    cancel: &CancellationToken,
) -> Result<String, SearchError> {
    let fetch = async {
        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("{engine} request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("{engine} HTTP error: {e}")))?;

        response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("{engine} response read failed: {e}")))
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SearchError::Cancelled(engine.to_string())),
        body = fetch => {
            if let Ok(ref body) = body {
                tracing::trace!(engine, bytes = body.len(), "response received");
            }
            body
        }
    }
}

/// Like [`fetch_text`], then decode the body as JSON.
///
/// An undecodable body is reported as [`SearchError::Parse`].
pub async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    engine: &str,
    cancel: &CancellationToken,
) -> Result<T, SearchError> {
    let body = fetch_text(request, engine, cancel).await?;
    serde_json::from_str(&body)
        .map_err(|e| SearchError::Parse(format!("{engine} returned invalid JSON: {e}")))
}
