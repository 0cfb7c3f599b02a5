//! Wikipedia provider: MediaWiki full-text search API.
//!
//! The API has no recency filter, so [`QueryOptions::timeframe`] and
//! safesearch are ignored. Snippets come back with `searchmatch` markup
//! and HTML entities, which are flattened to plain text.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{QueryOptions, SearchEngine, SearchResult};

use super::fragment_text;

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/w/api.php";

const ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

const MAX_RESULTS: usize = 10;

#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    search: Vec<ApiHit>,
}

#[derive(Debug, Deserialize)]
struct ApiHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

/// Wikipedia search API client.
pub struct WikipediaProvider {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for WikipediaProvider {
    fn name(&self) -> &str {
        SearchEngine::Wikipedia.name()
    }

    async fn search(
        &self,
        query: &str,
        _options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Wikipedia search");

        let limit = MAX_RESULTS.to_string();
        let request = self.client.get(&self.base_url).query(&[
            ("action", "query"),
            ("list", "search"),
            ("utf8", "1"),
            ("format", "json"),
            ("srsearch", query),
            ("srlimit", limit.as_str()),
        ]);

        let response: ApiResponse = http::fetch_json(request, self.name(), cancel).await?;
        Ok(map_hits(response))
    }
}

/// Canonical article URL for a page title.
///
/// Spaces become underscores; everything else is percent-encoded as a
/// single path segment.
pub(crate) fn article_url(title: &str) -> Option<String> {
    let mut url = Url::parse(ARTICLE_BASE_URL).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(&title.trim().replace(' ', "_"));
    Some(url.to_string())
}

fn map_hits(response: ApiResponse) -> Vec<SearchResult> {
    let hits = response.query.unwrap_or_default().search;

    let results: Vec<SearchResult> = hits
        .into_iter()
        .filter_map(|hit| {
            let title = hit.title?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            let url = article_url(&title)?;
            let content = hit.snippet.as_deref().map(fragment_text).unwrap_or_default();
            Some(SearchResult::new(title, url, content, SearchEngine::Wikipedia.name()))
        })
        .take(MAX_RESULTS)
        .collect();

    tracing::debug!(count = results.len(), "Wikipedia results parsed");
    results
}

/// Parse a raw API body; used by tests and fixtures.
#[cfg(test)]
pub(crate) fn parse_wikipedia_json(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("wikipedia returned invalid JSON: {e}")))?;
    Ok(map_hits(response))
}
