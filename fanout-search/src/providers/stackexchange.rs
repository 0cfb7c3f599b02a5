//! Stack Exchange provider: `/2.3/search/advanced` on Stack Overflow.
//!
//! Only questions with an accepted answer are requested. Titles arrive
//! HTML-escaped (`&#39;`, `&quot;`) and are decoded before use.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{QueryOptions, SearchEngine, SearchResult, Timeframe};

use super::fragment_text;

const DEFAULT_BASE_URL: &str = "https://api.stackexchange.com/2.3/search/advanced";

const MAX_RESULTS: usize = 10;

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    items: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct Question {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    tags: Vec<String>,
}

/// Stack Exchange API client.
pub struct StackExchangeProvider {
    client: reqwest::Client,
    base_url: String,
}

impl StackExchangeProvider {
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

    fn query_params(query: &str, timeframe: Option<Timeframe>, now_secs: u64) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = [
            ("order", "desc"),
            ("sort", "relevance"),
            ("accepted", "True"),
            ("answers", "1"),
            ("q", query),
            ("site", "stackoverflow"),
            ("filter", "default"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();

        if let Some(timeframe) = timeframe {
            let from = now_secs.saturating_sub(timeframe.days() * SECONDS_PER_DAY);
            params.push(("fromdate", from.to_string()));
        }
        params
    }
}

#[async_trait]
impl SearchProvider for StackExchangeProvider {
    fn name(&self) -> &str {
        SearchEngine::StackExchange.name()
    }

    async fn search(
        &self,
        query: &str,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Stack Exchange search");

        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let request = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(query, options.timeframe, now_secs));

        let response: ApiResponse = http::fetch_json(request, self.name(), cancel).await?;
        Ok(map_items(response))
    }
}

/// `Score 42 • rust, lifetimes, borrow-checker`
fn summary(question: &Question) -> String {
    let tags = question
        .tags
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Score {} • {tags}", question.score)
}

fn map_items(response: ApiResponse) -> Vec<SearchResult> {
    let results: Vec<SearchResult> = response
        .items
        .into_iter()
        .filter_map(|question| {
            let title = fragment_text(question.title.as_deref()?);
            let link = question.link.as_deref()?.trim().to_string();
            if title.is_empty() || link.is_empty() {
                return None;
            }
            let content = summary(&question);
            Some(SearchResult::new(title, link, content, SearchEngine::StackExchange.name()))
        })
        .take(MAX_RESULTS)
        .collect();

    tracing::debug!(count = results.len(), "Stack Exchange results parsed");
    results
}
