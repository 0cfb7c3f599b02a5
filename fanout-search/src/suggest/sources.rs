//! Built-in suggestion endpoints.
//!
//! DuckDuckGo, Brave and Wikipedia all answer in the OpenSearch
//! suggestion format, `[query, [completion, ...], ...]`, so one
//! [`OpenSearchSource`] covers them. Qwant uses its own envelope.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::http;
use crate::provider::SuggestSource;
use crate::types::SuggestEngine;

const DUCKDUCKGO_URL: &str = "https://duckduckgo.com/ac/";
const BRAVE_URL: &str = "https://search.brave.com/api/suggest";
const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";
const QWANT_URL: &str = "https://api.qwant.com/v3/suggest";

/// Instantiate the built-in suggestion source for `engine`.
pub fn source_for(engine: SuggestEngine, client: reqwest::Client) -> Arc<dyn SuggestSource> {
    match engine {
        SuggestEngine::DuckDuckGo => Arc::new(OpenSearchSource::duckduckgo(client)),
        SuggestEngine::Brave => Arc::new(OpenSearchSource::brave(client)),
        SuggestEngine::Wikipedia => Arc::new(OpenSearchSource::wikipedia(client)),
        SuggestEngine::Qwant => Arc::new(QwantSuggest::new(client)),
    }
}

/// A suggestion endpoint answering in OpenSearch array format.
pub struct OpenSearchSource {
    name: &'static str,
    client: reqwest::Client,
    base_url: String,
    query_param: &'static str,
    fixed_params: &'static [(&'static str, &'static str)],
}

impl OpenSearchSource {
    pub fn duckduckgo(client: reqwest::Client) -> Self {
        Self {
            name: SuggestEngine::DuckDuckGo.name(),
            client,
            base_url: DUCKDUCKGO_URL.to_string(),
            query_param: "q",
            fixed_params: &[("type", "list")],
        }
    }

    pub fn brave(client: reqwest::Client) -> Self {
        Self {
            name: SuggestEngine::Brave.name(),
            client,
            base_url: BRAVE_URL.to_string(),
            query_param: "q",
            fixed_params: &[],
        }
    }

    pub fn wikipedia(client: reqwest::Client) -> Self {
        Self {
            name: SuggestEngine::Wikipedia.name(),
            client,
            base_url: WIKIPEDIA_URL.to_string(),
            query_param: "search",
            fixed_params: &[
                ("action", "opensearch"),
                ("format", "json"),
                ("formatversion", "2"),
                ("namespace", "0"),
                ("limit", "10"),
            ],
        }
    }

    /// Point the source at a different endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SuggestSource for OpenSearchSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn suggestions(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        let request = self
            .client
            .get(&self.base_url)
            .query(self.fixed_params)
            .query(&[(self.query_param, query)]);

        let body: Value = http::fetch_json(request, self.name, cancel).await?;
        Ok(parse_opensearch(&body))
    }
}

/// Completions from an OpenSearch array: the strings in element 1.
///
/// Anything that is not an array, or whose second element is not an
/// array, yields nothing. Non-string entries are skipped.
pub(crate) fn parse_opensearch(body: &Value) -> Vec<String> {
    body.get(1)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct QwantEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<QwantData>,
}

#[derive(Debug, Default, Deserialize)]
struct QwantData {
    #[serde(default)]
    items: Vec<QwantItem>,
}

#[derive(Debug, Deserialize)]
struct QwantItem {
    #[serde(default)]
    value: Option<String>,
}

/// Qwant's suggestion API.
pub struct QwantSuggest {
    client: reqwest::Client,
    base_url: String,
}

impl QwantSuggest {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: QWANT_URL.to_string(),
        }
    }

    /// Point the source at a different endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SuggestSource for QwantSuggest {
    fn name(&self) -> &str {
        SuggestEngine::Qwant.name()
    }

    async fn suggestions(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        let request = self.client.get(&self.base_url).query(&[
            ("q", query),
            ("locale", "en_US"),
            ("version", "2"),
        ]);

        let envelope: QwantEnvelope = http::fetch_json(request, self.name(), cancel).await?;
        Ok(parse_qwant(envelope))
    }
}

fn parse_qwant(envelope: QwantEnvelope) -> Vec<String> {
    if envelope.status != "success" {
        return Vec::new();
    }
    envelope
        .data
        .unwrap_or_default()
        .items
        .into_iter()
        .filter_map(|item| item.value)
        .collect()
}
