//! Reddit provider: public `search.json` listing.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{QueryOptions, SearchEngine, SearchResult};

use super::truncate_chars;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com/search.json";

const PERMALINK_BASE: &str = "https://www.reddit.com";

const MAX_RESULTS: usize = 10;

/// Longest self-text excerpt used as a snippet, in characters.
const SNIPPET_CHARS: usize = 240;

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Option<ListingData>,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    #[serde(default)]
    data: Option<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    subreddit_name_prefixed: Option<String>,
}

/// Reddit search client.
pub struct RedditProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RedditProvider {
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

    fn query_params<'a>(query: &'a str, options: &QueryOptions) -> Vec<(&'static str, &'a str)> {
        let window = options.timeframe.map_or("all", |t| t.as_str());
        let mut params = vec![
            ("q", query),
            ("sort", "relevance"),
            ("t", window),
            ("limit", "10"),
        ];
        if options.safesearch {
            params.push(("include_over_18", "off"));
        }
        params
    }
}

#[async_trait]
impl SearchProvider for RedditProvider {
    fn name(&self) -> &str {
        SearchEngine::Reddit.name()
    }

    async fn search(
        &self,
        query: &str,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Reddit search");

        let request = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(query, options))
            .header("Accept", "application/json");

        let listing: Listing = http::fetch_json(request, self.name(), cancel).await?;
        Ok(map_listing(listing))
    }
}

fn map_post(post: Post) -> Option<SearchResult> {
    let title = post.title?.trim().to_string();
    let permalink = post.permalink?;
    if title.is_empty() || permalink.trim().is_empty() {
        return None;
    }

    let excerpt = post
        .selftext
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| truncate_chars(text, SNIPPET_CHARS));
    let content = excerpt
        .or(post.subreddit_name_prefixed)
        .unwrap_or_default();

    Some(SearchResult::new(
        title,
        format!("{PERMALINK_BASE}{}", permalink.trim()),
        content,
        SearchEngine::Reddit.name(),
    ))
}

fn map_listing(listing: Listing) -> Vec<SearchResult> {
    let results: Vec<SearchResult> = listing
        .data
        .unwrap_or_default()
        .children
        .into_iter()
        .filter_map(|child| child.data.and_then(map_post))
        .take(MAX_RESULTS)
        .collect();

    tracing::debug!(count = results.len(), "Reddit results parsed");
    results
}
