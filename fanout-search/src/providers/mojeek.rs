//! Mojeek provider: independent crawler with a plain HTML results page.
//!
//! Mojeek has no date-range filter on its public results page, so
//! [`QueryOptions::timeframe`] is ignored.

use async_trait::async_trait;
use scraper::Html;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{QueryOptions, SearchEngine, SearchResult};

use super::{collapse_whitespace, selector};

const DEFAULT_BASE_URL: &str = "https://www.mojeek.com/search";

const MAX_RESULTS: usize = 15;

/// Mojeek HTML scraper.
pub struct MojeekProvider {
    client: reqwest::Client,
    base_url: String,
}

impl MojeekProvider {
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
        let mut params = vec![("q", query)];
        if options.safesearch {
            params.push(("safe", "1"));
        }
        params
    }
}

#[async_trait]
impl SearchProvider for MojeekProvider {
    fn name(&self) -> &str {
        SearchEngine::Mojeek.name()
    }

    async fn search(
        &self,
        query: &str,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Mojeek search");

        let request = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(query, options))
            .header("Accept", "text/html,application/xhtml+xml");

        let html = http::fetch_text(request, self.name(), cancel).await?;
        parse_mojeek_html(&html)
    }
}

/// Parse a Mojeek results page.
///
/// Mojeek has shipped both `ul.results-standard > li` and
/// `div.results div.result` layouts; either is accepted.
pub(crate) fn parse_mojeek_html(html: &str) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = selector("ul.results-standard > li, div.results div.result")?;
    let link_sel = selector("a[href]")?;
    let title_link_sel = selector("h2 a[href], a.title[href]")?;
    let snippet_sel = selector("p.s, p")?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        // Prefer the heading link; fall back to the first link in the block.
        let Some(link) = element
            .select(&title_link_sel)
            .next()
            .or_else(|| element.select(&link_sel).next())
        else {
            continue;
        };

        let title = collapse_whitespace(&link.text().collect::<String>());
        let href = link.value().attr("href").unwrap_or_default().trim();
        if title.is_empty() || href.is_empty() {
            continue;
        }

        let content = element
            .select(&snippet_sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchResult::new(
            title,
            href,
            content,
            SearchEngine::Mojeek.name(),
        ));

        if results.len() >= MAX_RESULTS {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Mojeek results parsed");
    Ok(results)
}
