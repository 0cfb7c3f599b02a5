//! Qwant provider: scrapes the web results page.
//!
//! Result cards are identified by `data-testid` attributes, which have
//! proved more stable than Qwant's generated class names.

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{QueryOptions, SearchEngine, SearchResult};

use super::{collapse_whitespace, selector};

const DEFAULT_BASE_URL: &str = "https://www.qwant.com/";

const MAX_RESULTS: usize = 15;

/// Qwant HTML scraper.
pub struct QwantProvider {
    client: reqwest::Client,
    base_url: String,
}

impl QwantProvider {
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
        let mut params = vec![("q", query), ("t", "web")];
        params.push(("s", if options.safesearch { "2" } else { "0" }));
        if let Some(timeframe) = options.timeframe {
            params.push(("freshness", timeframe.as_str()));
        }
        params
    }
}

#[async_trait]
impl SearchProvider for QwantProvider {
    fn name(&self) -> &str {
        SearchEngine::Qwant.name()
    }

    async fn search(
        &self,
        query: &str,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Qwant search");

        let request = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(query, options))
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9");

        let html = http::fetch_text(request, self.name(), cancel).await?;
        parse_qwant_html(&html)
    }
}

/// Walk up from a result link to its enclosing result card.
fn enclosing_card(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().attr("data-testid") == Some("result-card"))
}

/// Parse a Qwant web results page.
pub(crate) fn parse_qwant_html(html: &str) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    let link_sel = selector(r#"a[data-testid="result-link"]"#)?;
    let description_sel = selector(r#"[data-testid="result-description"]"#)?;

    let mut results = Vec::new();

    for link in document.select(&link_sel) {
        let title = collapse_whitespace(&link.text().collect::<String>());
        let href = link.value().attr("href").unwrap_or_default().trim();
        if title.is_empty() || href.is_empty() {
            continue;
        }

        let content = enclosing_card(link)
            .and_then(|card| card.select(&description_sel).next())
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchResult::new(title, href, content, SearchEngine::Qwant.name()));

        if results.len() >= MAX_RESULTS {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Qwant results parsed");
    Ok(results)
}
