//! DuckDuckGo provider: the HTML-only endpoint, no JavaScript required.
//!
//! Uses a POST to `https://html.duckduckgo.com/html/`, which is tolerant
//! of automated requests. Result links are usually wrapped in a
//! `//duckduckgo.com/l/?uddg=` redirect that must be unwrapped.

use async_trait::async_trait;
use scraper::Html;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{QueryOptions, SearchEngine, SearchResult, Timeframe};

use super::{collapse_whitespace, selector};

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com/html/";

/// Maximum results kept from one response.
const MAX_RESULTS: usize = 20;

/// DuckDuckGo HTML scraper.
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoProvider {
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

    /// Form parameters for a query.
    fn form_params<'a>(query: &'a str, options: &QueryOptions) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("q", query)];
        params.push(("kp", if options.safesearch { "1" } else { "-1" }));
        if let Some(timeframe) = options.timeframe {
            let df = match timeframe {
                Timeframe::Day => "d",
                Timeframe::Week => "w",
                Timeframe::Month => "m",
            };
            params.push(("df", df));
        }
        params
    }

    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    /// We parse out the `uddg` query parameter and URL-decode it.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        SearchEngine::DuckDuckGo.name()
    }

    async fn search(
        &self,
        query: &str,
        options: &QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let request = self
            .client
            .post(&self.base_url)
            .form(&Self::form_params(query, options))
            .header("Accept-Language", "en-US,en;q=0.9");

        let html = http::fetch_text(request, self.name(), cancel).await?;
        parse_duckduckgo_html(&html)
    }
}

/// Parse DuckDuckGo HTML response into search results.
pub(crate) fn parse_duckduckgo_html(html: &str) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = selector(".result:not(.result--ad), .web-result:not(.result--ad)")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = collapse_whitespace(&title_el.text().collect::<String>());
        if title.is_empty() {
            continue;
        }

        let Some(url) = title_el
            .value()
            .attr("href")
            .and_then(DuckDuckGoProvider::extract_url)
        else {
            continue;
        };

        let content = element
            .select(&snippet_sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchResult::new(
            title,
            url,
            content,
            SearchEngine::DuckDuckGo.name(),
        ));

        if results.len() >= MAX_RESULTS {
            break;
        }
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_DDG_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">
        Rust Programming Language
    </a>
    <div class="result__snippet">
        A language empowering everyone to build reliable and efficient software.
    </div>
</div>
<div class="result results_links results_links_deep result--ad">
    <a class="result__a" href="https://ads.example.com/">Sponsored (Ad)</a>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://doc.rust-lang.org/book/">
        The Rust Programming Language Book
    </a>
    <div class="result__snippet">
        An introductory book about Rust.
    </div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRust_(programming_language)&amp;rut=def456">
        Rust (programming language) - Wikipedia
    </a>
</div>
</body>
</html>"#;

    #[test]
    fn extract_url_from_ddg_redirect() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        let result = DuckDuckGoProvider::extract_url(href);
        assert_eq!(result, Some("https://example.com/page".to_string()));
    }

    #[test]
    fn extract_url_direct_link() {
        let result = DuckDuckGoProvider::extract_url("https://example.com/direct");
        assert_eq!(result, Some("https://example.com/direct".to_string()));
    }

    #[test]
    fn extract_url_invalid() {
        assert!(DuckDuckGoProvider::extract_url("not-a-url").is_none());
    }

    #[test]
    fn parse_mock_html_returns_results_in_order() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML).expect("should parse");
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert!(results[0].content.contains("reliable and efficient"));
        assert_eq!(results[0].engine, "duckduckgo");

        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
        assert!(results[2].url.contains("wikipedia.org"));
        assert!(results[2].content.is_empty());
    }

    #[test]
    fn parse_excludes_ads() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML).expect("should parse");
        assert!(results.iter().all(|r| !r.title.contains("(Ad)")));
    }

    #[test]
    fn parse_caps_result_count() {
        let block = r#"<div class="result"><a class="result__a" href="https://e.com/N">Title N</a></div>"#;
        let html: String = (0..30).map(|i| block.replace('N', &i.to_string())).collect();
        let results = parse_duckduckgo_html(&html).expect("should parse");
        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        let results = parse_duckduckgo_html("<html><body></body></html>").expect("should parse");
        assert!(results.is_empty());
    }

    #[test]
    fn form_params_map_options() {
        let options = QueryOptions::default().with_timeframe(Some(Timeframe::Week));
        let params = DuckDuckGoProvider::form_params("rust", &options);
        assert_eq!(params, vec![("q", "rust"), ("kp", "1"), ("df", "w")]);

        let options = QueryOptions::default().with_safesearch(false);
        let params = DuckDuckGoProvider::form_params("rust", &options);
        assert_eq!(params, vec![("q", "rust"), ("kp", "-1")]);
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DuckDuckGoProvider>();
    }

    #[tokio::test]
    #[ignore] // Live test, run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let provider = DuckDuckGoProvider::new(reqwest::Client::new());
        let results = provider
            .search("rust programming", &QueryOptions::default(), &CancellationToken::new())
            .await
            .expect("live search should work");
        assert!(!results.is_empty());
        for r in &results {
            assert!(r.is_usable());
        }
    }
}
