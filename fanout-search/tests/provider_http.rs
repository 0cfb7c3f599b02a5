//! End-to-end tests for the built-in providers and suggestion sources
//! against a local mock HTTP server.

use fanout_search::http::build_client;
use fanout_search::providers::{
    DuckDuckGoProvider, MojeekProvider, QwantProvider, RedditProvider, StackExchangeProvider,
    WikipediaProvider,
};
use fanout_search::suggest::{OpenSearchSource, QwantSuggest};
use fanout_search::{Aggregator, OutcomeStatus, QueryOptions, SearchConfig, Suggester, Timeframe};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DDG_HTML: &str = r#"<html><body>
<div class="result results_links web-result">
  <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRust_(programming_language)%3Futm_source%3Dddg&amp;rut=x">Rust (programming language) - Wikipedia</a>
  <div class="result__snippet">General-purpose programming language.</div>
</div>
<div class="result results_links web-result">
  <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.memorymanagement.org%2F&amp;rut=y">Memory Management Reference</a>
  <div class="result__snippet">All about memory.</div>
</div>
</body></html>"#;

fn client() -> reqwest::Client {
    build_client(&SearchConfig::default()).expect("client")
}

async fn mount_search_backends(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("q=rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DDG_HTML))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>captcha</body></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("srsearch", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"search": [
                {"title": "Rust (programming language)",
                 "snippet": "<span class=\"searchmatch\">Rust</span> is a language"},
                {"title": "Iron oxide", "snippet": "Reddish-brown oxides"}
            ]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("t", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"children": [
                {"data": {"title": "Learning Rust in 2026",
                          "permalink": "/r/rust/comments/abc/learning_rust/",
                          "selftext": "",
                          "subreddit_name_prefixed": "r/rust"}},
                {"data": {"title": "", "permalink": "/r/rust/comments/empty/"}}
            ]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.3/search/advanced"))
        .and(query_param("site", "stackoverflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"title": "What are Rust&#39;s exact auto-dereferencing rules?",
                 "link": "https://stackoverflow.com/questions/28519997",
                 "score": 300,
                 "tags": ["rust", "reference", "language-lawyer", "formal-semantics"]}
            ]
        })))
        .mount(server)
        .await;
}

fn aggregator_for(server: &MockServer) -> Aggregator {
    let base = server.uri();
    let client = client();
    Aggregator::new(4)
        .register(DuckDuckGoProvider::new(client.clone()).with_base_url(format!("{base}/html/")))
        .register(MojeekProvider::new(client.clone()).with_base_url(format!("{base}/search")))
        .register(QwantProvider::new(client.clone()).with_base_url(format!("{base}/")))
        .register(WikipediaProvider::new(client.clone()).with_base_url(format!("{base}/w/api.php")))
        .register(RedditProvider::new(client.clone()).with_base_url(format!("{base}/search.json")))
        .register(
            StackExchangeProvider::new(client).with_base_url(format!("{base}/2.3/search/advanced")),
        )
}

#[tokio::test]
async fn six_providers_merge_into_one_ranked_list() {
    let server = MockServer::start().await;
    mount_search_backends(&server).await;

    let options = QueryOptions::default().with_timeframe(Some(Timeframe::Week));
    let report = aggregator_for(&server)
        .aggregate_with_report("rust", &options)
        .await
        .expect("aggregation succeeds");

    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        [
            // Title matches, in provider order; Wikipedia's copy of the
            // first URL lost to DuckDuckGo's.
            "https://en.wikipedia.org/wiki/Rust_(programming_language)?utm_source=ddg",
            "https://www.reddit.com/r/rust/comments/abc/learning_rust/",
            "https://stackoverflow.com/questions/28519997",
            // Non-matches, in provider order.
            "https://www.memorymanagement.org/",
            "https://en.wikipedia.org/wiki/Iron_oxide",
        ]
    );
    assert_eq!(report.results[0].engine, "duckduckgo");
    assert_eq!(
        report.results[2].title,
        "What are Rust's exact auto-dereferencing rules?"
    );
    assert_eq!(report.results[1].content, "r/rust");

    let statuses: Vec<(&str, &OutcomeStatus)> = report
        .outcomes
        .iter()
        .map(|o| (o.engine.as_str(), &o.status))
        .collect();
    assert!(matches!(statuses[1], ("mojeek", OutcomeStatus::Failed { .. })));
    assert!(matches!(
        statuses[2],
        ("qwant", OutcomeStatus::Succeeded { count: 0 })
    ));
    assert!(matches!(
        statuses[3],
        ("wikipedia", OutcomeStatus::Succeeded { count: 2 })
    ));
}

#[tokio::test]
async fn slow_backend_times_out_without_blocking_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"query": {"search": []}}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"children": [
                {"data": {"title": "Rust tips", "permalink": "/r/rust/comments/tips/",
                          "selftext": "Use clippy."}}
            ]}
        })))
        .mount(&server)
        .await;

    let base = server.uri();
    let aggregator = Aggregator::new(2)
        .register(WikipediaProvider::new(client()).with_base_url(format!("{base}/w/api.php")))
        .register(RedditProvider::new(client()).with_base_url(format!("{base}/search.json")));

    let started = std::time::Instant::now();
    let report = aggregator
        .aggregate_with_report("rust", &QueryOptions::default().with_timeout_ms(300))
        .await
        .expect("ok");

    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    assert_eq!(report.outcomes[0].status, OutcomeStatus::TimedOut);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].content, "Use clippy.");
}

#[tokio::test]
async fn query_deadline_outlasts_short_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"query": {"search": [
                    {"title": "Rust (programming language)", "snippet": "A language"}
                ]}}))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = SearchConfig {
        request_timeout_seconds: 1,
        ..SearchConfig::default()
    };
    let client = build_client(&config).expect("client");
    let aggregator = Aggregator::new(1).register(
        WikipediaProvider::new(client).with_base_url(format!("{}/w/api.php", server.uri())),
    );

    let report = aggregator
        .aggregate_with_report("rust", &QueryOptions::default().with_timeout_ms(5_000))
        .await
        .expect("ok");

    assert_eq!(
        report.outcomes[0].status,
        OutcomeStatus::Succeeded { count: 1 }
    );
    assert_eq!(report.results.len(), 1);
}

#[tokio::test]
async fn suggestion_sources_vote_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ac/"))
        .and(query_param("q", "rust"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["rust", ["rust lang", "rustup"]])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/suggest"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["rust", ["rust lang", "rust belt"]])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"items": [{"value": "rust lang"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let base = server.uri();
    let suggester = Suggester::new(4)
        .register(OpenSearchSource::duckduckgo(client()).with_base_url(format!("{base}/ac/")))
        .register(OpenSearchSource::brave(client()).with_base_url(format!("{base}/api/suggest")))
        .register(QwantSuggest::new(client()).with_base_url(format!("{base}/v3/suggest")))
        .register(OpenSearchSource::wikipedia(client()).with_base_url(format!("{base}/w/api.php")));

    let merged = suggester.suggest("rust").await.expect("ok");
    assert_eq!(merged, ["rust lang", "rust belt", "rustup"]);
}

/// Hits the real backends. Run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn live_aggregate_returns_results() {
    let results = fanout_search::aggregate("rust programming language", &QueryOptions::default())
        .await
        .expect("aggregate");
    assert!(!results.is_empty());
}

/// Hits the real suggestion endpoints.
#[tokio::test]
#[ignore]
async fn live_suggest_returns_completions() {
    let suggestions = fanout_search::suggest("rust prog").await.expect("suggest");
    assert!(suggestions.len() <= fanout_search::SUGGESTION_LIMIT);
}
