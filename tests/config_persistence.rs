//! Config persistence round-trips through real files.

use fanout::config::AppConfig;
use fanout::error::AppError;
use fanout_search::{SearchEngine, SuggestEngine, Timeframe};

#[test]
fn save_then_load_preserves_every_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.search.engines = vec![SearchEngine::StackExchange, SearchEngine::DuckDuckGo];
    config.search.suggest_sources = vec![SuggestEngine::Wikipedia];
    config.search.max_concurrency = 2;
    config.search.user_agent = Some("fanout-test/1.0".into());
    config.query.timeframe = Some(Timeframe::Day);
    config.query.safesearch = false;
    config.query.timeout_ms = 5_000;

    config.save_to_file(&path).expect("save");
    let loaded = AppConfig::from_file(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn default_config_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");

    AppConfig::default().save_to_file(&path).expect("save");
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.contains("[search]"));
    assert!(text.contains("[query]"));
    assert_eq!(AppConfig::from_file(&path).expect("load"), AppConfig::default());
}

#[test]
fn explicit_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[test]
fn malformed_toml_is_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[query]\ntimeframe = \"fortnight\"\n").expect("write");

    let err = AppConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn loaded_config_is_validated_separately() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[search]\nmax_concurrency = 0\n").expect("write");

    let config = AppConfig::from_file(&path).expect("parses");
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn blank_query_surfaces_as_search_error() {
    let err = fanout::run_search(&AppConfig::default(), "   ", &Default::default())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid query"));
}
