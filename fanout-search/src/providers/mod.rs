//! Built-in search providers.
//!
//! Each module provides a struct implementing [`crate::provider::SearchProvider`]
//! for one public, key-free backend. HTML sources are scraped with CSS
//! selectors; JSON sources are decoded into narrow serde structs that
//! tolerate missing fields.

pub mod duckduckgo;
pub mod mojeek;
pub mod qwant;
pub mod reddit;
pub mod stackexchange;
pub mod wikipedia;

pub use duckduckgo::DuckDuckGoProvider;
pub use mojeek::MojeekProvider;
pub use qwant::QwantProvider;
pub use reddit::RedditProvider;
pub use stackexchange::StackExchangeProvider;
pub use wikipedia::WikipediaProvider;

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::SearchEngine;

/// Instantiate the built-in provider for `engine` on a shared client.
pub fn provider_for(engine: SearchEngine, client: reqwest::Client) -> Arc<dyn SearchProvider> {
    match engine {
        SearchEngine::DuckDuckGo => Arc::new(DuckDuckGoProvider::new(client)),
        SearchEngine::Mojeek => Arc::new(MojeekProvider::new(client)),
        SearchEngine::Qwant => Arc::new(QwantProvider::new(client)),
        SearchEngine::Wikipedia => Arc::new(WikipediaProvider::new(client)),
        SearchEngine::Reddit => Arc::new(RedditProvider::new(client)),
        SearchEngine::StackExchange => Arc::new(StackExchangeProvider::new(client)),
    }
}

/// Compile a CSS selector, reporting failures as parse errors.
pub(crate) fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Text content of an HTML fragment: tags dropped, entities decoded,
/// whitespace collapsed.
pub(crate) fn fragment_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    collapse_whitespace(&parsed.root_element().text().collect::<String>())
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
