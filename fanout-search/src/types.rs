//! Core types shared by every provider and the aggregation engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SearchError;

/// Default per-provider deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 12_000;

/// A single normalised search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title of the result.
    pub title: String,
    /// Canonical URL of the result.
    pub url: String,
    /// Free-text snippet. May be empty.
    #[serde(default)]
    pub content: String,
    /// Identifier of the provider that produced this result.
    pub engine: String,
}

impl SearchResult {
    /// Build a result tagged with the given provider identifier.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        engine: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            engine: engine.into(),
        }
    }

    /// Whether the result has both a title and a URL.
    ///
    /// Results failing this check are dropped before the merge step.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }
}

/// Time range restriction shared by all providers.
///
/// "Unset" is represented by `Option::<Timeframe>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// The last 24 hours.
    Day,
    /// The last 7 days.
    Week,
    /// The last 30 days.
    Month,
}

impl Timeframe {
    /// Lowercase identifier (`"day"`, `"week"`, `"month"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Approximate length of the window in days.
    pub fn days(&self) -> u64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(SearchError::Config(format!(
                "unknown timeframe '{other}' (expected day, week or month)"
            ))),
        }
    }
}

/// Per-call query options. Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Restrict results to a recent window. `None` means no restriction.
    pub timeframe: Option<Timeframe>,
    /// Ask providers for strict filtering where supported.
    pub safesearch: bool,
    /// Per-provider deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeframe: None,
            safesearch: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl QueryOptions {
    /// Set the timeframe restriction.
    pub fn with_timeframe(mut self, timeframe: Option<Timeframe>) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Set the safesearch flag.
    pub fn with_safesearch(mut self, safesearch: bool) -> Self {
        self.safesearch = safesearch;
        self
    }

    /// Set the per-provider deadline.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The per-provider deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Rejects options that cannot produce a dispatchable task set.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_ms == 0 {
            return Err(SearchError::Config(
                "timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Built-in search providers, listed in default registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    /// DuckDuckGo HTML endpoint.
    DuckDuckGo,
    /// Mojeek, an independent crawler with a plain HTML results page.
    Mojeek,
    /// Qwant web results page.
    Qwant,
    /// Wikipedia full-text search API.
    Wikipedia,
    /// Reddit public search JSON.
    Reddit,
    /// Stack Exchange API (Stack Overflow).
    StackExchange,
}

impl SearchEngine {
    /// Stable identifier written into [`SearchResult::engine`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "duckduckgo",
            Self::Mojeek => "mojeek",
            Self::Qwant => "qwant",
            Self::Wikipedia => "wikipedia",
            Self::Reddit => "reddit",
            Self::StackExchange => "stackexchange",
        }
    }

    /// All built-in providers in registration order.
    pub fn all() -> &'static [SearchEngine] {
        &[
            Self::DuckDuckGo,
            Self::Mojeek,
            Self::Qwant,
            Self::Wikipedia,
            Self::Reddit,
            Self::StackExchange,
        ]
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in autosuggest endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestEngine {
    /// DuckDuckGo autocomplete (OpenSearch array).
    DuckDuckGo,
    /// Brave Search suggest API (OpenSearch array).
    Brave,
    /// Qwant suggest API (status envelope).
    Qwant,
    /// MediaWiki `action=opensearch`.
    Wikipedia,
}

impl SuggestEngine {
    /// Lowercase identifier, matching the serde form.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "duckduckgo",
            Self::Brave => "brave",
            Self::Qwant => "qwant",
            Self::Wikipedia => "wikipedia",
        }
    }

    /// Every built-in source, in default registration order.
    pub fn all() -> &'static [SuggestEngine] {
        &[Self::DuckDuckGo, Self::Brave, Self::Qwant, Self::Wikipedia]
    }
}

impl fmt::Display for SuggestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
