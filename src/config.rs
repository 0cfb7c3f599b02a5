//! TOML configuration for the fanout host.
//!
//! ```toml
//! [search]
//! engines = ["duckduckgo", "wikipedia", "reddit"]
//! max_concurrency = 4
//!
//! [query]
//! timeframe = "week"
//! safesearch = true
//! timeout_ms = 8000
//! ```

use std::path::{Path, PathBuf};

use fanout_search::{QueryOptions, SearchConfig, Timeframe};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider registry and HTTP settings.
    pub search: SearchConfig,
    /// Defaults for every query; CLI flags override them per call.
    pub query: QueryOptions,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path, e.g. `~/.config/fanout/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("fanout")
            .join("config.toml")
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = Self::default_path();
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check both sections.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Search`] carrying the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.query.validate()?;
        Ok(())
    }
}

/// Per-call overrides of the `[query]` defaults, usually from CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub timeframe: Option<Timeframe>,
    pub safesearch: Option<bool>,
    pub timeout_ms: Option<u64>,
}

impl QueryOverrides {
    /// Layer the overrides on top of `base`.
    pub fn apply(&self, base: &QueryOptions) -> QueryOptions {
        let mut options = base.clone();
        if self.timeframe.is_some() {
            options.timeframe = self.timeframe;
        }
        if let Some(safesearch) = self.safesearch {
            options.safesearch = safesearch;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options.timeout_ms = timeout_ms;
        }
        options
    }
}
