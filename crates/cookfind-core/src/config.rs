//! Search configuration and the optional TOML config file.
//!
//! Front ends resolve settings as CLI flags > environment variables > config
//! file > [`Config::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CoreError;
use crate::session::DEFAULT_RESULTS_PER_PAGE;

pub const DEFAULT_BASE_URL: &str = "https://cooking.nytimes.com";

/// Configuration for the recipe search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site root; search pages live under `{base_url}/search`.
    pub base_url: String,
    /// Per-request timeout. A page that takes longer fails the search.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Page size assumed when the first page does not state one.
    pub results_per_page: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("cookfind/{}", env!("CARGO_PKG_VERSION")),
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
        }
    }
}

impl Config {
    /// Parse a config file body. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `COOKFIND_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("COOKFIND_BASE_URL") {
            self.base_url = url;
        }
        if let Some(secs) = std::env::var("COOKFIND_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = secs;
        }
        if let Ok(agent) = std::env::var("COOKFIND_USER_AGENT") {
            self.user_agent = agent;
        }
    }
}

/// Default location of the config file: `<config dir>/cookfind/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cookfind").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml_str("timeout_secs = 5\n").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.results_per_page, 24);
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml_str(
            r#"
            base_url = "http://localhost:8080"
            timeout_secs = 3
            user_agent = "test-agent"
            results_per_page = 48
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.results_per_page, 48);
    }

    #[test]
    fn bad_file_is_config_error() {
        let err = Config::from_toml_str("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::load_or_default(Path::new("/nonexistent/cookfind.toml")).unwrap();
        assert_eq!(config.timeout_secs, 30);
    }
}
