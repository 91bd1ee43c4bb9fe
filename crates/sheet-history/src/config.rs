//! Configuration types for the navigation history.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`HistoryConfig`] - Where a new [`History`](crate::History) starts.
//! - [`ListConfig`] - Defaults applied to paginated list tokens.
//!
//! # Example
//!
//! ```
//! # use sheet_history::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.history().initial_fragment(), "/");
//! assert_eq!(config.list().default_count(), None);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// History section.
    #[serde(default)]
    history: HistoryConfig,

    /// List section.
    #[serde(default)]
    list: ListConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(history: HistoryConfig, list: ListConfig) -> Self {
        Self { history, list }
    }

    /// Returns the history configuration.
    pub fn history(&self) -> &HistoryConfig {
        &self.history
    }

    /// Returns the list configuration.
    pub fn list(&self) -> &ListConfig {
        &self.list
    }
}

/// Settings for a freshly created [`History`](crate::History).
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Fragment parsed to obtain the first token.
    #[serde(default = "default_initial_fragment")]
    initial_fragment: String,
}

fn default_initial_fragment() -> String {
    "/".to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            initial_fragment: default_initial_fragment(),
        }
    }
}

impl HistoryConfig {
    pub fn new(initial_fragment: impl Into<String>) -> Self {
        Self {
            initial_fragment: initial_fragment.into(),
        }
    }

    pub fn initial_fragment(&self) -> &str {
        &self.initial_fragment
    }
}

/// Defaults for paginated tokens such as the spreadsheet or plugin list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListConfig {
    /// Count applied to a pushed list fragment that carries none.
    #[serde(default)]
    default_count: Option<u32>,
}

impl ListConfig {
    pub fn new(default_count: Option<u32>) -> Self {
        Self { default_count }
    }

    /// Returns the configured default count, if any.
    pub fn default_count(&self) -> Option<u32> {
        self.default_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.history().initial_fragment(), "/");
        assert_eq!(config.list().default_count(), None);
    }

    #[test]
    fn test_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [history]
            initial_fragment = "/plugin/*"

            [list]
            default_count = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.history().initial_fragment(), "/plugin/*");
        assert_eq!(config.list().default_count(), Some(20));
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str("[history]\n").unwrap();
        assert_eq!(config.history().initial_fragment(), "/");
    }

    #[test]
    fn test_rejects_wrong_type() {
        assert!(toml::from_str::<AppConfig>("[list]\ndefault_count = \"many\"\n").is_err());
    }
}
