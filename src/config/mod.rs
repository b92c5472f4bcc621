//! Configuration management for Touchline.
//!
//! Configuration is read from `~/.config/touchline/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod keybindings;
pub mod settings;

pub use keybindings::KeybindingConfig;
pub use settings::{FeedSettings, SettingsHandle};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fetcher::query::DEFAULT_BASE_URL;
use crate::fetcher::OrderBy;
use crate::normalizer::MissingFieldPolicy;

/// Overrides `api.api_key` when set and non-empty.
pub const API_KEY_ENV: &str = "GUARDIAN_API_KEY";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub articles: ArticlesConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Probe the API host before every load.
    pub check_connectivity: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: "test".to_string(),
            check_connectivity: true,
        }
    }
}

impl ApiConfig {
    pub fn resolved_api_key(&self) -> String {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArticlesConfig {
    pub articles_count: String,
    pub order_by: OrderBy,
    pub on_missing_field: MissingFieldPolicy,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            articles_count: settings::DEFAULT_ARTICLES_COUNT.to_string(),
            order_by: OrderBy::default(),
            on_missing_field: MissingFieldPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/touchline/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("touchline").join("config.toml"))
    }

    /// Initial session settings taken from the `[articles]` section.
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            articles_count: self.articles.articles_count.clone(),
            order_by: self.articles.order_by,
        }
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Touchline Configuration
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "1"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
# Search endpoint of the content API
base_url = "https://content.guardianapis.com/search"

# API key ("test" is the public developer key).
# The GUARDIAN_API_KEY environment variable takes precedence.
api_key = "test"

# Check that the API host is reachable before loading
check_connectivity = true

[articles]
# Number of articles per load
articles_count = "10"

# Sort order: newest, oldest or relevance
order_by = "newest"

# What to do with an article missing a required field:
# "skip" drops that article, "abort" discards the whole load
on_missing_field = "skip"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
page_up = ["p", "PageUp"]
page_down = ["n", "PageDown"]
open_in_browser = ["o", "Enter"]
refresh = ["r", "F5"]
cycle_order = ["s"]
more_per_page = ["+", "="]
fewer_per_page = ["-"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.articles.articles_count, "10");
        assert_eq!(config.articles.order_by, OrderBy::Newest);
        assert_eq!(config.articles.on_missing_field, MissingFieldPolicy::Skip);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[articles]
order_by = "relevance"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.articles.order_by, OrderBy::Relevance);
        assert_eq!(config.articles.articles_count, "10");
        assert!(config.api.check_connectivity);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.api.api_key, "test");
        assert_eq!(config.keybindings.refresh, vec!["r", "F5"]);
    }

    #[test]
    fn test_unknown_order_is_rejected() {
        let content = "[articles]\norder_by = \"random\"\n";
        assert!(toml::from_str::<Config>(content).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[articles]\narticles_count = \"25\"\non_missing_field = \"abort\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.articles.on_missing_field, MissingFieldPolicy::Abort);

        let settings = config.feed_settings();
        assert_eq!(settings.articles_count, "25");
        assert_eq!(settings.order_by, OrderBy::Newest);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[articles\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_create_default_config_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("touchline").join("config.toml");

        Config::create_default_config(&path).unwrap();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.articles.order_by, OrderBy::Newest);
    }
}
