//! Configuration management.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config <path>`, `./book-search.toml`, or
//!    `<config_dir>/book-search/config.toml`)
//! 3. `BOOK_SEARCH_*` environment variables, with `__` between section and
//!    key (e.g. `BOOK_SEARCH_API__TIMEOUT_SECONDS=10`)

mod file_config;

pub use file_config::{default_config_path, find_config_file, save_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::session::StalePolicy;
use crate::sources::DEFAULT_API_BASE;
use crate::utils::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "BOOK_SEARCH";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote catalog settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Search session behavior
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote catalog endpoints and HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the search endpoint
    #[serde(default = "default_api_base")]
    pub search_base: String,

    /// Base URL of the detail endpoint; the book id is appended as a path segment
    #[serde(default = "default_api_base")]
    pub detail_base: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_base: default_api_base(),
            detail_base: default_api_base(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Search session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// What to do with a response that was superseded by a newer request
    #[serde(default)]
    pub stale_responses: StalePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this crate when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigFileError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.search_base, DEFAULT_API_BASE);
        assert_eq!(config.api.detail_base, DEFAULT_API_BASE);
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.session.stale_responses, StalePolicy::Discard);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[api]
search_base = "http://localhost:8080/volumes"
timeout_seconds = 5

[session]
stale_responses = "apply"

[logging]
level = "debug"
"#;
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.api.search_base, "http://localhost:8080/volumes");
        assert_eq!(config.api.detail_base, DEFAULT_API_BASE);
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.session.stale_responses, StalePolicy::Apply);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_config_env_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntimeout_seconds = 5\n").unwrap();

        std::env::set_var("BOOK_SEARCH_API__USER_AGENT", "env-agent/1.0");
        let config = load_config(Some(&path));
        std::env::remove_var("BOOK_SEARCH_API__USER_AGENT");

        let config = config.unwrap();
        assert_eq!(config.api.user_agent, "env-agent/1.0");
        assert_eq!(config.api.timeout_seconds, 5);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/book-search.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
