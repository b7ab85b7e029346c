//! Configuration file discovery and writing.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! search_base = "https://www.googleapis.com/books/v1/volumes"
//! detail_base = "https://www.googleapis.com/books/v1/volumes"
//! timeout_seconds = 30
//! user_agent = "book-search/0.1.0"
//!
//! [session]
//! stale_responses = "discard"   # or "apply"
//!
//! [logging]
//! level = "warn"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "book-search.toml";

/// Per-user config location: `<config_dir>/book-search/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("book-search").join("config.toml"))
}

/// First existing config file among the working directory and the per-user location
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|path| path.is_file())
}

/// Write a configuration as TOML, creating parent directories as needed
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::session::StalePolicy;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.timeout_seconds = 12;
        config.session.stale_responses = StalePolicy::Apply;

        save_config(&config, &path).unwrap();
        let loaded = load_config(Some(&path)).unwrap();

        assert_eq!(loaded.api.timeout_seconds, 12);
        assert_eq!(loaded.session.stale_responses, StalePolicy::Apply);
    }

    #[test]
    fn test_saved_file_is_readable_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        save_config(&Config::default(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[api]"));
        assert!(content.contains("stale_responses = \"discard\""));
    }

    #[test]
    fn test_default_config_path_name() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("book-search/config.toml"));
        }
    }
}
