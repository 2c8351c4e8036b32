//! Config file parsing for `~/.config/epub-covers/config.toml`.
//!
//! The only setting is the optional Google Books API key. Command-line and
//! environment values take precedence over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Credential for the Google Books title search. Optional; the API
    /// answers anonymous requests with a lower quota.
    pub google_books_api_key: Option<String>,
}

impl AppConfig {
    /// The key to use: an explicit non-empty override, else the configured one.
    pub fn api_key(&self, override_key: Option<&str>) -> Option<String> {
        override_key
            .filter(|k| !k.is_empty())
            .map(String::from)
            .or_else(|| self.lookup.google_books_api_key.clone())
            .filter(|k| !k.is_empty())
    }
}

/// Return the default config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("epub-covers");
        p.push("config.toml");
        p
    })
}

/// Load config from the default path. A missing or invalid file yields defaults.
pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Ignoring config: {}", e);
            AppConfig::default()
        }
    }
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Invalid {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}
