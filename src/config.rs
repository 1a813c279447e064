//! User configuration stored in `config.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "spotify-playback";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CLIENT_ID: &str = "492e1e45ea814fa3ac555fe1576aaf5b";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8898/login";
const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: String,
    /// Holds the cached refresh token
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    pub api_base_url: String,
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

impl Default for Config {
    fn default() -> Self {
        let cache_dir = app_dir(dirs::cache_dir());
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            log_dir: cache_dir.join("logs"),
            cache_dir,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        app_dir(dirs::config_dir()).join(CONFIG_FILE)
    }

    /// Load from `path`, or the default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn refresh_token_path(&self) -> PathBuf {
        self.cache_dir.join("refresh_token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            client_id = "abc123"
            cache_dir = "/tmp/sp-cache"
            "#,
        )
        .unwrap();

        assert_eq!(config.client_id, "abc123");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/sp-cache"));
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.refresh_token_path(), PathBuf::from("/tmp/sp-cache/refresh_token"));
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(Config::from_toml("client_id = [").is_err());
        assert!(Config::from_toml("client_id = 42").is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("spotify-playback-missing/config.toml");
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }
}
