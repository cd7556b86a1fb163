use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "ASKBOX_API_URL";

/// Contents of `config.json`; every field is optional
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ConfigFile {
    pub api_url: Option<String>,
}

impl ConfigFile {
    /// A missing file is not an error and yields the empty config.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Resolve the API base URL once at startup.
    ///
    /// Precedence: `cli_api_url`, then `ASKBOX_API_URL`, then the config
    /// file, then [`DEFAULT_API_URL`]. A broken config file is logged and
    /// skipped.
    pub fn load(cli_api_url: Option<String>) -> Self {
        let env_api_url = std::env::var(API_URL_ENV).ok();
        let file = match Self::config_path() {
            Some(path) => ConfigFile::read(&path).unwrap_or_else(|e| {
                warn!("ignoring config file: {}", e);
                ConfigFile::default()
            }),
            None => ConfigFile::default(),
        };

        Self::from_sources(cli_api_url, env_api_url, file)
    }

    pub fn from_sources(
        cli_api_url: Option<String>,
        env_api_url: Option<String>,
        file: ConfigFile,
    ) -> Self {
        let api_url = [cli_api_url, env_api_url, file.api_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        debug!(%api_url, "resolved api url");
        Self { api_url }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("askbox").join("config.json"))
    }
}
