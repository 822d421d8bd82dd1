//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `LEARNGRAPH_*` environment variables. Command-line flags are applied last
//! by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_HOST: &str = "LEARNGRAPH_HOST";
pub const ENV_PORT: &str = "LEARNGRAPH_PORT";
pub const ENV_DATA_FILE: &str = "LEARNGRAPH_DATA_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON document holding the graph
    pub data_file: PathBuf,
    /// Start from the example graph when the data file is missing
    pub seed_example_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/knowledge_graph.json"),
            seed_example_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 50,
        }
    }
}

impl RecommendationConfig {
    /// Requested limit, or the default, capped at `max_limit`
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub recommendations: RecommendationConfig,
}

impl AppConfig {
    /// Defaults, overlaid with `path` (if given) and the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Overlay variables looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PORT.to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(file) = lookup(ENV_DATA_FILE) {
            self.storage.data_file = PathBuf::from(file);
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                value: self.server.host.clone(),
            });
        }
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "storage.data_file".to_string(),
                value: String::new(),
            });
        }
        if self.recommendations.max_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "recommendations.max_limit".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
