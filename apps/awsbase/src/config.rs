//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use awsbase_credentials::Config;

/// Configuration of the `awsbase` binary, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file holding a credentials [`Config`].
    pub config_path: Option<PathBuf>,
    /// Region to resolve the partition for.
    pub region: Option<String>,
    /// Log level filter.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            region: None,
            log_level: "info".to_owned(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("AWSBASE_CONFIG") {
            config.config_path = Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
        }
        if let Ok(v) = std::env::var("AWSBASE_REGION") {
            config.region = Some(v).filter(|r| !r.is_empty());
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Load the credentials configuration, or the default when no file is set.
    pub async fn credentials_config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => load_config_file(path).await,
            None => Ok(Config::default()),
        }
    }
}

async fn load_config_file(path: &Path) -> Result<Config> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
