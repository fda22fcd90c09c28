use crate::common::constants::{
    API_BASE_URL, BASE_BACKOFF, BASE_URL_ENV, DEFAULT_CONFIG_PATH, MAX_RETRIES, MAX_RETRIES_ENV,
    REQUEST_TIMEOUT_SECS,
};
use crate::common::error::{EnricherError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout_seconds: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_backoff: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_backoff: BASE_BACKOFF,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EnricherError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, else `config.toml` when present, else defaults;
    /// then apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(Path::new(DEFAULT_CONFIG_PATH))?,
            None => Self::default(),
        };
        config.with_overrides(std::env::var(BASE_URL_ENV).ok(), std::env::var(MAX_RETRIES_ENV).ok())
    }

    pub fn with_overrides(mut self, base_url: Option<String>, max_attempts: Option<String>) -> Result<Self> {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = max_attempts {
            self.retry.max_attempts = raw.trim().parse().map_err(|_| {
                EnricherError::Config(format!("{} must be a positive integer, got '{}'", MAX_RETRIES_ENV, raw))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(EnricherError::Config("api.base_url must not be empty".into()));
        }
        if self.api.timeout_seconds == 0 {
            return Err(EnricherError::Config("api.timeout_seconds must be at least 1".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(EnricherError::Config("retry.max_attempts must be at least 1".into()));
        }
        if self.retry.base_backoff == 0 {
            return Err(EnricherError::Config("retry.base_backoff must be at least 1".into()));
        }
        Ok(())
    }
}
