//! Fetch configuration: sources, timeout, output path.
//!
//! Everything has a built-in default, so a run needs no configuration at
//! all. A TOML file may override any subset of keys.

use crate::data::http::DEFAULT_USER_AGENT;
use crate::data::source::SourceList;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PRIMARY_URL: &str =
    "https://raw.githubusercontent.com/datasets/s-and-p-500-companies-financials/main/data/constituents-financials.csv";

pub const DEFAULT_SECONDARY_URLS: [&str; 2] = [
    "https://raw.githubusercontent.com/datasets/finance-vix/main/data/vix-daily.csv",
    "https://datahub.io/core/gold-prices/r/monthly.csv",
];

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_OUTPUT: &str = "scraped_data.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Tried first.
    pub primary: String,
    /// Tried in order after the primary.
    pub secondaries: Vec<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub output: PathBuf,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_URL.to_string(),
            secondaries: DEFAULT_SECONDARY_URLS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary.trim().is_empty() {
            return Err(ConfigError::Invalid("primary URL is empty".into()));
        }
        if let Some(i) = self.secondaries.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("secondary URL #{} is empty", i + 1)));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if reqwest::header::HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(ConfigError::Invalid(format!(
                "user_agent {:?} is not a valid header value",
                self.user_agent
            )));
        }
        Ok(())
    }

    pub fn source_list(&self) -> SourceList {
        SourceList::from_urls(&self.primary, &self.secondaries)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
