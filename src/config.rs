//! Controller configuration, loaded from an optional TOML file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CheckerError;
use crate::tracker::DEFAULT_SOFT_LIMIT;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Length the reference backend accepts; shown next to the counter only.
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Settings for the dispatcher, tracker and presenter.
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Base URL of the analysis backend (e.g. `http://127.0.0.1:5000`).
    pub base_url: String,
    pub analyze_path: String,
    pub health_path: String,
    /// Counter switches to warning emphasis above this many characters.
    pub soft_limit: usize,
    /// Advisory maximum shown next to the counter. Never enforced client-side.
    pub max_chars: usize,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. Unset means a request runs to completion.
    pub request_timeout_secs: Option<u64>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            analyze_path: "/analyze".to_string(),
            health_path: "/health".to_string(),
            soft_limit: DEFAULT_SOFT_LIMIT,
            max_chars: DEFAULT_MAX_CHARS,
            connect_timeout_secs: 3,
            request_timeout_secs: None,
        }
    }
}

impl CheckerConfig {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CheckerError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| CheckerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|source| CheckerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), base_url = %config.base_url, "loaded config file");
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), CheckerError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CheckerError::ConfigValue(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(CheckerError::ConfigValue(
                "connect_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(CheckerError::ConfigValue(
                "request_timeout_secs must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
