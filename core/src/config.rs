//! Client configuration
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding [`ClientConfig::base_url`]
pub const ENV_BASE_URL: &str = "ALGOSCOPE_BASE_URL";
/// Environment variable overriding [`ClientConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "ALGOSCOPE_TIMEOUT_SECS";
/// Environment variable overriding [`ClientConfig::default_generate_size`]
pub const ENV_GENERATE_SIZE: &str = "ALGOSCOPE_GENERATE_SIZE";
/// Environment variable overriding [`ClientConfig::history_limit`]
pub const ENV_HISTORY_LIMIT: &str = "ALGOSCOPE_HISTORY_LIMIT";

/// Configuration for talking to the algorithm service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service, without the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Size used for data generation when the size field does not parse
    #[serde(default = "default_generate_size")]
    pub default_generate_size: usize,

    /// Number of entries requested from the execution history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_base_url() -> String { "http://127.0.0.1:5000".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_generate_size() -> usize { 100 }
fn default_history_limit() -> usize { 10 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_generate_size: default_generate_size(),
            history_limit: default_history_limit(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by any `ALGOSCOPE_*` variables set in the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_GENERATE_SIZE) {
            self.default_generate_size = parse_number(ENV_GENERATE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_HISTORY_LIMIT) {
            self.history_limit = parse_number(ENV_HISTORY_LIMIT, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the configuration for values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                name: "base_url".into(),
                reason: format!("{:?} is not an http(s) URL", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.default_generate_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "default_generate_size".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of an `/api` endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: format!("{:?} is not a non-negative integer", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_generate_size, 100);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ClientConfig {
            base_url: "http://localhost:5000/".into(),
            ..Default::default()
        };
        assert_eq!(config.endpoint("/algorithms"), "http://localhost:5000/api/algorithms");
        assert_eq!(config.endpoint("compare"), "http://localhost:5000/api/compare");
    }

    #[test]
    fn overrides_are_applied_and_validated() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://algos.example"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_HISTORY_LIMIT, "25"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.base_url, "https://algos.example");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.default_generate_size, 100);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let err = ClientConfig::default()
            .with_overrides(|name| (name == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ClientConfig::default()
            .with_overrides(|name| (name == ENV_BASE_URL).then(|| "ftp://nope".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn deserializes_with_field_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://10.0.0.2:8080"}"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.history_limit, 10);
    }
}
