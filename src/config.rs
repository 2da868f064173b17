//! Application configuration, loaded from environment variables with defaults

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is invalid
    #[error("Invalid configuration for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    /// A required configuration value is missing
    #[error("Missing required configuration: {key} ({hint})")]
    MissingRequired { key: String, hint: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server bind address
    pub http_bind_addr: String,
    /// HTTP server port
    pub http_port: u16,
    /// SQLite database file
    pub database_path: String,
    /// Base URL of the authorization service
    pub auth_service_url: String,
    /// Base URL of the pensioner-detail service
    pub pensioner_detail_service_url: String,
    /// Timeout handed to the upstream HTTP clients
    pub upstream_timeout_secs: u64,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("HTTP_BIND_ADDR") {
            config.http_bind_addr = val;
        }
        if let Some(val) = lookup("HTTP_PORT") {
            config.http_port = val.parse().map_err(|e| ConfigError::InvalidValue {
                key: "HTTP_PORT".to_string(),
                value: val.clone(),
                reason: format!("must be a valid port number (0-65535): {}", e),
            })?;
        }
        if let Some(val) = lookup("DATABASE_PATH") {
            config.database_path = val;
        }
        if let Some(val) = lookup("AUTH_SERVICE_URL") {
            config.auth_service_url = val;
        }
        if let Some(val) = lookup("PENSIONER_DETAIL_SERVICE_URL") {
            config.pensioner_detail_service_url = val;
        }
        if let Some(val) = lookup("UPSTREAM_TIMEOUT_SECS") {
            config.upstream_timeout_secs = match val.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "UPSTREAM_TIMEOUT_SECS".to_string(),
                        value: val,
                        reason: "must be a positive number of seconds".to_string(),
                    })
                }
            };
        }
        if let Some(val) = lookup("LOG_LEVEL") {
            config.log_level = val;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("DATABASE_PATH", &self.database_path),
            ("AUTH_SERVICE_URL", &self.auth_service_url),
            ("PENSIONER_DETAIL_SERVICE_URL", &self.pensioner_detail_service_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingRequired {
                    key: key.to_string(),
                    hint: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_bind_addr, self.http_port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_bind_addr: "0.0.0.0".to_string(),
            http_port: 8082,
            database_path: "process_pension.db".to_string(),
            auth_service_url: "http://localhost:8081".to_string(),
            pensioner_detail_service_url: "http://localhost:8083".to_string(),
            upstream_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8082");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HTTP_PORT", "9000"),
            ("AUTH_SERVICE_URL", "http://auth"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(config.http_port, 9000);
        assert_eq!(config.auth_service_url, "http://auth");
        assert_eq!(config.upstream_timeout_secs, 5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("HTTP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "HTTP_PORT"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load(&[("UPSTREAM_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = load(&[("PENSIONER_DETAIL_SERVICE_URL", " ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }
}
