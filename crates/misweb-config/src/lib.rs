//! Configuration management for misweb
//!
//! This module handles loading, validation, and management of
//! misweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Upstream MIS backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamConfig {
    /// Base URL of the MIS REST backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request deadline in seconds for upstream calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationConfig {
    /// Records per page for entity lists
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

fn default_records_per_page() -> usize {
    50
}

/// Report filter settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FiltersConfig {
    /// How many years back the year dropdown reaches
    #[serde(default = "default_year_span")]
    pub year_span: i32,
    /// Offer period 13 (year-end adjustment) in the ledger-card family
    #[serde(default = "default_true")]
    pub thirteenth_period: bool,
}

fn default_year_span() -> i32 {
    20
}

fn default_true() -> bool {
    true
}

/// Number formatting for report tables and exports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Number of decimal places for amounts
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            thousands_separator: ",".to_string(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream MIS backend settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Report filter settings
    #[serde(default)]
    pub filters: FiltersConfig,
    /// Number formatting settings
    #[serde(default)]
    pub format: FormatConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::FileNotFound { path: path.to_string_lossy().to_string() })?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.upstream.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "upstream.base_url".to_string(),
            });
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upstream.timeout_secs".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.filters.year_span < 1 || self.filters.year_span > 100 {
            return Err(ConfigError::InvalidValue {
                field: "filters.year_span".to_string(),
                reason: "Year span must be between 1 and 100".to_string(),
            });
        }

        if self.format.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "format.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Field defaults apply through serde, so parse an empty document
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.pagination.records_per_page, 50);
        assert_eq!(config.filters.year_span, 20);
        assert!(config.filters.thirteenth_period);
        assert_eq!(config.format.decimal_places, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let yaml = "server:\n  port: 9000\nupstream:\n  base_url: http://mis.internal\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.upstream.base_url, "http://mis.internal");
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config: Config = serde_yaml::from_str("{}").unwrap();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config: Config = serde_yaml::from_str("{}").unwrap();
        config.upstream.base_url.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_year_span_out_of_range() {
        let mut config: Config = serde_yaml::from_str("{}").unwrap();
        config.filters.year_span = 0;
        assert!(config.validate().is_err());
        config.filters.year_span = 101;
        assert!(config.validate().is_err());
        config.filters.year_span = 20;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = serde_yaml::from_str(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
    }
}
