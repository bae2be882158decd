//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the contract analysis engine, loaded from
//! TOML files with environment variable overrides and validation. Rule tables
//! (risk categories, compliance checks, templates) are NOT configuration —
//! they are fixed domain knowledge compiled into the analyzer modules; the
//! settings here cover ambient concerns only: logging, input limits, and
//! optional analysis toggles.
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! ## Usage
//! ```rust
//! use contract_analyzer::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.limits.max_text_length, 500_000);
//! ```

use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure containing all engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Input size limits
    pub limits: LimitsConfig,
    /// Per-analyzer toggles
    pub analysis: AnalysisConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

/// Input size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum contract text length in bytes; longer input fails validation
    pub max_text_length: usize,
    /// Maximum text length fed to the generic named-entity pass
    pub ner_text_limit: usize,
}

/// Per-analyzer toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Run the generic capitalized-span named-entity pass for parties
    pub enable_generic_ner: bool,
    /// Run the language detection pass
    pub enable_language_detection: bool,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| AnalysisError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("CONTRACT_ANALYZER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(max_len) = std::env::var("CONTRACT_ANALYZER_MAX_TEXT_LENGTH") {
            if let Ok(parsed) = max_len.parse() {
                self.limits.max_text_length = parsed;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_text_length == 0 {
            return Err(AnalysisError::ValidationFailed {
                field: "limits.max_text_length".to_string(),
                reason: "Maximum text length cannot be zero".to_string(),
            });
        }

        if self.limits.ner_text_limit > self.limits.max_text_length {
            return Err(AnalysisError::ValidationFailed {
                field: "limits.ner_text_limit".to_string(),
                reason: "NER text limit cannot exceed maximum text length".to_string(),
            });
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(AnalysisError::ValidationFailed {
                    field: "logging.level".to_string(),
                    reason: format!("Unknown log level: {}", other),
                });
            }
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
            limits: LimitsConfig {
                max_text_length: 500_000,
                ner_text_limit: 50_000,
            },
            analysis: AnalysisConfig {
                enable_generic_ner: true,
                enable_language_detection: true,
            },
        }
    }
}

/// Initialize logging and tracing for host applications
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(&config.level).map_err(|_| AnalysisError::Config {
        message: format!("Invalid log level: {}", config.level),
    })?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_text_length() {
        let mut config = Config::default();
        config.limits.max_text_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let serialized = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.limits.max_text_length, config.limits.max_text_length);
    }
}
