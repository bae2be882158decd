//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the contract analysis engine. The analyzers
//! themselves never fail on malformed contract text (they degrade to empty or
//! conservative results); errors here cover configuration and host plumbing.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from configuration loading and serialization
//! - **Output**: Structured error types with context
//! - **Error Categories**: Configuration, I/O, Serialization, Generic

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for the contract analysis engine
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnalysisError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            AnalysisError::Config { .. } | AnalysisError::ValidationFailed { .. } => {
                "configuration"
            }
            AnalysisError::Io(_) => "io",
            AnalysisError::Json(_) | AnalysisError::Toml(_) => "serialization",
            AnalysisError::Internal { .. } => "generic",
        }
    }
}

/// Helper macro for internal errors
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::AnalysisError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::AnalysisError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}
