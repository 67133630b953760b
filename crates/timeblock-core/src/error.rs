//! Core error types for timeblock-core.
//!
//! Only malformed inputs are errors. Capacity exhaustion, unparseable events
//! and days without a usable window are recovered locally and logged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeblock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No platform config directory
    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Range boundary that does not parse in the user's time zone
    #[error("Invalid range {field}: '{value}' is not a valid timestamp")]
    InvalidRange { field: &'static str, value: String },

    /// Unknown IANA time zone name
    #[error("Unknown time zone: '{0}'")]
    InvalidTimeZone(String),

    /// Zero or negative duration on a task or habit
    #[error("Duration for '{id}' must be positive, got {minutes} minutes")]
    NonPositiveDuration { id: String, minutes: i64 },

    /// Task priority outside 1..=3
    #[error("Priority for task '{id}' must be 1, 2 or 3, got {priority}")]
    InvalidPriority { id: String, priority: u8 },
}

impl CoreError {
    /// Returns the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
