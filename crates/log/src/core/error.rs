//! Error handling for gateway-log
//!
//! Errors only surface from parsing helpers (levels, sizes, date patterns) and
//! from the directory-ensure effect. Everything on the logging hot path
//! swallows failures instead of returning them.

use std::path::PathBuf;

/// Result alias for logging operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors produced while configuring the logger
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// Severity name is not one of the known levels
    #[error("Invalid level '{0}': expected one of silly, debug, verbose, info, warn, error")]
    InvalidLevel(String),

    /// Size string could not be parsed (e.g. "10XB")
    #[error("Invalid size '{0}': expected a number with an optional k/m/g suffix")]
    InvalidSize(String),

    /// Date pattern renders to nothing usable in a file name
    #[error("Invalid date pattern '{pattern}': {reason}")]
    InvalidDatePattern {
        /// Pattern as configured
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// Log directory could not be provisioned
    #[error("Failed to create log directory '{}': {source}", path.display())]
    Directory {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
