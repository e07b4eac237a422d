//! Configuration types
//!
//! [`LogOptions`] is the partial, declarative input (every field optional,
//! deserializable from any serde source). [`LogOptions::resolve`] applies the
//! defaults in one place and yields the immutable [`LogConfig`] the sink
//! composer works from.

mod presets;
mod size;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::level::Severity;

pub use size::parse_size;

/// Default log directory
pub const DEFAULT_DIRECTORY: &str = "logs";
/// Default number of retained files per tier
pub const DEFAULT_MAX_FILES: usize = 10;
/// Default size limit per file
pub const DEFAULT_MAX_SIZE: &str = "10MB";
/// Default rotation date pattern
pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD";

/// Deployment environment tag
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    /// Local development (the default)
    #[default]
    Development,
    /// Production: terse uncolored console, no debug file tier by default
    Production,
    /// Any other tag (staging, test, ...); treated like development
    Other(String),
}

impl Environment {
    /// Whether this is the production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Tag as written in configuration
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Environment {
    fn from(tag: String) -> Self {
        let trimmed = tag.trim();
        if trimmed.eq_ignore_ascii_case("production") {
            Self::Production
        } else if trimmed.eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Other(tag)
        }
    }
}

impl From<&str> for Environment {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial logging options, as supplied by the host application
///
/// Missing fields are filled in by [`resolve`](Self::resolve).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogOptions {
    /// Minimum severity (overall floor)
    pub level: Option<Severity>,
    /// Enable the console sink
    pub console: Option<bool>,
    /// Enable the rotating file sinks
    pub file: Option<bool>,
    /// Directory holding the rotated files
    pub directory: Option<PathBuf>,
    /// Rotated files retained per tier (the error tier keeps twice as many)
    pub max_files: Option<usize>,
    /// Size limit per file, e.g. `"10MB"`; passed through unvalidated
    pub max_size: Option<String>,
    /// Rotation date pattern, e.g. `"YYYY-MM-DD"`
    pub date_pattern: Option<String>,
    /// Gzip files when they are rotated out
    pub compress: Option<bool>,
    /// Environment tag
    pub environment: Option<Environment>,
}

impl LogOptions {
    /// Create empty options (everything defaulted on resolve)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply defaults and produce the immutable configuration
    #[must_use]
    pub fn resolve(self) -> LogConfig {
        LogConfig {
            level: self.level.unwrap_or(Severity::Info),
            console: self.console.unwrap_or(true),
            file: self.file.unwrap_or(false),
            directory: self
                .directory
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY)),
            max_files: self.max_files.unwrap_or(DEFAULT_MAX_FILES),
            max_size: self
                .max_size
                .unwrap_or_else(|| DEFAULT_MAX_SIZE.to_string()),
            date_pattern: self
                .date_pattern
                .unwrap_or_else(|| DEFAULT_DATE_PATTERN.to_string()),
            compress: self.compress.unwrap_or(true),
            environment: self.environment.unwrap_or_default(),
        }
    }
}

/// Fully resolved logging configuration
///
/// Constructed once at startup; the sink set derived from it never changes
/// for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum severity (overall floor)
    pub level: Severity,
    /// Console sink enabled
    pub console: bool,
    /// File sinks enabled
    pub file: bool,
    /// Directory holding the rotated files
    pub directory: PathBuf,
    /// Rotated files retained per tier
    pub max_files: usize,
    /// Size limit per file (unparsed)
    pub max_size: String,
    /// Rotation date pattern
    pub date_pattern: String,
    /// Gzip rotated files
    pub compress: bool,
    /// Environment tag
    pub environment: Environment,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogOptions::default().resolve()
    }
}

impl LogConfig {
    /// Whether the config targets production
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

impl From<LogOptions> for LogConfig {
    fn from(options: LogOptions) -> Self {
        options.resolve()
    }
}
