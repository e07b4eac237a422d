//! Configuration presets and environment loading

use std::path::PathBuf;
use std::str::FromStr;

use super::{Environment, LogConfig, LogOptions};
use crate::level::Severity;

impl LogOptions {
    /// Read options from `GATEWAY_LOG_*` environment variables
    ///
    /// Unset variables stay `None` so they default on resolve. Values that
    /// cannot be parsed are ignored with a warning rather than failing.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup("GATEWAY_LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .and_then(|raw| parse_or_warn("GATEWAY_LOG_LEVEL", &raw, Severity::from_str));

        Self {
            level,
            console: lookup("GATEWAY_LOG_CONSOLE")
                .and_then(|raw| parse_or_warn("GATEWAY_LOG_CONSOLE", &raw, parse_flag)),
            file: lookup("GATEWAY_LOG_FILE")
                .and_then(|raw| parse_or_warn("GATEWAY_LOG_FILE", &raw, parse_flag)),
            directory: lookup("GATEWAY_LOG_DIR").map(PathBuf::from),
            max_files: lookup("GATEWAY_LOG_MAX_FILES")
                .and_then(|raw| parse_or_warn("GATEWAY_LOG_MAX_FILES", &raw, |s| s.trim().parse())),
            max_size: lookup("GATEWAY_LOG_MAX_SIZE"),
            date_pattern: lookup("GATEWAY_LOG_DATE_PATTERN"),
            compress: lookup("GATEWAY_LOG_COMPRESS")
                .and_then(|raw| parse_or_warn("GATEWAY_LOG_COMPRESS", &raw, parse_flag)),
            environment: lookup("GATEWAY_ENV").map(Environment::from),
        }
    }
}

impl LogConfig {
    /// Development preset: debug floor, console plus files
    #[must_use]
    pub fn development() -> Self {
        LogOptions {
            level: Some(Severity::Debug),
            file: Some(true),
            environment: Some(Environment::Development),
            ..LogOptions::default()
        }
        .resolve()
    }

    /// Production preset: info floor, console plus files, no debug tier
    #[must_use]
    pub fn production() -> Self {
        LogOptions {
            level: Some(Severity::Info),
            file: Some(true),
            environment: Some(Environment::Production),
            ..LogOptions::default()
        }
        .resolve()
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("not a boolean: {other}")),
    }
}

fn parse_or_warn<T, E: std::fmt::Display>(
    key: &str,
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = raw, error = %e, "Ignoring invalid logging option");
            None
        }
    }
}
