//! Severity levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{LogError, LogResult};

/// Log severity, ordered from least to most severe
///
/// A sink with floor `f` accepts every event whose severity is `>= f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Noisiest level, below debug
    Silly,
    /// Debug level
    Debug,
    /// Verbose level, between debug and info
    Verbose,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl Severity {
    /// All levels, least severe first
    pub const ALL: [Self; 6] = [
        Self::Silly,
        Self::Debug,
        Self::Verbose,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Lower-case name (`"warn"`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silly => "silly",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Upper-case label used in rendered records (`"WARN"`)
    pub const fn label(self) -> &'static str {
        match self {
            Self::Silly => "SILLY",
            Self::Debug => "DEBUG",
            Self::Verbose => "VERBOSE",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Whether an event at `self` passes a sink whose floor is `floor`
    #[inline]
    pub fn passes(self, floor: Self) -> bool {
        self >= floor
    }

    /// True for levels more verbose than info
    #[inline]
    pub fn is_diagnostic(self) -> bool {
        self < Self::Info
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> LogResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silly" | "trace" => Ok(Self::Silly),
            "debug" => Ok(Self::Debug),
            "verbose" => Ok(Self::Verbose),
            "info" | "log" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Silly,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ordering_is_increasing_severity() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should be below {}", pair[0], pair[1]);
        }
    }

    #[rstest]
    #[case("silly", Severity::Silly)]
    #[case("DEBUG", Severity::Debug)]
    #[case(" verbose ", Severity::Verbose)]
    #[case("log", Severity::Info)]
    #[case("warning", Severity::Warn)]
    #[case("error", Severity::Error)]
    fn test_parse(#[case] input: &str, #[case] expected: Severity) {
        assert_eq!(input.parse::<Severity>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            "loud".parse::<Severity>(),
            Err(LogError::InvalidLevel(s)) if s == "loud"
        ));
    }

    #[test]
    fn test_passes_floor() {
        assert!(Severity::Error.passes(Severity::Warn));
        assert!(Severity::Verbose.passes(Severity::Debug));
        assert!(!Severity::Debug.passes(Severity::Verbose));
        assert!(Severity::Info.passes(Severity::Info));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Verbose).unwrap();
        assert_eq!(json, "\"verbose\"");
        let back: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(back, Severity::Warn);
    }
}
