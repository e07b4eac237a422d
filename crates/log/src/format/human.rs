//! Human-readable console lines

use std::fmt::Write as _;

use super::{FULL_TIMESTAMP, SHORT_TIMESTAMP};
use crate::event::LogEvent;
#[cfg(feature = "ansi")]
use crate::level::Severity;

/// Console formatting rules
///
/// Production output is uncolored, carries a full date and renders metadata
/// on the same line; everywhere else the line is colored by severity, the
/// timestamp is time-of-day only and metadata is pretty-printed below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanFormat {
    production: bool,
    colors: bool,
}

impl HumanFormat {
    /// Formatting for the given environment
    pub fn new(production: bool) -> Self {
        Self {
            production,
            colors: cfg!(feature = "ansi") && !production,
        }
    }

    /// Override coloring (forced off when the `ansi` feature is disabled)
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = cfg!(feature = "ansi") && colors;
        self
    }

    /// Whether production rules apply
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// Whether records are colorized
    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Render one event
    pub fn render(&self, event: &LogEvent) -> String {
        let timestamp = if self.production {
            event.timestamp.format(FULL_TIMESTAMP)
        } else {
            event.timestamp.format(SHORT_TIMESTAMP)
        }
        .unwrap_or_default();

        let mut line = String::with_capacity(64 + event.message.len());
        let _ = write!(line, "{timestamp} {:<7}", event.severity.label());
        if let Some(context) = &event.context {
            let _ = write!(line, " [{context}]");
        }
        let _ = write!(line, " {}", event.message);

        let fields = event.metadata.flatten();
        if !fields.is_empty() {
            let rendered = if self.production {
                serde_json::to_string(&fields).map(|json| format!(" {json}"))
            } else {
                serde_json::to_string_pretty(&fields).map(|json| format!("\n{json}"))
            };
            if let Ok(rendered) = rendered {
                line.push_str(&rendered);
            }
        }

        if let Some(error) = &event.error {
            line.push('\n');
            line.push_str(error.text());
        }

        self.paint(line, event)
    }

    #[cfg(feature = "ansi")]
    fn paint(&self, line: String, event: &LogEvent) -> String {
        use colored::Colorize;

        if !self.colors {
            return line;
        }
        let line = line.as_str();
        let painted = match event.severity {
            Severity::Error => line.red(),
            Severity::Warn => line.yellow(),
            Severity::Info => line.green(),
            Severity::Verbose => line.cyan(),
            Severity::Debug => line.blue(),
            Severity::Silly => line.magenta(),
        };
        painted.to_string()
    }

    #[cfg(not(feature = "ansi"))]
    fn paint(&self, line: String, _event: &LogEvent) -> String {
        line
    }
}
