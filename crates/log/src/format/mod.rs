//! Format pipelines
//!
//! Two strategies turn a [`LogEvent`] into one output record:
//! - [`HumanFormat`] for the interactive console
//! - [`structured`] single-line JSON for files, the durable on-disk contract

mod date;
mod human;
pub mod structured;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::event::LogEvent;

pub use date::DatePattern;
pub use human::HumanFormat;

/// `YYYY-MM-DD HH:mm:ss`
pub(crate) const FULL_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// `HH:mm:ss`
pub(crate) const SHORT_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

/// Serialization strategy bound to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPipeline {
    /// Human-readable line (console)
    Human(HumanFormat),
    /// One JSON object per line (files)
    Structured,
}

impl FormatPipeline {
    /// Render one event, without a trailing newline
    pub fn render(&self, event: &LogEvent) -> String {
        match self {
            Self::Human(format) => format.render(event),
            Self::Structured => structured::render(event),
        }
    }
}
