//! In-memory transport
//!
//! [`CaptureTransport`] records every event it accepts, for assertions in
//! tests and for hosts that want to inspect log output programmatically.

use parking_lot::Mutex;

use super::Transport;
use crate::event::LogEvent;
use crate::level::Severity;

/// Transport that keeps every accepted event in memory
#[derive(Debug, Default)]
pub struct CaptureTransport {
    floor: Option<Severity>,
    events: Mutex<Vec<LogEvent>>,
}

impl CaptureTransport {
    /// Record everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record only events at or above `floor`
    #[must_use]
    pub fn with_floor(floor: Severity) -> Self {
        Self {
            floor: Some(floor),
            events: Mutex::default(),
        }
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// Remove and return recorded events
    pub fn take(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Most recent event
    pub fn last(&self) -> Option<LogEvent> {
        self.events.lock().last().cloned()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Transport for CaptureTransport {
    fn dispatch(&self, event: &LogEvent) {
        if self.floor.is_none_or(|floor| event.severity.passes(floor)) {
            self.events.lock().push(event.clone());
        }
    }
}
