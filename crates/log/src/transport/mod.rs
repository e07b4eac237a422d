//! Transport backends
//!
//! A [`Transport`] receives every [`LogEvent`] the facades produce and owns
//! the physical output. Facades hold it as a [`SharedTransport`], so a logger
//! and all of its children write through the same sinks.
//!
//! - [`SinkTransport`]: the composed console and rotating-file sinks
//! - [`CaptureTransport`]: in-memory recording, for tests and embedding

mod capture;
mod sinks;

use std::sync::Arc;

use crate::event::LogEvent;

pub use capture::CaptureTransport;
pub use sinks::{SinkTransport, TransportGuard};

/// Receiver of log events
///
/// `dispatch` must not block on I/O and must not panic or surface write
/// failures: logging is a best-effort side channel.
pub trait Transport: Send + Sync {
    /// Route one event to every sink that accepts its severity
    fn dispatch(&self, event: &LogEvent);
}

/// Shared handle to a transport
pub type SharedTransport = Arc<dyn Transport>;
