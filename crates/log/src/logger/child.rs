//! Child logger bound to a fixed context

use std::fmt;
use std::sync::Arc;

use super::dispatch;
use crate::event::{Metadata, Trace};
use crate::level::Severity;
use crate::transport::SharedTransport;

/// Reduced facade with an immutable context
///
/// Created by [`Logger::child`](super::Logger::child). Shares the parent's
/// transport, offers the severity methods only, and never observes later
/// context changes on the parent.
#[derive(Clone)]
pub struct ChildLogger {
    transport: SharedTransport,
    context: Arc<str>,
}

impl fmt::Debug for ChildLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildLogger")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl ChildLogger {
    pub(crate) fn new(transport: SharedTransport, context: impl Into<String>) -> Self {
        Self {
            transport,
            context: Arc::from(context.into()),
        }
    }

    /// The bound context
    pub fn context(&self) -> &str {
        &self.context
    }

    fn emit(&self, severity: Severity, message: String, meta: Metadata) {
        dispatch(&*self.transport, severity, message, Some(&*self.context), meta, None);
    }

    /// Info-level entry point
    pub fn log(&self, message: impl Into<String>, meta: Metadata) {
        self.emit(Severity::Info, message.into(), meta);
    }

    /// Info
    pub fn info(&self, message: impl Into<String>, meta: Metadata) {
        self.emit(Severity::Info, message.into(), meta);
    }

    /// Warn
    pub fn warn(&self, message: impl Into<String>, meta: Metadata) {
        self.emit(Severity::Warn, message.into(), meta);
    }

    /// Debug
    pub fn debug(&self, message: impl Into<String>, meta: Metadata) {
        self.emit(Severity::Debug, message.into(), meta);
    }

    /// Verbose
    pub fn verbose(&self, message: impl Into<String>, meta: Metadata) {
        self.emit(Severity::Verbose, message.into(), meta);
    }

    /// Error, with an optional trace
    pub fn error(&self, message: impl Into<String>, trace: Option<Trace>, meta: Metadata) {
        let detail = trace.and_then(Trace::into_detail);
        dispatch(
            &*self.transport,
            Severity::Error,
            message.into(),
            Some(&*self.context),
            meta,
            detail,
        );
    }
}
