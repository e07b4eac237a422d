//! Logging facade
//!
//! [`Logger`] is the per-call API: severity methods plus the gateway's
//! domain helpers (see [`domain`]). Each call builds one [`LogEvent`] and hands
//! it to the shared transport; nothing here blocks on I/O or returns errors.
//!
//! A logger owns its fallback context. Changing it takes `&mut self`, so a
//! logger cannot be re-contextualized while other threads log through it;
//! clone it (or call [`Logger::scoped`]) to get an independent instance over
//! the same sinks.

mod child;
pub mod domain;

use std::fmt;

use crate::event::{ErrorDetail, LogEvent, Metadata, Trace};
use crate::level::Severity;
use crate::transport::{SharedTransport, Transport};

pub use child::ChildLogger;
pub use domain::ConnectionStatus;

/// Contextual logging facade over a shared transport
#[derive(Clone)]
pub struct Logger {
    transport: SharedTransport,
    context: Option<String>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Logger without a fallback context
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            transport,
            context: None,
        }
    }

    /// Set the fallback context, builder style
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Replace the fallback context used when a call passes none
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    /// Current fallback context
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Fresh logger over the same transport with its own context
    #[must_use]
    pub fn scoped(&self, context: impl Into<String>) -> Self {
        Self::new(self.transport.clone()).with_context(context)
    }

    /// Shared transport handle
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Child logger permanently bound to `context`
    ///
    /// The child writes through the same transport but only offers the
    /// severity methods.
    pub fn child(&self, context: impl Into<String>) -> ChildLogger {
        ChildLogger::new(self.transport.clone(), context)
    }

    /// Emit at an explicit severity
    pub fn emit(
        &self,
        severity: Severity,
        message: impl Into<String>,
        context: Option<&str>,
        meta: Metadata,
    ) {
        let context = context.or(self.context.as_deref());
        dispatch(&*self.transport, severity, message.into(), context, meta, None);
    }

    /// Info-level entry point (alias of [`info`](Self::info))
    pub fn log(&self, message: impl Into<String>, context: Option<&str>, meta: Metadata) {
        self.emit(Severity::Info, message, context, meta);
    }

    /// Info
    pub fn info(&self, message: impl Into<String>, context: Option<&str>, meta: Metadata) {
        self.emit(Severity::Info, message, context, meta);
    }

    /// Warn
    pub fn warn(&self, message: impl Into<String>, context: Option<&str>, meta: Metadata) {
        self.emit(Severity::Warn, message, context, meta);
    }

    /// Debug
    pub fn debug(&self, message: impl Into<String>, context: Option<&str>, meta: Metadata) {
        self.emit(Severity::Debug, message, context, meta);
    }

    /// Verbose
    pub fn verbose(&self, message: impl Into<String>, context: Option<&str>, meta: Metadata) {
        self.emit(Severity::Verbose, message, context, meta);
    }

    /// Error, with an optional trace
    ///
    /// A [`Trace::Error`] contributes its stack text; a non-empty
    /// [`Trace::Text`] is kept as a raw trace string.
    pub fn error(
        &self,
        message: impl Into<String>,
        trace: Option<Trace>,
        context: Option<&str>,
        meta: Metadata,
    ) {
        let context = context.or(self.context.as_deref());
        let detail = trace.and_then(Trace::into_detail);
        dispatch(&*self.transport, Severity::Error, message.into(), context, meta, detail);
    }
}

pub(crate) fn dispatch(
    transport: &dyn Transport,
    severity: Severity,
    message: String,
    context: Option<&str>,
    meta: Metadata,
    error: Option<ErrorDetail>,
) {
    let event = LogEvent::new(severity, message)
        .with_context(context)
        .with_metadata(meta)
        .with_error(error);
    transport.dispatch(&event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::CaptureTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn logger() -> (Arc<CaptureTransport>, Logger) {
        let capture = Arc::new(CaptureTransport::new());
        (capture.clone(), Logger::new(capture))
    }

    #[test]
    fn test_severity_methods() {
        let (capture, logger) = logger();
        logger.log("a", None, Metadata::new());
        logger.info("b", None, Metadata::new());
        logger.warn("c", None, Metadata::new());
        logger.debug("d", None, Metadata::new());
        logger.verbose("e", None, Metadata::new());
        logger.error("f", None, None, Metadata::new());

        let severities: Vec<Severity> = capture.events().iter().map(|e| e.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Info,
                Severity::Info,
                Severity::Warn,
                Severity::Debug,
                Severity::Verbose,
                Severity::Error,
            ]
        );
    }

    #[test]
    fn test_context_fallback_and_override() {
        let (capture, mut logger) = logger();
        logger.info("none", None, Metadata::new());
        logger.set_context("Gateway");
        logger.info("fallback", None, Metadata::new());
        logger.info("explicit", Some("Poller"), Metadata::new());

        let contexts: Vec<Option<String>> =
            capture.events().into_iter().map(|e| e.context).collect();
        assert_eq!(
            contexts,
            vec![None, Some("Gateway".into()), Some("Poller".into())]
        );
    }

    #[test]
    fn test_metadata_is_carried() {
        let (capture, logger) = logger();
        logger.warn(
            "queue filling",
            None,
            Metadata::new().with("depth", 900).with_value(json!({"limit": 1000})),
        );
        let fields = capture.last().unwrap().metadata.flatten();
        assert_eq!(fields["depth"], json!(900));
        assert_eq!(fields["limit"], json!(1000));
    }

    #[test]
    fn test_error_with_error_value_keeps_stack() {
        let (capture, logger) = logger();
        let err = std::io::Error::other("broken pipe");
        logger.error("send failed", Some(Trace::from_error(&err)), None, Metadata::new());
        assert_eq!(
            capture.last().unwrap().error,
            Some(ErrorDetail::Stack("broken pipe".into()))
        );
    }

    #[test]
    fn test_error_with_stack_text_is_not_display() {
        #[derive(Debug)]
        struct Traced;
        impl fmt::Display for Traced {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("display message")
            }
        }

        let stack = "Traced\n    at poll (src/poll.rs:10)";
        let (capture, logger) = logger();
        logger.error("poll failed", Some(Trace::stack(stack)), None, Metadata::new());

        let detail = capture.last().unwrap().error.unwrap();
        assert_eq!(detail, ErrorDetail::Stack(stack.into()));
        assert_ne!(detail.text(), Traced.to_string());
    }

    #[test]
    fn test_error_with_trace_string() {
        let (capture, logger) = logger();
        logger.error("bad frame", Some("at decode:42".into()), None, Metadata::new());
        logger.error("bad frame", Some("  ".into()), None, Metadata::new());

        let events = capture.events();
        assert_eq!(events[0].error, Some(ErrorDetail::Trace("at decode:42".into())));
        assert_eq!(events[1].error, None);
    }

    #[test]
    fn test_anyhow_trace_includes_chain() {
        let (capture, logger) = logger();
        let err = anyhow::anyhow!("disk full").context("flush failed");
        logger.error("write", Some((&err).into()), None, Metadata::new());

        let detail = capture.last().unwrap().error.unwrap();
        assert!(detail.text().starts_with("flush failed"));
        assert!(detail.text().contains("disk full"));
    }

    #[test]
    fn test_scoped_is_independent() {
        let (capture, mut logger) = logger();
        logger.set_context("Parent");
        let mut scoped = logger.scoped("Worker");
        scoped.set_context("Worker-2");
        logger.info("from parent", None, Metadata::new());
        scoped.info("from worker", None, Metadata::new());

        let events = capture.events();
        assert_eq!(events[0].context.as_deref(), Some("Parent"));
        assert_eq!(events[1].context.as_deref(), Some("Worker-2"));
    }

    #[test]
    fn test_concurrent_clones_keep_their_context() {
        let (capture, logger) = logger();
        std::thread::scope(|s| {
            for worker in 0..4 {
                let mut local = logger.clone();
                s.spawn(move || {
                    local.set_context(format!("worker-{worker}"));
                    for _ in 0..25 {
                        local.info(format!("tick {worker}"), None, Metadata::new());
                    }
                });
            }
        });

        let events = capture.events();
        assert_eq!(events.len(), 100);
        for event in events {
            let worker = event.message.trim_start_matches("tick ");
            assert_eq!(event.context, Some(format!("worker-{worker}")));
        }
    }
}
