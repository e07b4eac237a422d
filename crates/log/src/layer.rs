//! Bridge from `tracing` into the composed sinks
//!
//! Install [`TransportLayer`] in the host's subscriber to have ordinary
//! `tracing` events (from the application or its dependencies) land in the
//! same console and file tiers as facade calls.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::event::{ErrorDetail, Metadata, Trace};
use crate::level::Severity;
use crate::logger::dispatch;
use crate::transport::SharedTransport;

/// Field name treated as the context tag when present on an event
pub const CONTEXT_FIELD: &str = "context";

/// `tracing` layer forwarding events to a transport
///
/// Level maps to severity (`TRACE` → silly), the `context` field or else the
/// event target becomes the context, `message` becomes the message and the
/// remaining fields become metadata in recording order.
pub struct TransportLayer {
    transport: SharedTransport,
    floor: Severity,
}

impl fmt::Debug for TransportLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportLayer")
            .field("floor", &self.floor)
            .finish_non_exhaustive()
    }
}

impl TransportLayer {
    /// Forward every event
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            transport,
            floor: Severity::Silly,
        }
    }

    /// Drop events below `floor` before they reach the transport
    #[must_use]
    pub fn with_floor(mut self, floor: Severity) -> Self {
        self.floor = floor;
        self
    }
}

impl<S> Layer<S> for TransportLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Severity::from(*metadata.level());
        if !severity.passes(self.floor) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let context = visitor
            .context
            .unwrap_or_else(|| metadata.target().to_string());
        dispatch(
            &*self.transport,
            severity,
            visitor.message.unwrap_or_default(),
            Some(&context),
            visitor.meta,
            visitor.error,
        );
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    context: Option<String>,
    meta: Metadata,
    error: Option<ErrorDetail>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            CONTEXT_FIELD => self.context = Some(value.to_string()),
            name => self.meta.insert(name, value),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.meta.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.meta.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.meta.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.meta.insert(field.name(), value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.meta.insert(field.name(), value.to_string());
        if self.error.is_none() {
            self.error = Trace::from_error(value).into_detail();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}
