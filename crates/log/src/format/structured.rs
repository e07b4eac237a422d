//! Structured JSON records for file sinks
//!
//! Every line is one self-contained JSON object with the field order
//! `timestamp`, `level`, `message`, `[context]`, `[...metadata]`, `[stack]`.
//! Downstream tooling parses these files, so field names and casing are a
//! stable contract.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::FULL_TIMESTAMP;
use crate::event::LogEvent;

/// Borrowed view of an event in record order
pub struct StructuredRecord<'a> {
    event: &'a LogEvent,
    timestamp: String,
}

impl<'a> StructuredRecord<'a> {
    /// Wrap an event
    pub fn new(event: &'a LogEvent) -> Self {
        Self {
            timestamp: event.timestamp.format(FULL_TIMESTAMP).unwrap_or_default(),
            event,
        }
    }
}

impl Serialize for StructuredRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.event.metadata.flatten();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("level", self.event.severity.label())?;
        map.serialize_entry("message", &self.event.message)?;
        if let Some(context) = &self.event.context {
            map.serialize_entry("context", context)?;
        }
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        if let Some(error) = &self.event.error {
            map.serialize_entry("stack", error.text())?;
        }
        map.end()
    }
}

/// Render an event as a single JSON line (no trailing newline)
pub fn render(event: &LogEvent) -> String {
    serde_json::to_string(&StructuredRecord::new(event)).unwrap_or_else(|e| {
        serde_json::json!({
            "timestamp": event.timestamp.format(FULL_TIMESTAMP).unwrap_or_default(),
            "level": event.severity.label(),
            "message": event.message,
            "formatError": e.to_string(),
        })
        .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ErrorDetail, Metadata};
    use crate::level::Severity;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use time::macros::datetime;

    #[test]
    fn test_field_order() {
        let event = LogEvent::new(Severity::Error, "write failed")
            .with_context(Some("InfluxDB"))
            .with_metadata(Metadata::new().with("bucket", "telemetry").with("points", 12))
            .with_error(Some(ErrorDetail::Stack("timeout".into())))
            .at(datetime!(2024-01-02 03:04:05 UTC));

        assert_eq!(
            render(&event),
            r#"{"timestamp":"2024-01-02 03:04:05","level":"ERROR","message":"write failed","context":"InfluxDB","bucket":"telemetry","points":12,"stack":"timeout"}"#
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let event = LogEvent::new(Severity::Info, "ready").at(datetime!(2024-01-02 03:04:05 UTC));
        let record: Value = serde_json::from_str(&render(&event)).unwrap();
        assert_eq!(
            record,
            json!({"timestamp": "2024-01-02 03:04:05", "level": "INFO", "message": "ready"})
        );
    }

    #[test]
    fn test_level_and_message_for_every_severity() {
        for severity in Severity::ALL {
            let message = format!("{severity} \"quoted\"\nline");
            let record: Value =
                serde_json::from_str(&render(&LogEvent::new(severity, message.clone()))).unwrap();
            assert_eq!(record["level"], json!(severity.as_str().to_uppercase()));
            assert_eq!(record["message"], json!(message));
        }
    }

    #[test]
    fn test_anonymous_object_keeps_insertion_order() {
        let event = LogEvent::new(Severity::Info, "m")
            .with_metadata(
                Metadata::new()
                    .with_value(json!({"zeta": 1, "alpha": 2}))
                    .with("data", json!({"topic": "a/b", "qos": 1})),
            )
            .at(datetime!(2024-01-02 03:04:05 UTC));

        assert_eq!(
            render(&event),
            r#"{"timestamp":"2024-01-02 03:04:05","level":"INFO","message":"m","zeta":1,"alpha":2,"data":{"topic":"a/b","qos":1}}"#
        );
    }

    #[test]
    fn test_single_line() {
        let event = LogEvent::new(Severity::Warn, "a\nb")
            .with_error(Some(ErrorDetail::Trace("x\ny".into())));
        assert!(!render(&event).contains('\n'));
    }
}
