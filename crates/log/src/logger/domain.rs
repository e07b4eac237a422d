//! Gateway-specific convenience methods
//!
//! Thin wrappers over the severity methods with fixed contexts and message
//! templates. They exist only on [`Logger`], not on child loggers.

use std::fmt;

use serde::Serialize;

use super::Logger;
use crate::event::Metadata;
use crate::level::Severity;

/// Context used by [`Logger::mqtt`]
pub const MQTT_CONTEXT: &str = "MQTT";
/// Context used by [`Logger::redis`]
pub const REDIS_CONTEXT: &str = "Redis";
/// Context used by [`Logger::influxdb`]
pub const INFLUXDB_CONTEXT: &str = "InfluxDB";
/// Context used by [`Logger::startup`]
pub const STARTUP_CONTEXT: &str = "Bootstrap";
/// Context used by [`Logger::connection`]
pub const CONNECTION_CONTEXT: &str = "ConnectionMonitor";

/// Startup message prefix
pub const STARTUP_MARKER: &str = "🚀";

/// State reported by [`Logger::connection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Link established
    Connected,
    /// Link lost or closed
    Disconnected,
    /// Link failed
    Error,
}

impl ConnectionStatus {
    /// Severity the status is logged at
    pub const fn severity(self) -> Severity {
        match self {
            Self::Connected => Severity::Info,
            Self::Disconnected => Severity::Warn,
            Self::Error => Severity::Error,
        }
    }

    /// Marker prefixed to the message
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Connected => "✅",
            Self::Disconnected => "🔌",
            Self::Error => "❌",
        }
    }

    /// Lower-case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Logger {
    /// MQTT broker activity; `data` is attached as the `data` field
    pub fn mqtt(&self, level: Severity, message: impl Into<String>, data: impl Serialize) {
        self.service(MQTT_CONTEXT, level, message.into(), data);
    }

    /// Redis activity; `data` is attached as the `data` field
    pub fn redis(&self, level: Severity, message: impl Into<String>, data: impl Serialize) {
        self.service(REDIS_CONTEXT, level, message.into(), data);
    }

    /// InfluxDB activity; `data` is attached as the `data` field
    pub fn influxdb(&self, level: Severity, message: impl Into<String>, data: impl Serialize) {
        self.service(INFLUXDB_CONTEXT, level, message.into(), data);
    }

    fn service(&self, context: &str, level: Severity, message: String, data: impl Serialize) {
        self.emit(level, message, Some(context), Metadata::new().with("data", data));
    }

    /// Timing of an operation, at debug
    ///
    /// `operation` and `duration` (milliseconds) are always attached as
    /// fields so they can be aggregated downstream.
    pub fn performance(
        &self,
        operation: &str,
        duration_ms: f64,
        context: Option<&str>,
        meta: Metadata,
    ) {
        let mut fields = Metadata::new()
            .with("operation", operation)
            .with("duration", duration_ms);
        fields.extend(meta);
        self.emit(
            Severity::Debug,
            format!("{operation} completed in {duration_ms}ms"),
            context,
            fields,
        );
    }

    /// Bootstrap progress, at info
    pub fn startup(&self, message: impl AsRef<str>, meta: Metadata) {
        self.emit(
            Severity::Info,
            format!("{STARTUP_MARKER} {}", message.as_ref()),
            Some(STARTUP_CONTEXT),
            meta,
        );
    }

    /// Connection state change of an external service
    ///
    /// Logged at error, warn or info depending on `status`.
    pub fn connection(
        &self,
        service: &str,
        status: ConnectionStatus,
        message: Option<&str>,
        meta: Metadata,
    ) {
        let mut text = format!("{} {service} {status}", status.marker());
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            text.push_str(": ");
            text.push_str(message);
        }

        let mut fields = Metadata::new()
            .with("service", service)
            .with("status", status);
        fields.extend(meta);
        self.emit(status.severity(), text, Some(CONNECTION_CONTEXT), fields);
    }

    /// Batch processing summary, at debug
    pub fn data_processing(
        &self,
        operation: &str,
        count: usize,
        context: Option<&str>,
        meta: Metadata,
    ) {
        let mut fields = Metadata::new()
            .with("operation", operation)
            .with("count", count);
        fields.extend(meta);
        self.emit(
            Severity::Debug,
            format!("Processed {count} items in {operation}"),
            context,
            fields,
        );
    }
}
