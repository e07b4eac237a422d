//! Console and rotating-file transport

use std::io::{self, Write};

use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

use super::Transport;
use crate::event::LogEvent;
use crate::format::FormatPipeline;
use crate::level::Severity;
use crate::sink::{Composition, SinkDescriptor, SinkKind};
use crate::writer::RollingFile;

struct ActiveSink {
    descriptor: SinkDescriptor,
    writer: NonBlocking,
}

/// Transport writing to the composed sinks
///
/// Each sink gets its own non-blocking worker thread, so `dispatch` only
/// formats and enqueues. Every sink filters by its own floor independently.
pub struct SinkTransport {
    sinks: Vec<ActiveSink>,
    default_floor: Severity,
}

/// Keeps the sink workers alive; dropping it flushes pending records
#[must_use = "dropping the guard stops the sink workers"]
pub struct TransportGuard {
    workers: Vec<WorkerGuard>,
}

impl std::fmt::Debug for TransportGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportGuard")
            .field("workers", &self.workers.len())
            .finish()
    }
}

impl std::fmt::Debug for SinkTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkTransport")
            .field("sinks", &self.sinks.len())
            .field("default_floor", &self.default_floor)
            .finish()
    }
}

impl SinkTransport {
    /// Build from a composition
    pub fn new(composition: &Composition) -> (Self, TransportGuard) {
        Self::from_sinks(composition.sinks.clone(), composition.default_floor)
    }

    /// Build from explicit sink descriptors
    pub fn from_sinks(
        sinks: Vec<SinkDescriptor>,
        default_floor: Severity,
    ) -> (Self, TransportGuard) {
        let mut workers = Vec::with_capacity(sinks.len());
        let sinks = sinks
            .into_iter()
            .map(|descriptor| {
                let (writer, guard) = match &descriptor.kind {
                    SinkKind::Console => spawn("gateway-log-console", io::stdout()),
                    SinkKind::RotatingFile(rotation) => spawn(
                        &format!("gateway-log-{}", rotation.tier),
                        RollingFile::new(rotation.clone()),
                    ),
                };
                workers.push(guard);
                ActiveSink { descriptor, writer }
            })
            .collect();

        (
            Self {
                sinks,
                default_floor,
            },
            TransportGuard { workers },
        )
    }

    /// Sink descriptors, in precedence order
    pub fn sinks(&self) -> impl Iterator<Item = &SinkDescriptor> {
        self.sinks.iter().map(|sink| &sink.descriptor)
    }

    /// Overall floor this transport was built with
    pub fn default_floor(&self) -> Severity {
        self.default_floor
    }

    /// Whether any sink would accept `severity`
    pub fn enabled(&self, severity: Severity) -> bool {
        self.sinks.iter().any(|sink| sink.descriptor.accepts(severity))
    }
}

fn spawn<W: Write + Send + 'static>(name: &str, writer: W) -> (NonBlocking, WorkerGuard) {
    NonBlockingBuilder::default().thread_name(name).finish(writer)
}

impl Transport for SinkTransport {
    fn dispatch(&self, event: &LogEvent) {
        // structured records are identical across file tiers; render once
        let mut structured: Option<String> = None;

        for sink in &self.sinks {
            if !sink.descriptor.accepts(event.severity) {
                continue;
            }
            let line = match &sink.descriptor.format {
                FormatPipeline::Structured => structured
                    .get_or_insert_with(|| {
                        let mut line = FormatPipeline::Structured.render(event);
                        line.push('\n');
                        line
                    })
                    .clone(),
                human => {
                    let mut line = human.render(event);
                    line.push('\n');
                    line
                }
            };
            let mut writer = sink.writer.clone();
            // write failures stay inside the logging subsystem
            let _ = writer.write_all(line.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, LogOptions};
    use crate::sink::{FsProvisioner, Tier, compose};

    #[test]
    fn test_routes_by_floor() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogOptions {
            level: Some(Severity::Info),
            console: Some(false),
            file: Some(true),
            directory: Some(dir.path().to_path_buf()),
            environment: Some(Environment::Production),
            ..LogOptions::default()
        }
        .resolve();
        let composition = compose(&config, &FsProvisioner);
        let (transport, guard) = SinkTransport::new(&composition);

        assert!(transport.enabled(Severity::Info));
        assert!(!transport.enabled(Severity::Verbose));

        transport.dispatch(&LogEvent::new(Severity::Warn, "low battery"));
        transport.dispatch(&LogEvent::new(Severity::Debug, "dropped everywhere"));
        drop(guard);

        let read = |tier: Tier| -> String {
            let date = crate::format::DatePattern::default().render(crate::event::now());
            std::fs::read_to_string(dir.path().join(format!("{tier}-{date}.log")))
                .unwrap_or_default()
        };
        assert!(read(Tier::Warn).contains("\"low battery\""));
        assert!(read(Tier::Info).contains("\"level\":\"WARN\""));
        assert!(read(Tier::Combined).contains("low battery"));
        assert!(read(Tier::Error).is_empty());
        assert!(!read(Tier::Combined).contains("dropped"));
    }
}
