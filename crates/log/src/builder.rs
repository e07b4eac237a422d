//! Logger builder
//!
//! Resolves options, composes the sinks, starts the transport and hands back
//! a [`Logger`] plus the [`LoggerGuard`] that keeps the sink workers alive.

use std::io::{self, Write};
use std::sync::Arc;

use crate::config::{LogConfig, LogOptions};
use crate::event::{LogEvent, Metadata};
use crate::format::HumanFormat;
use crate::level::Severity;
use crate::logger::Logger;
use crate::sink::{Composition, DirectoryProvisioner, FsProvisioner, compose};
use crate::transport::{SinkTransport, TransportGuard};

/// Context used when replaying composition diagnostics
pub const BUILDER_CONTEXT: &str = "LoggerBuilder";

/// Logger builder
pub struct LoggerBuilder {
    config: LogConfig,
    provisioner: Box<dyn DirectoryProvisioner>,
}

impl std::fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Guard that keeps the logger alive
///
/// Dropping it flushes queued records and stops the sink workers; loggers
/// still alive afterwards silently stop writing.
#[derive(Debug)]
#[must_use = "dropping the guard stops all sink output"]
pub struct LoggerGuard {
    inner: Option<Box<Inner>>,
}

#[derive(Debug)]
struct Inner {
    _workers: TransportGuard,
    transport: Arc<SinkTransport>,
    diagnostics: Vec<String>,
}

impl LoggerBuilder {
    /// Builder from partial options
    #[must_use]
    pub fn from_options(options: LogOptions) -> Self {
        Self::from_config(options.resolve())
    }

    /// Builder from a resolved config
    #[must_use]
    pub fn from_config(config: LogConfig) -> Self {
        Self {
            config,
            provisioner: Box::new(FsProvisioner),
        }
    }

    /// Replace the directory-ensure effect
    #[must_use]
    pub fn provisioner(mut self, provisioner: impl DirectoryProvisioner + 'static) -> Self {
        self.provisioner = Box::new(provisioner);
        self
    }

    /// Resolved configuration
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Compose the sink list without starting anything
    pub fn compose(&self) -> Composition {
        compose(&self.config, self.provisioner.as_ref())
    }

    /// Start the transport
    ///
    /// Never fails: problems met during composition are logged as warnings
    /// through the new logger and kept on the guard.
    pub fn build(self) -> (Logger, LoggerGuard) {
        // the offset can only be read reliably before the sink workers exist
        crate::event::local_offset();

        let composition = self.compose();
        let (transport, workers) = SinkTransport::new(&composition);
        let transport = Arc::new(transport);
        let logger = Logger::new(transport.clone());

        if composition.console().is_some() {
            for diagnostic in &composition.diagnostics {
                logger.warn(diagnostic.as_str(), Some(BUILDER_CONTEXT), Metadata::new());
            }
        } else {
            let production = self.config.is_production();
            let _ = write_diagnostics(&composition, production, &mut io::stderr().lock());
        }

        let guard = LoggerGuard {
            inner: Some(Box::new(Inner {
                _workers: workers,
                transport,
                diagnostics: composition.diagnostics,
            })),
        };
        (logger, guard)
    }
}

/// Render diagnostics as console lines for hosts without a console sink
fn write_diagnostics(
    composition: &Composition,
    production: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    let format = HumanFormat::new(production).with_colors(false);
    for diagnostic in &composition.diagnostics {
        let event = LogEvent::new(Severity::Warn, diagnostic.as_str())
            .with_context(Some(BUILDER_CONTEXT));
        writeln!(out, "{}", format.render(&event))?;
    }
    out.flush()
}

impl LoggerGuard {
    /// Guard that owns nothing
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Problems met while composing the sinks
    pub fn diagnostics(&self) -> &[String] {
        self.inner
            .as_ref()
            .map(|inner| inner.diagnostics.as_slice())
            .unwrap_or_default()
    }

    /// The running transport, unless this is a no-op guard
    pub fn transport(&self) -> Option<&Arc<SinkTransport>> {
        self.inner.as_ref().map(|inner| &inner.transport)
    }
}
