//! # gateway-log
//!
//! Tiered structured logging for gateway services.
//!
//! A small set of declarative [`LogOptions`] is resolved into a [`LogConfig`],
//! composed into an ordered list of sinks (a colorized console plus up to five
//! rotating JSON file tiers: `error`, `warn`, `info`, `combined`, `debug`) and
//! fronted by a [`Logger`] facade with contextual tagging and helpers for
//! MQTT, Redis, InfluxDB, connection monitoring and timing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gateway_log::prelude::*;
//!
//! let (mut logger, _guard) = gateway_log::init(LogOptions {
//!     file: Some(true),
//!     directory: Some("/var/log/gateway".into()),
//!     ..LogOptions::default()
//! });
//!
//! logger.set_context("Gateway");
//! logger.startup("Listening on :1883", Metadata::new());
//! logger.connection("Database", ConnectionStatus::Disconnected, None, Metadata::new());
//!
//! let poller = logger.child("Poller");
//! poller.info("cycle complete", metadata!(devices = 12));
//! ```
//!
//! Logging never fails and never exits the process: a log directory that
//! cannot be created only drops the file tiers, write errors stay inside
//! the sink workers.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
pub mod core;
mod event;
pub mod format;
pub mod layer;
mod level;
mod logger;
mod macros;
pub mod sink;
mod timing;
pub mod transport;
mod writer;

// Public API
pub use builder::{BUILDER_CONTEXT, LoggerBuilder, LoggerGuard};
pub use config::{
    DEFAULT_DATE_PATTERN, DEFAULT_DIRECTORY, DEFAULT_MAX_FILES, DEFAULT_MAX_SIZE, Environment,
    LogConfig, LogOptions, parse_size,
};
pub use crate::core::{LogError, LogResult};
pub use event::{ErrorDetail, LogEvent, MetaEntry, Metadata, RESERVED_FIELDS, Trace};
pub use layer::TransportLayer;
pub use level::Severity;
pub use logger::{ChildLogger, ConnectionStatus, Logger, domain};
pub use timing::{OperationTimer, Timed, TimedFuture};
pub use transport::{CaptureTransport, SharedTransport, SinkTransport, Transport};
pub use writer::RollingFile;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ChildLogger, ConnectionStatus, LogOptions, Logger, LoggerGuard, Metadata, Severity, Timed,
        Trace, init, init_from_env, metadata,
    };
}

/// Build a logger from partial options
///
/// Keep the returned guard alive for as long as records should be written.
pub fn init(options: LogOptions) -> (Logger, LoggerGuard) {
    LoggerBuilder::from_options(options).build()
}

/// Build a logger from `GATEWAY_LOG_*` environment variables
pub fn init_from_env() -> (Logger, LoggerGuard) {
    init(LogOptions::from_env())
}
