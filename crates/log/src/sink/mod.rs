//! Sink descriptors and composition
//!
//! A sink is one output destination with its own severity floor, format
//! pipeline and, for files, rotation policy. [`compose`] turns a resolved
//! [`LogConfig`](crate::LogConfig) into the ordered sink list; the list is
//! fixed for the lifetime of the transport built from it.

mod compose;
mod provision;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::format::FormatPipeline;
use crate::level::Severity;

pub use compose::{Composition, compose};
pub use provision::{DirectoryProvisioner, FsProvisioner};

/// Placeholder replaced by the rendered date pattern in file names
pub const DATE_PLACEHOLDER: &str = "%DATE%";

/// Severity-aligned file family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Errors only, kept twice as long
    Error,
    /// Warnings and above
    Warn,
    /// Info and above
    Info,
    /// Everything at or above the configured floor
    Combined,
    /// Debug and above
    Debug,
}

impl Tier {
    /// File family name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Combined => "combined",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation parameters of a file sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRotation {
    /// File family
    pub tier: Tier,
    /// Directory holding the family
    pub directory: PathBuf,
    /// File name with a [`DATE_PLACEHOLDER`], e.g. `error-%DATE%.log`
    pub filename: String,
    /// Date pattern substituted into the file name
    pub date_pattern: String,
    /// Size limit per file, unparsed
    pub max_size: String,
    /// Rotated files retained
    pub max_files: usize,
    /// Gzip files as they rotate out
    pub compress: bool,
}

impl FileRotation {
    /// File name for a rendered date
    pub fn file_name(&self, date: &str) -> String {
        self.filename.replace(DATE_PLACEHOLDER, date)
    }

    /// Full path for a rendered date
    pub fn path_for(&self, date: &str) -> PathBuf {
        self.directory.join(self.file_name(date))
    }

    /// Directory holding the family
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Destination of a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    /// Interactive console (stdout)
    Console,
    /// Date- and size-rotated file
    RotatingFile(FileRotation),
}

/// One composed output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkDescriptor {
    /// Where records go
    pub kind: SinkKind,
    /// Minimum severity accepted
    pub floor: Severity,
    /// How records are serialized
    pub format: FormatPipeline,
}

impl SinkDescriptor {
    /// Whether this sink accepts an event of `severity`
    #[inline]
    pub fn accepts(&self, severity: Severity) -> bool {
        severity.passes(self.floor)
    }

    /// Rotation parameters, for file sinks
    pub fn rotation(&self) -> Option<&FileRotation> {
        match &self.kind {
            SinkKind::RotatingFile(rotation) => Some(rotation),
            SinkKind::Console => None,
        }
    }

    /// Tier, for file sinks
    pub fn tier(&self) -> Option<Tier> {
        self.rotation().map(|rotation| rotation.tier)
    }

    /// Whether this is the console sink
    pub fn is_console(&self) -> bool {
        matches!(self.kind, SinkKind::Console)
    }
}
