//! Log events and their structured payload

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use time::{OffsetDateTime, UtcOffset};

use crate::level::Severity;

/// Field names owned by the structured record; metadata cannot overwrite them
pub const RESERVED_FIELDS: [&str; 5] = ["timestamp", "level", "message", "context", "stack"];

/// One auxiliary value attached to a log call
#[derive(Debug, Clone, PartialEq)]
pub enum MetaEntry {
    /// Named field
    Field(String, Value),
    /// Anonymous value; objects are merged, anything else is keyed by position
    Value(Value),
}

/// Ordered structured metadata for a single log call
///
/// Entries keep insertion order all the way into the structured record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<MetaEntry>,
}

impl Metadata {
    /// Empty metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named field
    ///
    /// A value that fails to serialize is recorded as a placeholder string
    /// so the log call itself never fails.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an anonymous value
    #[must_use]
    pub fn with_value(mut self, value: impl Serialize) -> Self {
        self.push(value);
        self
    }

    /// Add a named field in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) {
        self.entries
            .push(MetaEntry::Field(key.into(), to_value_lossy(value)));
    }

    /// Add an anonymous value in place
    pub fn push(&mut self, value: impl Serialize) {
        self.entries.push(MetaEntry::Value(to_value_lossy(value)));
    }

    /// Append all entries of `other`, keeping their order
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Whether no entries were supplied
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    /// Flatten into top-level fields
    ///
    /// Named fields and the members of anonymous objects are merged in order;
    /// a repeated key keeps its first position and takes the latest value.
    /// Other anonymous values are keyed by their position (`"0"`, `"1"`, ...).
    /// Reserved record fields are skipped.
    pub fn flatten(&self) -> IndexMap<String, Value> {
        let mut fields = IndexMap::with_capacity(self.entries.len());
        for (position, entry) in self.entries.iter().enumerate() {
            match entry {
                MetaEntry::Field(key, value) => put(&mut fields, key.clone(), value.clone()),
                MetaEntry::Value(Value::Object(map)) => {
                    for (key, value) in map {
                        put(&mut fields, key.clone(), value.clone());
                    }
                }
                MetaEntry::Value(value) => put(&mut fields, position.to_string(), value.clone()),
            }
        }
        fields
    }
}

fn put(fields: &mut IndexMap<String, Value>, key: String, value: Value) {
    if !RESERVED_FIELDS.contains(&key.as_str()) {
        fields.insert(key, value);
    }
}

fn to_value_lossy(value: impl Serialize) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")))
}

impl<K: Into<String>, V: Serialize> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Self::new();
        for (key, value) in iter {
            meta.insert(key, value);
        }
        meta
    }
}

/// Error detail attached to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Stack text extracted from an error value
    Stack(String),
    /// Caller-supplied, pre-formatted trace string
    Trace(String),
}

impl ErrorDetail {
    /// Text rendered as the record's `stack`
    pub fn text(&self) -> &str {
        match self {
            Self::Stack(text) | Self::Trace(text) => text,
        }
    }
}

/// Trace argument accepted by the `error` methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    /// Stack text taken from an error value
    Error(String),
    /// Free-form trace string
    Text(String),
}

impl Trace {
    /// Build the stack text of an error: its message followed by each source
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut stack = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            let _ = write!(stack, "\n    caused by: {cause}");
            source = cause.source();
        }
        Self::Error(stack)
    }

    /// Stack text supplied directly by the caller's error type
    pub fn stack(text: impl Into<String>) -> Self {
        Self::Error(text.into())
    }

    pub(crate) fn into_detail(self) -> Option<ErrorDetail> {
        match self {
            Self::Error(stack) => Some(ErrorDetail::Stack(stack)),
            Self::Text(text) if text.trim().is_empty() => None,
            Self::Text(text) => Some(ErrorDetail::Trace(text)),
        }
    }
}

impl From<&anyhow::Error> for Trace {
    /// Uses anyhow's debug rendering: the cause chain plus a backtrace when captured
    fn from(error: &anyhow::Error) -> Self {
        Self::Error(format!("{error:?}"))
    }
}

impl From<&str> for Trace {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Trace {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Canonical record produced by every logging call
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Severity
    pub severity: Severity,
    /// Message text
    pub message: String,
    /// Context tag, if any
    pub context: Option<String>,
    /// Ordered structured metadata
    pub metadata: Metadata,
    /// Attached error detail
    pub error: Option<ErrorDetail>,
    /// Creation time
    pub timestamp: OffsetDateTime,
}

impl LogEvent {
    /// New event stamped with the current local time
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            context: None,
            metadata: Metadata::new(),
            error: None,
            timestamp: now(),
        }
    }

    /// Set the context tag
    #[must_use]
    pub fn with_context(mut self, context: Option<impl Into<String>>) -> Self {
        self.context = context.map(Into::into);
        self
    }

    /// Set the metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach error detail
    #[must_use]
    pub fn with_error(mut self, error: Option<ErrorDetail>) -> Self {
        self.error = error;
        self
    }

    /// Override the timestamp
    #[must_use]
    pub fn at(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Local UTC offset, read once per process
///
/// The platform offset can only be read safely while the process is
/// single-threaded, so it is captured on first use (the builder does this
/// before any sink worker starts) and falls back to UTC when unavailable.
pub(crate) fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// Current time in the captured local offset
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}
