//! Core types for logexport-core.
//!
//! This module defines the data model shared by every stage: the
//! [`ApiVersion`] and [`LogKind`] discriminants produced by classification,
//! the kind-independent [`CanonicalRecord`], the [`LogLine`] values nested
//! inside it, and the [`OutputRow`] the extractors fill in.

use serde::Serialize;
use serde_json::{Map, Value};

/// Wire-shape convention a raw record follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Fields nested under a `metadata` container (`metadata.labels`,
    /// `metadata.severity`, `metadata.timestamp`); log name under `log`.
    V1,
    /// Fields at top level (`logName`, `labels`, `severity`, `timestamp`)
    /// plus a `resource.labels` container.
    V2,
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::V1 => write!(f, "v1"),
            ApiVersion::V2 => write!(f, "v2"),
        }
    }
}

/// Semantic category of a log record, derived from the last segment of its
/// log name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Access,
    Activity,
    App,
    Crash,
    Request,
    Shutdown,
    Stderr,
    Stdout,
    Syslog,
    Unknown,
}

/// Log-name segment → kind. Anything not listed here is [`LogKind::Unknown`].
static LOG_KINDS: phf::Map<&'static str, LogKind> = phf::phf_map! {
    "access" => LogKind::Access,
    "activity" => LogKind::Activity,
    "app" => LogKind::App,
    "crash.log" => LogKind::Crash,
    "request_log" => LogKind::Request,
    "shutdown.log" => LogKind::Shutdown,
    "stderr" => LogKind::Stderr,
    "stdout" => LogKind::Stdout,
    "syslog" => LogKind::Syslog,
};

impl LogKind {
    /// Look up the kind for a single log-name segment such as `request_log`.
    pub fn from_segment(segment: &str) -> LogKind {
        LOG_KINDS.get(segment).copied().unwrap_or(LogKind::Unknown)
    }

    /// The log-name segment this kind is recognised by.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Access => "access",
            LogKind::Activity => "activity",
            LogKind::App => "app",
            LogKind::Crash => "crash.log",
            LogKind::Request => "request_log",
            LogKind::Shutdown => "shutdown.log",
            LogKind::Stderr => "stderr",
            LogKind::Stdout => "stdout",
            LogKind::Syslog => "syslog",
            LogKind::Unknown => "unknown log",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CanonicalRecord
// ---------------------------------------------------------------------------

/// Payload key holding the nested application log lines.
pub const LINE_KEY: &str = "line";

/// The kind-independent, request-log-shaped record every extractor reads.
///
/// Conceptually this is the `protoPayload` of a request log: a flat map of
/// request attributes (`ip`, `startTime`, `status`, `latency`, …) plus the
/// ordered `line` list of application log lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    payload: Map<String, Value>,
}

impl CanonicalRecord {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }

    /// Value at `key`, treating an explicit JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Insert `value` under `key` when present; `None` leaves the key unset.
    pub(crate) fn set_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.payload
                .insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: Value) {
        self.payload.insert(key.to_string(), value);
    }
}

// ---------------------------------------------------------------------------
// LogLine
// ---------------------------------------------------------------------------

/// One application log line nested inside a canonical record.
///
/// Every field of the incoming line map is kept verbatim, except that
/// `sourceLocation.line` is coerced to an integer when it arrives as a
/// numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogLine {
    fields: Map<String, Value>,
}

impl LogLine {
    /// Build a line from its three core attributes; `None`s are left out.
    pub fn new(time: Option<&str>, severity: Option<&str>, message: Option<&str>) -> Self {
        let mut fields = Map::new();
        for (key, value) in [("time", time), ("severity", severity), ("logMessage", message)] {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
        Self { fields }
    }

    /// Copy a raw line map, normalising `sourceLocation.line` on the way.
    pub fn from_map(raw: &Map<String, Value>) -> Self {
        let mut fields = raw.clone();
        if let Some(Value::Object(location)) = fields.get_mut("sourceLocation") {
            let coerced = match location.get("line") {
                Some(Value::String(line)) => line.trim().parse::<i64>().ok(),
                _ => None,
            };
            if let Some(line) = coerced {
                location.insert("line".to_string(), Value::from(line));
            }
        }
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Raw ISO-8601 timestamp of the line.
    pub fn time(&self) -> Option<&str> {
        self.fields.get("time").and_then(Value::as_str)
    }

    /// Severity name, e.g. `"WARNING"`.
    pub fn severity(&self) -> Option<&str> {
        self.fields.get("severity").and_then(Value::as_str)
    }

    /// Free-text message body.
    pub fn log_message(&self) -> Option<&str> {
        self.fields.get("logMessage").and_then(Value::as_str)
    }

    pub fn source_file(&self) -> Option<&str> {
        self.source_location()?.get("file").and_then(Value::as_str)
    }

    pub fn source_line(&self) -> Option<i64> {
        self.source_location()?.get("line").and_then(Value::as_i64)
    }

    fn source_location(&self) -> Option<&Map<String, Value>> {
        self.fields.get("sourceLocation").and_then(Value::as_object)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

// ---------------------------------------------------------------------------
// OutputRow
// ---------------------------------------------------------------------------

/// One flat analytics row: column name → scalar or repeated-record value.
///
/// Columns without a contributed value are absent rather than `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputRow {
    columns: Map<String, Value>,
}

impl OutputRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Write a column, returning the previous value if there was one.
    pub fn set(&mut self, column: &str, value: Value) -> Option<Value> {
        self.columns.insert(column.to_string(), value)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    /// Append one entry to a repeated column, creating the list on first use.
    pub fn push(&mut self, column: &str, entry: Value) {
        match self.columns.get_mut(column) {
            Some(Value::Array(entries)) => entries.push(entry),
            _ => {
                self.columns
                    .insert(column.to_string(), Value::Array(vec![entry]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.columns
    }

    pub fn into_columns(self) -> Map<String, Value> {
        self.columns
    }
}

// ---------------------------------------------------------------------------
// Extraction result
// ---------------------------------------------------------------------------

/// Something unexpected but recoverable noticed while building a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// A unique-occurrence event-log key appeared more than once; the last
    /// value was kept.
    DuplicateUniqueKey { key: String, column: String },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::DuplicateUniqueKey { key, column } => {
                write!(f, "duplicate unique-occurrence key {key} (column {column})")
            }
        }
    }
}

/// The row built for one record plus any anomalies raised along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub row: OutputRow,
    pub anomalies: Vec<Anomaly>,
}
