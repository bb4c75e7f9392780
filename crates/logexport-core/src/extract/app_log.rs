//! App-log-line extractor.
//!
//! Reads the canonical record's `line` list into [`LogLine`]s (which the
//! event-log and bingo extractors then scan) and projects each one into an
//! `app_logs` entry.

use crate::codec::{decimal_value, parse_severity, timestamp_to_seconds};
use crate::schema::{FieldType, SchemaField};
use crate::types::{CanonicalRecord, LogLine, OutputRow, LINE_KEY};
use serde_json::{Map, Value};

pub const COLUMN: &str = "app_logs";

pub fn schema_fields() -> Vec<SchemaField> {
    vec![SchemaField::repeated_record(
        COLUMN,
        vec![
            SchemaField::scalar("time", FieldType::Float),
            SchemaField::scalar("time_timestamp", FieldType::Timestamp),
            SchemaField::scalar("level", FieldType::Integer),
            SchemaField::scalar("message", FieldType::String),
        ],
    )]
}

/// The record's log lines in order. A missing or non-list `line` is empty;
/// entries that are not objects are skipped.
pub fn log_lines(record: &CanonicalRecord) -> Vec<LogLine> {
    match record.get(LINE_KEY) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_object)
            .map(LogLine::from_map)
            .collect(),
        _ => Vec::new(),
    }
}

fn entry(line: &LogLine) -> Value {
    let mut entry = Map::new();
    if let Some(time) = line.time() {
        if let Some(seconds) = timestamp_to_seconds(time) {
            entry.insert("time".to_string(), decimal_value(seconds));
        }
        entry.insert("time_timestamp".to_string(), Value::String(time.to_string()));
    }
    if let Some(level) = line.severity().and_then(parse_severity) {
        entry.insert("level".to_string(), Value::from(level));
    }
    if let Some(message) = line.log_message() {
        entry.insert("message".to_string(), Value::String(message.to_string()));
    }
    Value::Object(entry)
}

/// Write `app_logs`, one entry per line. The column is always present.
pub fn populate(row: &mut OutputRow, lines: &[LogLine]) {
    row.set(COLUMN, Value::Array(lines.iter().map(entry).collect()));
}
