//! Standard field extractor: canonical payload keys copied to flat columns.

use crate::codec::{date_value_to_seconds, duration_value_to_seconds};
use crate::schema::{FieldType, SchemaField};
use crate::types::{CanonicalRecord, OutputRow};
use serde_json::Value;

/// Conversion applied to a payload value before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// ISO-8601 timestamp → UNIX seconds.
    DateToSeconds,
    /// `"0.25s"` → seconds.
    Duration,
}

impl Transform {
    fn apply(self, value: &Value) -> Option<Value> {
        match self {
            Transform::DateToSeconds => date_value_to_seconds(value),
            Transform::Duration => duration_value_to_seconds(value),
        }
    }
}

/// One row of the standard field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardField {
    pub column: &'static str,
    pub field_type: FieldType,
    pub payload_key: &'static str,
    pub transform: Option<Transform>,
}

const fn copy(column: &'static str, field_type: FieldType, payload_key: &'static str) -> StandardField {
    StandardField {
        column,
        field_type,
        payload_key,
        transform: None,
    }
}

const fn convert(
    column: &'static str,
    payload_key: &'static str,
    transform: Transform,
) -> StandardField {
    StandardField {
        column,
        field_type: FieldType::Float,
        payload_key,
        transform: Some(transform),
    }
}

pub const STANDARD_FIELDS: &[StandardField] = &[
    copy("ip", FieldType::String, "ip"),
    copy("nickname", FieldType::String, "nickname"),
    convert("start_time", "startTime", Transform::DateToSeconds),
    copy("start_time_timestamp", FieldType::Timestamp, "startTime"),
    convert("end_time", "endTime", Transform::DateToSeconds),
    copy("end_time_timestamp", FieldType::Timestamp, "endTime"),
    copy("method", FieldType::String, "method"),
    copy("resource", FieldType::String, "resource"),
    copy("http_version", FieldType::String, "httpVersion"),
    copy("status", FieldType::Integer, "status"),
    copy("response_size", FieldType::Integer, "responseSize"),
    copy("referrer", FieldType::String, "referrer"),
    copy("user_agent", FieldType::String, "userAgent"),
    copy("host", FieldType::String, "host"),
    convert("latency", "latency", Transform::Duration),
    convert("pending_time", "pendingTime", Transform::Duration),
    copy("mcycles", FieldType::Integer, "megaCycles"),
    copy("cost", FieldType::Float, "cost"),
    copy("task_queue_name", FieldType::String, "taskQueueName"),
    copy("task_name", FieldType::String, "taskName"),
    copy("instance_key", FieldType::String, "instanceId"),
    copy("module_id", FieldType::String, "moduleId"),
    copy("version_id", FieldType::String, "versionId"),
    copy("request_id", FieldType::String, "requestId"),
    copy("replica_index", FieldType::Integer, "instanceIndex"),
    copy("url_map_entry", FieldType::String, "urlMapEntry"),
    copy("was_loading_request", FieldType::Boolean, "wasLoadingRequest"),
];

pub fn schema_fields() -> Vec<SchemaField> {
    STANDARD_FIELDS
        .iter()
        .map(|field| SchemaField::scalar(field.column, field.field_type))
        .collect()
}

/// Write every standard column the record has a value for.
pub fn populate(row: &mut OutputRow, record: &CanonicalRecord) {
    for field in STANDARD_FIELDS {
        let Some(raw) = record.get(field.payload_key) else {
            continue;
        };
        let value = match field.transform {
            Some(transform) => transform.apply(raw),
            None => Some(raw.clone()),
        };
        if let Some(value) = value {
            row.set(field.column, value);
        }
    }
}
