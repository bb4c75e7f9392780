//! Test builders: ergonomic constructors for raw records.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use logexport_core::{ApiVersion, RawRecord};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// RawRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawRecord`] test fixtures in either wire shape.
///
/// # Example
///
/// ```rust
/// let record = RawRecordBuilder::v2("app")
///     .severity("WARNING")
///     .timestamp("2020-01-02T03:04:05Z")
///     .label("appengine.googleapis.com/thread_id", "t-1")
///     .text("REQUEST_ID: abc123")
///     .build();
/// ```
pub struct RawRecordBuilder {
    version: ApiVersion,
    log_name: String,
    severity: Option<String>,
    timestamp: Option<String>,
    labels: Map<String, Value>,
    resource_labels: Map<String, Value>,
    extra: Map<String, Value>,
}

impl RawRecordBuilder {
    fn new(version: ApiVersion, log_name: String) -> Self {
        Self {
            version,
            log_name,
            severity: None,
            timestamp: None,
            labels: Map::new(),
            resource_labels: Map::new(),
            extra: Map::new(),
        }
    }

    /// Wire shape A with log name `appengine.googleapis.com/<segment>`.
    pub fn v1(segment: &str) -> Self {
        Self::new(ApiVersion::V1, format!("appengine.googleapis.com/{segment}"))
    }

    /// Wire shape B with log name `projects/khan/logs/appengine.googleapis.com%2F<segment>`.
    pub fn v2(segment: &str) -> Self {
        Self::new(
            ApiVersion::V2,
            format!("projects/khan/logs/appengine.googleapis.com%2F{segment}"),
        )
    }

    pub fn severity(mut self, severity: &str) -> Self {
        self.severity = Some(severity.to_string());
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), json!(value));
        self
    }

    /// V2 only: a `resource.labels` entry.
    pub fn resource_label(mut self, key: &str, value: &str) -> Self {
        self.resource_labels.insert(key.to_string(), json!(value));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.field("textPayload", json!(text))
    }

    pub fn proto_payload(self, payload: Value) -> Self {
        self.field("protoPayload", payload)
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn to_value(&self) -> Value {
        let mut fields = self.extra.clone();
        match self.version {
            ApiVersion::V1 => {
                let mut metadata = Map::new();
                metadata.insert("labels".to_string(), Value::Object(self.labels.clone()));
                if let Some(severity) = &self.severity {
                    metadata.insert("severity".to_string(), json!(severity));
                }
                if let Some(timestamp) = &self.timestamp {
                    metadata.insert("timestamp".to_string(), json!(timestamp));
                }
                fields.insert("log".to_string(), json!(self.log_name));
                fields.insert("metadata".to_string(), Value::Object(metadata));
            }
            ApiVersion::V2 => {
                fields.insert("logName".to_string(), json!(self.log_name));
                fields.insert("labels".to_string(), Value::Object(self.labels.clone()));
                if !self.resource_labels.is_empty() {
                    fields.insert(
                        "resource".to_string(),
                        json!({"labels": self.resource_labels.clone()}),
                    );
                }
                if let Some(severity) = &self.severity {
                    fields.insert("severity".to_string(), json!(severity));
                }
                if let Some(timestamp) = &self.timestamp {
                    fields.insert("timestamp".to_string(), json!(timestamp));
                }
            }
        }
        Value::Object(fields)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn build(self) -> RawRecord {
        RawRecord::from_value(self.to_value()).expect("builder always produces an object")
    }
}

/// A request record whose payload has the given app lines.
pub fn request_with_messages(messages: &[&str]) -> RawRecord {
    let line: Vec<Value> = messages
        .iter()
        .map(|m| json!({"severity": "INFO", "logMessage": m}))
        .collect();
    RawRecordBuilder::v2("request_log")
        .proto_payload(json!({ "line": line }))
        .build()
}
