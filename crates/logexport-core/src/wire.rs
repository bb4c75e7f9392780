//! Wire-shape adapters for raw log records.
//!
//! Producers emit two incompatible layouts. Each gets one small adapter that
//! knows where its fields live; everything downstream goes through the
//! [`WireShape`] accessors and never inspects the layout itself.
//!
//! | Attribute  | V1                          | V2                                  |
//! |------------|-----------------------------|-------------------------------------|
//! | log name   | `log`                       | `logName`                           |
//! | labels     | `metadata.labels`           | `labels`, then `resource.labels`    |
//! | severity   | `metadata.severity`         | `severity`                          |
//! | timestamp  | `metadata.timestamp`        | `timestamp`                         |

use crate::classify;
use crate::error::ExtractError;
use crate::types::ApiVersion;
use serde_json::{Map, Value};

pub const THREAD_ID_LABEL: &str = "appengine.googleapis.com/thread_id";
pub const MODULE_ID_LABEL: &str = "appengine.googleapis.com/module_id";
pub const VERSION_ID_LABEL: &str = "appengine.googleapis.com/version_id";

/// Shape-independent read access to a raw record.
pub trait WireShape {
    /// The whole record as received.
    fn fields(&self) -> &Map<String, Value>;

    fn log_name(&self) -> Option<&str>;

    /// Primary label container.
    fn labels(&self) -> Option<&Map<String, Value>>;

    fn severity(&self) -> Option<&str>;

    fn timestamp(&self) -> Option<&str>;

    fn label(&self, key: &str) -> Option<&str> {
        self.labels()?.get(key)?.as_str()
    }

    fn thread_id(&self) -> Option<&str> {
        self.label(THREAD_ID_LABEL)
    }

    fn module_id(&self) -> Option<&str> {
        self.label(MODULE_ID_LABEL)
    }

    fn version_id(&self) -> Option<&str> {
        self.label(VERSION_ID_LABEL)
    }

    /// Free-text payload: `textPayload`, else `payload` as either a plain
    /// string or a `{"logMessage": …}` object.
    fn text_payload(&self) -> Option<&str> {
        let fields = self.fields();
        if let Some(text) = fields.get("textPayload").and_then(Value::as_str) {
            return Some(text);
        }
        match fields.get("payload")? {
            Value::String(text) => Some(text.as_str()),
            Value::Object(payload) => payload.get("logMessage")?.as_str(),
            _ => None,
        }
    }

    /// The request-log payload, present on records that already carry one.
    fn proto_payload(&self) -> Option<&Map<String, Value>> {
        self.fields().get("protoPayload")?.as_object()
    }
}

/// Nested lookup through a chain of object keys.
fn lookup<'a>(fields: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = fields;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last).filter(|v| !v.is_null())
}

// ---------------------------------------------------------------------------
// V1
// ---------------------------------------------------------------------------

/// Wire shape A: attributes nested under `metadata`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiV1Record(Map<String, Value>);

impl WireShape for ApiV1Record {
    fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn log_name(&self) -> Option<&str> {
        lookup(&self.0, &["log"])?.as_str()
    }

    fn labels(&self) -> Option<&Map<String, Value>> {
        lookup(&self.0, &["metadata", "labels"])?.as_object()
    }

    fn severity(&self) -> Option<&str> {
        lookup(&self.0, &["metadata", "severity"])?.as_str()
    }

    fn timestamp(&self) -> Option<&str> {
        lookup(&self.0, &["metadata", "timestamp"])?.as_str()
    }
}

// ---------------------------------------------------------------------------
// V2
// ---------------------------------------------------------------------------

/// Wire shape B: attributes at top level plus `resource.labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiV2Record(Map<String, Value>);

impl ApiV2Record {
    fn resource_label(&self, key: &str) -> Option<&str> {
        lookup(&self.0, &["resource", "labels", key])?.as_str()
    }
}

impl WireShape for ApiV2Record {
    fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn log_name(&self) -> Option<&str> {
        lookup(&self.0, &["logName"])?.as_str()
    }

    fn labels(&self) -> Option<&Map<String, Value>> {
        lookup(&self.0, &["labels"])?.as_object()
    }

    fn severity(&self) -> Option<&str> {
        lookup(&self.0, &["severity"])?.as_str()
    }

    fn timestamp(&self) -> Option<&str> {
        lookup(&self.0, &["timestamp"])?.as_str()
    }

    fn module_id(&self) -> Option<&str> {
        self.label(MODULE_ID_LABEL)
            .or_else(|| self.resource_label("module_id"))
    }

    fn version_id(&self) -> Option<&str> {
        self.label(VERSION_ID_LABEL)
            .or_else(|| self.resource_label("version_id"))
    }
}

// ---------------------------------------------------------------------------
// RawRecord
// ---------------------------------------------------------------------------

/// A log record as received, tagged with its wire shape. Never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    V1(ApiV1Record),
    V2(ApiV2Record),
}

impl RawRecord {
    /// Wrap a JSON object, picking the wire shape from its top-level keys.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        match classify::api_version(&fields) {
            ApiVersion::V1 => RawRecord::V1(ApiV1Record(fields)),
            ApiVersion::V2 => RawRecord::V2(ApiV2Record(fields)),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, ExtractError> {
        match value {
            Value::Object(fields) => Ok(Self::from_map(fields)),
            _ => Err(ExtractError::NotAnObject),
        }
    }

    /// Parse one JSON message.
    pub fn from_json(text: &str) -> Result<Self, ExtractError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn version(&self) -> ApiVersion {
        match self {
            RawRecord::V1(_) => ApiVersion::V1,
            RawRecord::V2(_) => ApiVersion::V2,
        }
    }

    /// Shape-independent accessors for this record.
    pub fn shape(&self) -> &dyn WireShape {
        match self {
            RawRecord::V1(record) => record,
            RawRecord::V2(record) => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    #[test]
    fn v1_reads_metadata_container() {
        let r = record(json!({
            "log": "appengine.googleapis.com%2Fapp",
            "metadata": {
                "severity": "INFO",
                "timestamp": "2020-01-02T03:04:05.123456Z",
                "labels": {
                    "appengine.googleapis.com/thread_id": "t-1",
                    "appengine.googleapis.com/module_id": "default"
                }
            },
            "textPayload": "hello"
        }));
        assert_eq!(r.version(), ApiVersion::V1);
        let shape = r.shape();
        assert_eq!(shape.log_name(), Some("appengine.googleapis.com%2Fapp"));
        assert_eq!(shape.severity(), Some("INFO"));
        assert_eq!(shape.thread_id(), Some("t-1"));
        assert_eq!(shape.module_id(), Some("default"));
        assert_eq!(shape.version_id(), None);
        assert_eq!(shape.text_payload(), Some("hello"));
    }

    #[test]
    fn v2_falls_back_to_resource_labels() {
        let r = record(json!({
            "logName": "projects/p/logs/app",
            "labels": {"appengine.googleapis.com/thread_id": "t-2"},
            "resource": {"labels": {"module_id": "batch", "version_id": "v42"}},
            "severity": "ERROR",
            "timestamp": "2020-01-02T03:04:05Z"
        }));
        assert_eq!(r.version(), ApiVersion::V2);
        let shape = r.shape();
        assert_eq!(shape.module_id(), Some("batch"));
        assert_eq!(shape.version_id(), Some("v42"));
        assert_eq!(shape.severity(), Some("ERROR"));
    }

    #[test]
    fn v2_primary_labels_win_over_resource_labels() {
        let r = record(json!({
            "logName": "projects/p/logs/app",
            "labels": {"appengine.googleapis.com/module_id": "api"},
            "resource": {"labels": {"module_id": "batch"}}
        }));
        assert_eq!(r.shape().module_id(), Some("api"));
    }

    #[test]
    fn payload_text_handles_both_shapes() {
        let plain = record(json!({"logName": "x/app", "payload": "REQUEST_ID: abc"}));
        assert_eq!(plain.shape().text_payload(), Some("REQUEST_ID: abc"));

        let nested = record(json!({"logName": "x/app", "payload": {"logMessage": "nested"}}));
        assert_eq!(nested.shape().text_payload(), Some("nested"));

        let missing = record(json!({"logName": "x/app", "payload": 7}));
        assert_eq!(missing.shape().text_payload(), None);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            RawRecord::from_json("[1, 2]"),
            Err(ExtractError::NotAnObject)
        ));
        assert!(matches!(
            RawRecord::from_json("{not json"),
            Err(ExtractError::InvalidJson(_))
        ));
    }
}
