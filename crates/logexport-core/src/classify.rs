//! Log classifier: wire-shape version and log kind of a raw record.
//!
//! Classification never fails: a record with no usable log name is simply
//! [`LogKind::Unknown`].

use crate::codec::url_decode;
use crate::types::{ApiVersion, LogKind};
use crate::wire::RawRecord;
use serde_json::{Map, Value};

/// The (version, kind) pair every record is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub version: ApiVersion,
    pub kind: LogKind,
}

/// V1 records carry neither a top-level `logName` nor a top-level `labels`.
pub fn api_version(fields: &Map<String, Value>) -> ApiVersion {
    let present = |key: &str| fields.get(key).is_some_and(|v| !v.is_null());
    if !present("logName") && !present("labels") {
        ApiVersion::V1
    } else {
        ApiVersion::V2
    }
}

/// Kind from a full log name such as `projects/p/logs/appengine.googleapis.com%2Frequest_log`.
///
/// The name is URL-decoded first; if that fails the raw name is used as is.
pub fn kind_from_log_name(log_name: &str) -> LogKind {
    let decoded = match url_decode(log_name) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(log_name, %err, "could not URL-decode log name; using it verbatim");
            log_name.into()
        }
    };
    let segment = decoded.rsplit('/').next().unwrap_or_default();
    LogKind::from_segment(segment)
}

pub fn log_kind(record: &RawRecord) -> LogKind {
    kind_from_log_name(record.shape().log_name().unwrap_or_default())
}

pub fn classify(record: &RawRecord) -> Classification {
    let classification = Classification {
        version: record.version(),
        kind: log_kind(record),
    };
    tracing::debug!(
        version = %classification.version,
        kind = %classification.kind,
        "classified record"
    );
    classification
}
