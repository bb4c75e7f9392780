//! Kind normalizer. Turns a classified raw record into a [`CanonicalRecord`].
//!
//! Request logs already carry a request-shaped payload and pass through
//! untouched. App logs are a single line of text with a few labels, so a
//! request-shaped payload is synthesized around them: the labels become
//! `threadId`/`moduleId`/`versionId`, the record's timestamp becomes both
//! `startTime` and `endTime`, and the text becomes the one entry of `line`.
//!
//! Every other kind is rejected with [`ExtractError::UnsupportedKind`].

use crate::error::ExtractError;
use crate::types::{CanonicalRecord, LogKind, LogLine, LINE_KEY};
use crate::wire::RawRecord;
use serde_json::Value;

/// Anchor message emitted at the start of every request by the web app's
/// request-id middleware. The format must stay in sync with it.
pub const REQUEST_ID_MARKER: &str = "REQUEST_ID: ";

/// How a given kind is brought into canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// The record's payload is already canonical.
    Identity,
    /// Synthesize a canonical payload from an app log.
    AppLog,
}

impl Normalization {
    pub fn for_kind(kind: LogKind) -> Result<Self, ExtractError> {
        match kind {
            LogKind::Request => Ok(Normalization::Identity),
            LogKind::App => Ok(Normalization::AppLog),
            LogKind::Access
            | LogKind::Activity
            | LogKind::Crash
            | LogKind::Shutdown
            | LogKind::Stderr
            | LogKind::Stdout
            | LogKind::Syslog
            | LogKind::Unknown => Err(ExtractError::UnsupportedKind(kind)),
        }
    }

    pub fn apply(self, record: &RawRecord) -> CanonicalRecord {
        match self {
            Normalization::Identity => identity(record),
            Normalization::AppLog => app_log(record),
        }
    }
}

/// Normalize `record`, already classified as `kind`.
pub fn normalize(record: &RawRecord, kind: LogKind) -> Result<CanonicalRecord, ExtractError> {
    Ok(Normalization::for_kind(kind)?.apply(record))
}

fn identity(record: &RawRecord) -> CanonicalRecord {
    CanonicalRecord::new(record.shape().proto_payload().cloned().unwrap_or_default())
}

fn app_log(record: &RawRecord) -> CanonicalRecord {
    let shape = record.shape();
    let timestamp = shape.timestamp();
    let text = shape.text_payload();

    let mut canonical = CanonicalRecord::default();
    canonical.set_opt("threadId", shape.thread_id());
    canonical.set_opt("startTime", timestamp);
    canonical.set_opt("endTime", timestamp);
    canonical.set_opt("moduleId", shape.module_id());
    canonical.set_opt("versionId", shape.version_id());
    canonical.set_opt(
        "requestId",
        text.and_then(|t| t.strip_prefix(REQUEST_ID_MARKER)),
    );

    let line = LogLine::new(timestamp, shape.severity(), text);
    canonical.set(LINE_KEY, Value::Array(vec![line.to_value()]));
    canonical
}
