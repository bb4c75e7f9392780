//! Error types for the extraction engine.
//!
//! Only [`ExtractError`] ever escapes a per-record extraction. Value-level
//! failures (URL decoding, number/duration/timestamp parsing, bingo JSON)
//! are recovered inside the extractors and surface as absent columns.

use crate::types::LogKind;
use thiserror::Error;

/// Fatal, per-record extraction failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("don't know how to normalize log of kind: {0}")]
    UnsupportedKind(LogKind),

    #[error("invalid JSON record: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("record is not a JSON object")]
    NotAnObject,
}

/// Failure while validating, reading or merging a table schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("invalid schema document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema document has no field list")]
    MissingFields,
}

/// URL-decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),
}
