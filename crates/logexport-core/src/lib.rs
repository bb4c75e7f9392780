//! logexport-core: log classification, normalization and column extraction.
//!
//! This crate is the pure, stateless engine behind logexport: one raw log
//! record in, one flat analytics row out. It performs no I/O; the pipeline
//! crate and the binary feed it records and ship its rows.
//!
//! # Architecture
//!
//! ```text
//! RawRecord ──► classify ──► normalizer ──► CanonicalRecord
//!                                               │
//!                      ┌────────────────────────┤
//!                      ▼                        ▼
//!                  standard                 app_log ──► [LogLine]
//!                      │                        │          │
//!                      │                        │    ┌─────┴─────┐
//!                      │                        │    ▼           ▼
//!                      │                        │ event_log    bingo
//!                      └────────────┬───────────┴────┴───────────┘
//!                                   ▼
//!                               OutputRow
//! ```
//!
//! The descriptor tables (standard fields, event-log keys and categories,
//! bingo records) are compile-time constants and are safe to share across
//! any number of concurrent extractions.

pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalizer;
pub mod schema;
pub mod types;
pub mod wire;

pub use classify::Classification;
pub use error::{DecodeError, ExtractError, SchemaError};
pub use extract::{ExtractorOptions, LogsExtractor};
pub use schema::{FieldMode, FieldType, SchemaField};
pub use types::{
    Anomaly, ApiVersion, CanonicalRecord, Extraction, LogKind, LogLine, OutputRow,
};
pub use wire::{RawRecord, WireShape};
