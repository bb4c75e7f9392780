//! logexport-pipeline: a local driver for the extraction engine.
//!
//! Reads newline-delimited JSON log records from stdin or a file, turns each
//! into a row with one shared [`logexport_core::LogsExtractor`], and writes
//! the rows back out as newline-delimited JSON. Records that cannot be
//! converted are logged and optionally copied to a dead-letter file.
//!
//! ```text
//! RecordSource ──► reader task ──► mpsc (bounded) ──► Pipeline ──► LineWriter
//!                                                        │
//!                                                        └──► dead letters
//! ```

pub mod runner;
pub mod sink;
pub mod source;

pub use runner::{Pipeline, PipelineError, RecordError, RunStats};
pub use sink::{LineWriter, RowTarget};
pub use source::{RawLine, RecordSource};
