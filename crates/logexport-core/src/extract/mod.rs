//! Row building: classification, normalization and the four extractors.
//!
//! [`LogsExtractor`] is the single entry point. It is immutable once built
//! and holds no per-record state, so one instance can be shared across any
//! number of concurrent callers.

pub mod app_log;
pub mod bingo;
pub mod event_log;
pub mod standard;

use crate::classify::classify;
use crate::error::ExtractError;
use crate::normalizer::normalize;
use crate::schema::{validate_unique, SchemaField};
use crate::types::{CanonicalRecord, Extraction, OutputRow};
use crate::wire::RawRecord;
use serde_json::Value;

/// Column the optional default module id is written to.
const MODULE_ID_COLUMN: &str = "module_id";

/// Row-building knobs that do not change the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorOptions {
    /// Written to `module_id` for rows that carry none.
    pub default_module_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LogsExtractor {
    options: ExtractorOptions,
}

impl LogsExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Every output column in declaration order: standard fields, `app_logs`,
    /// event-log scalars and categories, then the bingo lists.
    pub fn schema(&self) -> Vec<SchemaField> {
        let mut fields = standard::schema_fields();
        fields.extend(app_log::schema_fields());
        fields.extend(event_log::schema_fields());
        fields.extend(bingo::schema_fields());
        debug_assert!(
            validate_unique(&fields).is_ok(),
            "extractors declare overlapping columns"
        );
        fields
    }

    /// Build the row for one raw record.
    ///
    /// Fails only when the record's kind cannot be normalized.
    pub fn extract(&self, record: &RawRecord) -> Result<Extraction, ExtractError> {
        let classification = classify(record);
        let canonical = normalize(record, classification.kind)?;
        Ok(self.extract_canonical(&canonical))
    }

    /// Parse one JSON message and build its row.
    pub fn extract_json(&self, text: &str) -> Result<Extraction, ExtractError> {
        self.extract(&RawRecord::from_json(text)?)
    }

    /// Run the extractors over an already-normalized record.
    pub fn extract_canonical(&self, record: &CanonicalRecord) -> Extraction {
        let mut row = OutputRow::new();
        standard::populate(&mut row, record);

        let lines = app_log::log_lines(record);
        app_log::populate(&mut row, &lines);
        let anomalies = event_log::populate(&mut row, &lines);
        bingo::populate(&mut row, &lines);

        if let Some(module_id) = &self.options.default_module_id {
            if !row.contains(MODULE_ID_COLUMN) {
                row.set(MODULE_ID_COLUMN, Value::String(module_id.clone()));
            }
        }

        Extraction { row, anomalies }
    }
}
