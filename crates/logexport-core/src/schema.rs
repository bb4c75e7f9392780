//! Column descriptors for the output table.
//!
//! [`SchemaField`] serializes in the same JSON shape a BigQuery table schema
//! uses (`name`, `type`, optional `mode`, optional nested `fields`), so the
//! schema dump can be handed straight to the destination table and an
//! existing table's schema can be read back for merging.
//!
//! We never declare `REQUIRED` columns; scalars are implicitly nullable and
//! only repeated records carry a mode.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    String,
    #[serde(alias = "INT64")]
    Integer,
    #[serde(alias = "FLOAT64")]
    Float,
    #[serde(alias = "BOOL")]
    Boolean,
    Timestamp,
    #[serde(alias = "STRUCT")]
    Record,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "STRING"),
            FieldType::Integer => write!(f, "INTEGER"),
            FieldType::Float => write!(f, "FLOAT"),
            FieldType::Boolean => write!(f, "BOOLEAN"),
            FieldType::Timestamp => write!(f, "TIMESTAMP"),
            FieldType::Record => write!(f, "RECORD"),
        }
    }
}

/// Column mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldMode {
    Nullable,
    Required,
    Repeated,
}

/// One column: a scalar, or a repeated record with its own sub-columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FieldMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SchemaField>,
}

impl SchemaField {
    /// A nullable scalar column.
    pub fn scalar(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: None,
            description: None,
            fields: Vec::new(),
        }
    }

    /// A repeated record whose entries have the given sub-columns.
    pub fn repeated_record(name: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Record,
            mode: Some(FieldMode::Repeated),
            description: None,
            fields,
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.mode == Some(FieldMode::Repeated)
    }

    pub fn is_record(&self) -> bool {
        self.field_type == FieldType::Record
    }
}

/// Reject the first column name that appears twice at the same nesting level.
pub fn validate_unique(fields: &[SchemaField]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateColumn(field.name.clone()));
        }
        validate_unique(&field.fields)?;
    }
    Ok(())
}

/// `existing` plus every column of `incoming` it does not yet have.
///
/// Existing columns keep their position and definition; new ones are
/// appended in `incoming` order. Record columns present on both sides are
/// merged recursively so new sub-columns are picked up too.
pub fn merge_schemas(existing: &[SchemaField], incoming: &[SchemaField]) -> Vec<SchemaField> {
    let mut merged = existing.to_vec();
    for field in incoming {
        match merged.iter_mut().find(|f| f.name == field.name) {
            None => merged.push(field.clone()),
            Some(current) if field.is_record() => {
                current.fields = merge_schemas(&current.fields, &field.fields);
            }
            Some(_) => {}
        }
    }
    merged
}

/// Drop every mode except `REPEATED`, recursively.
///
/// Streaming tables treat every column as nullable, so `NULLABLE` and
/// `REQUIRED` from a batch table's schema are noise.
pub fn strip_modes(fields: &mut [SchemaField]) {
    for field in fields {
        if field.mode != Some(FieldMode::Repeated) {
            field.mode = None;
        }
        strip_modes(&mut field.fields);
    }
}

/// Names of top-level columns in `after` that are not in `before`.
pub fn added_columns<'a>(before: &[SchemaField], after: &'a [SchemaField]) -> Vec<&'a str> {
    let known: HashSet<&str> = before.iter().map(|f| f.name.as_str()).collect();
    after
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| !known.contains(name))
        .collect()
}

/// Read a table schema document.
///
/// Accepts a bare field list, `{"fields": [...]}`, or a full table resource
/// with `{"schema": {"fields": [...]}}`.
pub fn parse_schema_document(text: &str) -> Result<Vec<SchemaField>, SchemaError> {
    let document: Value = serde_json::from_str(text)?;
    let fields = match document {
        Value::Array(_) => document,
        Value::Object(mut object) => {
            let holder = match object.remove("schema") {
                Some(Value::Object(schema)) => schema,
                _ => object,
            };
            holder
                .get("fields")
                .cloned()
                .ok_or(SchemaError::MissingFields)?
        }
        _ => return Err(SchemaError::MissingFields),
    };
    Ok(serde_json::from_value(fields)?)
}
