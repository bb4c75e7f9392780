//! Bingo (A/B testing) event extractor.
//!
//! The experiment framework logs one line per participation or conversion,
//! a fixed prefix followed by a JSON object that already has the column
//! layout, so entries are stored as parsed.

use crate::schema::{FieldType, SchemaField};
use crate::types::{LogLine, OutputRow};
use serde_json::Value;

pub const PARTICIPATION_PREFIX: &str = "BINGO_PARTICIPATION_EVENT:";
pub const CONVERSION_PREFIX: &str = "BINGO_CONVERSION_EVENT:";

pub const PARTICIPATION_COLUMN: &str = "bingo_participation_events";
pub const CONVERSION_COLUMN: &str = "bingo_conversion_events";

fn strings(names: &[&str]) -> Vec<SchemaField> {
    names
        .iter()
        .map(|name| SchemaField::scalar(*name, FieldType::String))
        .collect()
}

pub fn schema_fields() -> Vec<SchemaField> {
    vec![
        SchemaField::repeated_record(
            PARTICIPATION_COLUMN,
            strings(&["bingo_id", "experiment", "alternative"]),
        ),
        SchemaField::repeated_record(
            CONVERSION_COLUMN,
            strings(&["bingo_id", "conversion", "extra"]),
        ),
    ]
}

/// The first JSON value after the prefix; anything following it is ignored.
/// Malformed JSON becomes an explicit `null` entry.
fn parse_event(json: &str) -> Value {
    serde_json::Deserializer::from_str(json)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
        .unwrap_or(Value::Null)
}

/// Write both bingo columns; each is always present, possibly empty.
pub fn populate(row: &mut OutputRow, lines: &[LogLine]) {
    let mut participations = Vec::new();
    let mut conversions = Vec::new();

    for message in lines.iter().filter_map(LogLine::log_message) {
        if let Some(json) = message.strip_prefix(PARTICIPATION_PREFIX) {
            participations.push(parse_event(json));
        } else if let Some(json) = message.strip_prefix(CONVERSION_PREFIX) {
            conversions.push(parse_event(json));
        }
    }

    row.set(PARTICIPATION_COLUMN, Value::Array(participations));
    row.set(CONVERSION_COLUMN, Value::Array(conversions));
}
