//! Event-log extractor for the `KALOG` mini-language.
//!
//! Application code writes one log line per request of the form
//!
//! ```text
//! KALOG;stats.rpc.user_data:3;session_id:abc;pageload
//! ```
//!
//! Each `;`-separated token is `key[:value]`; a bare key is the boolean event
//! `true`. Values are URL-encoded on the way out, so they are decoded before
//! being parsed into the type the key is declared with.
//!
//! Keys resolve against two tables, in this order:
//!
//! 1. [`CATEGORIES`]: the first prefix the key starts with collects the event
//!    as a `{key, value}` entry in that category's repeated column.
//! 2. [`UNIQUE_KEYS`]: an exact match writes a scalar column. These keys are
//!    expected once per request; a repeat keeps the last value and is
//!    reported as an [`Anomaly::DuplicateUniqueKey`].
//!
//! Anything else is dropped.

use crate::codec::ValueType;
use crate::schema::{FieldType, SchemaField};
use crate::types::{Anomaly, LogLine, OutputRow};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Prefix identifying an event-log message.
pub const MARKER: &str = "KALOG";

const COLUMN_PREFIX: &str = "elog_";

/// Column a key or category prefix is stored under: `stats.rpc.` →
/// `elog_stats_rpc`.
pub fn column_name(name: &str) -> String {
    let name = name.strip_suffix('.').unwrap_or(name);
    format!("{COLUMN_PREFIX}{}", name.replace('.', "_"))
}

// ---------------------------------------------------------------------------
// Descriptor tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueKey {
    pub column: &'static str,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub prefix: &'static str,
    pub column: &'static str,
    pub value_type: ValueType,
}

macro_rules! unique {
    ($column:literal, $ty:ident) => {
        UniqueKey {
            column: $column,
            value_type: ValueType::$ty,
        }
    };
}

/// Keys that occur at most once per request, in schema order.
pub static UNIQUE_KEYS: phf::OrderedMap<&'static str, UniqueKey> = phf::phf_ordered_map! {
    "KA_APP" => unique!("elog_KA_APP", Boolean),
    "app_version" => unique!("elog_app_version", String),
    "browser" => unique!("elog_browser", String),
    "country" => unique!("elog_country", String),
    "device_brand" => unique!("elog_device_brand", String),
    "device_name" => unique!("elog_device_name", String),
    "language" => unique!("elog_language", String),
    "orig_request_id" => unique!("elog_orig_request_id", String),
    "os" => unique!("elog_os", String),
    "pageload" => unique!("elog_pageload", Boolean),
    "retries" => unique!("elog_retries", Integer),
    "session_id" => unique!("elog_session_id", String),
    "session_start" => unique!("elog_session_start", Integer),
    "touch" => unique!("elog_touch", Boolean),
    "url_route" => unique!("elog_url_route", String),
    "user_bingo_id" => unique!("elog_user_bingo_id", String),
    "user_first_visit_date" => unique!("elog_user_first_visit_date", Integer),
    "user_is_parent" => unique!("elog_user_is_parent", Boolean),
    "user_is_phantom" => unique!("elog_user_is_phantom", Boolean),
    "user_is_registered" => unique!("elog_user_is_registered", Boolean),
    "user_is_teacher" => unique!("elog_user_is_teacher", Boolean),
    "user_joined_date" => unique!("elog_user_joined_date", Integer),
    "user_kaid" => unique!("elog_user_kaid", String),
    "user_phantom_creation_date" => unique!("elog_user_phantom_creation_date", Integer),
};

/// Repeated categories, checked in order; the first matching prefix wins.
pub const CATEGORIES: &[Category] = &[
    Category { prefix: "bingo.", column: "elog_bingo", value_type: ValueType::String },
    Category { prefix: "content_survey.", column: "elog_content_survey", value_type: ValueType::String },
    Category { prefix: "id.", column: "elog_id", value_type: ValueType::String },
    Category { prefix: "stats.bingo.", column: "elog_stats_bingo", value_type: ValueType::Integer },
    Category {
        prefix: "stats.english_visibility.",
        column: "elog_stats_english_visibility",
        value_type: ValueType::Float,
    },
    Category { prefix: "stats.logging.", column: "elog_stats_logging", value_type: ValueType::Integer },
    Category { prefix: "stats.rpc.", column: "elog_stats_rpc", value_type: ValueType::Integer },
    Category { prefix: "stats.rpc_info.", column: "elog_stats_rpc_info", value_type: ValueType::String },
    Category { prefix: "stats.rpc_ops.", column: "elog_stats_rpc_ops", value_type: ValueType::Integer },
    Category { prefix: "stats.search.", column: "elog_stats_search", value_type: ValueType::Integer },
    Category { prefix: "stats.time.", column: "elog_stats_time", value_type: ValueType::Integer },
];

pub fn category_for(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| key.starts_with(category.prefix))
}

pub fn schema_fields() -> Vec<SchemaField> {
    let scalars = UNIQUE_KEYS
        .values()
        .map(|unique| SchemaField::scalar(unique.column, unique.value_type.field_type()));
    let categories = CATEGORIES.iter().map(|category| {
        SchemaField::repeated_record(
            category.column,
            vec![
                SchemaField::scalar("key", FieldType::String),
                SchemaField::scalar("value", category.value_type.field_type()),
            ],
        )
    });
    scalars.chain(categories).collect()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// One `key[:value]` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Event<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> Event<'a> {
    fn parse(token: &'a str) -> Self {
        let mut parts = token.split(':');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().filter(|v| !v.is_empty()).unwrap_or("true");
        Event { key, value }
    }
}

/// Tokens of every `KALOG` message, in line order.
fn events<'a>(lines: &'a [LogLine]) -> impl Iterator<Item = Event<'a>> + 'a {
    lines
        .iter()
        .filter_map(|line| line.log_message()?.strip_prefix(MARKER))
        .flat_map(|rest| rest.split(';'))
        .filter(|token| !token.is_empty())
        .map(Event::parse)
}

/// Write every event-log column found in `lines`, returning any anomalies.
pub fn populate(row: &mut OutputRow, lines: &[LogLine]) -> Vec<Anomaly> {
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut anomalies = Vec::new();

    for event in events(lines) {
        if let Some(category) = category_for(event.key) {
            let mut entry = Map::new();
            entry.insert("key".to_string(), Value::String(event.key.to_string()));
            if let Some(value) = category.value_type.parse(event.value) {
                entry.insert("value".to_string(), value);
            }
            row.push(category.column, Value::Object(entry));
        } else if let Some(unique) = UNIQUE_KEYS.get(event.key) {
            if !seen.insert(unique.column) {
                tracing::error!(
                    key = event.key,
                    column = unique.column,
                    "unique event-log key seen more than once; keeping the last value"
                );
                anomalies.push(Anomaly::DuplicateUniqueKey {
                    key: event.key.to_string(),
                    column: unique.column.to_string(),
                });
            }
            match unique.value_type.parse(event.value) {
                Some(value) => row.set(unique.column, value),
                None => row.remove(unique.column),
            };
        }
    }
    anomalies
}
