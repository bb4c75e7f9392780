//! Domain-specific assertion macros for logexport harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that list the
//! columns the row actually has.

// ---------------------------------------------------------------------------
// Column assertions
// ---------------------------------------------------------------------------

/// Assert that a row has a column with an expected JSON value.
///
/// ```rust
/// assert_column!(row, "elog_session_id", "abc");
/// ```
#[macro_export]
macro_rules! assert_column {
    ($row:expr, $column:expr, $value:tt) => {{
        let row: &logexport_core::OutputRow = &$row;
        let column: &str = $column;
        let expected = serde_json::json!($value);
        match row.get(column) {
            Some(actual) => pretty_assertions::assert_eq!(
                actual,
                &expected,
                "assert_column! failed for column {:?}",
                column
            ),
            None => panic!(
                "assert_column! failed: column {:?} not found in row.\n  Available columns: {:?}",
                column,
                row.columns().keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that a column's JSON text is exactly `$text` (for exact decimals).
#[macro_export]
macro_rules! assert_column_text {
    ($row:expr, $column:expr, $text:expr) => {{
        let row: &logexport_core::OutputRow = &$row;
        let column: &str = $column;
        match row.get(column) {
            Some(actual) => pretty_assertions::assert_eq!(actual.to_string(), $text),
            None => panic!("assert_column_text! failed: column {:?} not found", column),
        }
    }};
}

/// Assert that a row does not carry a column at all (not even `null`).
#[macro_export]
macro_rules! assert_no_column {
    ($row:expr, $column:expr) => {{
        let row: &logexport_core::OutputRow = &$row;
        let column: &str = $column;
        if let Some(actual) = row.get(column) {
            panic!(
                "assert_no_column! failed: column {:?} is present with value {}",
                column, actual
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Schema assertions
// ---------------------------------------------------------------------------

/// Every column in `row` is declared in `schema`, recursively for records.
pub fn assert_row_matches_schema(
    row: &logexport_core::OutputRow,
    schema: &[logexport_core::SchemaField],
) {
    for (column, value) in row.columns() {
        let field = schema
            .iter()
            .find(|f| &f.name == column)
            .unwrap_or_else(|| panic!("row column {column:?} is not declared in the schema"));
        if field.is_repeated() {
            let entries = value
                .as_array()
                .unwrap_or_else(|| panic!("repeated column {column:?} is not a list: {value}"));
            for entry in entries.iter().filter_map(|e| e.as_object()) {
                for key in entry.keys() {
                    assert!(
                        field.fields.iter().any(|sub| &sub.name == key),
                        "entry key {key:?} of {column:?} is not declared"
                    );
                }
            }
        }
    }
}
