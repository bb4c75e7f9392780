//! Scalar codecs: pure value converters shared by the extractors.
//!
//! None of these raise: a value that cannot be decoded or parsed comes back
//! as `None` and the caller leaves the corresponding column absent.

use crate::error::DecodeError;
use crate::schema::FieldType;
use chrono::DateTime;
use percent_encoding::percent_decode_str;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::borrow::Cow;

/// Digits after the decimal point in converted timestamps.
const MICROSECOND_SCALE: u32 = 6;

/// Severity names in log-level order; the index is the emitted level.
pub const SEVERITIES: [&str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// `"WARNING"` → `2`. Unrecognised names yield `None`.
pub fn parse_severity(name: &str) -> Option<i64> {
    SEVERITIES
        .iter()
        .position(|severity| *severity == name)
        .map(|index| index as i64)
}

/// ISO-8601 timestamp with up to microsecond precision → UNIX seconds as an
/// exact decimal with six fractional digits.
pub fn timestamp_to_seconds(text: &str) -> Option<Decimal> {
    let instant = DateTime::parse_from_rfc3339(text).ok()?;
    let micros = i128::from(instant.timestamp()) * 1_000_000
        + i128::from(instant.timestamp_subsec_micros());
    Decimal::try_from_i128_with_scale(micros, MICROSECOND_SCALE).ok()
}

/// Duration strings like `"0.282637s"` → seconds as an exact decimal.
pub fn duration_to_seconds(text: &str) -> Option<Decimal> {
    parse_decimal(text.strip_suffix('s')?)
}

/// Parse an exact decimal, accepting plain and scientific notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// JSON number carrying the decimal's exact text.
pub fn decimal_value(decimal: Decimal) -> Value {
    // Decimal's Display is always valid JSON number text.
    decimal
        .to_string()
        .parse::<Number>()
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// [`timestamp_to_seconds`] over a payload value; non-strings yield `None`.
pub fn date_value_to_seconds(value: &Value) -> Option<Value> {
    value
        .as_str()
        .and_then(timestamp_to_seconds)
        .map(decimal_value)
}

/// [`duration_to_seconds`] over a payload value; non-strings yield `None`.
pub fn duration_value_to_seconds(value: &Value) -> Option<Value> {
    value
        .as_str()
        .and_then(duration_to_seconds)
        .map(decimal_value)
}

/// Form-style URL decoding: `+` becomes a space and `%XY` a byte.
///
/// A `%` not followed by two hex digits is an error. Byte sequences that are
/// not UTF-8 after decoding are replaced lossily.
pub fn url_decode(text: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = text.as_bytes();
    let mut escapes = false;
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|b| *b == b'%') {
        let at = i + offset;
        let valid = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(DecodeError::MalformedEscape(at));
        }
        escapes = true;
        i = at + 3;
    }

    if !escapes && !text.contains('+') {
        return Ok(Cow::Borrowed(text));
    }
    let spaced = text.replace('+', " ");
    Ok(Cow::Owned(
        percent_decode_str(&spaced).decode_utf8_lossy().into_owned(),
    ))
}

// ---------------------------------------------------------------------------
// Typed event values
// ---------------------------------------------------------------------------

/// Scalar type an embedded event value is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    /// Exact decimal.
    Float,
    Boolean,
}

impl ValueType {
    /// Column type this value type is declared as.
    pub const fn field_type(self) -> FieldType {
        match self {
            ValueType::String => FieldType::String,
            ValueType::Integer => FieldType::Integer,
            ValueType::Float => FieldType::Float,
            ValueType::Boolean => FieldType::Boolean,
        }
    }

    /// URL-decode `raw`, then parse it as this type.
    ///
    /// Booleans follow the lenient rule: `true` (any case) is true and every
    /// other string is false.
    pub fn parse(self, raw: &str) -> Option<Value> {
        let decoded = url_decode(raw).ok()?;
        match self {
            ValueType::String => Some(Value::String(decoded.into_owned())),
            ValueType::Integer => decoded.parse::<i64>().ok().map(Value::from),
            ValueType::Float => parse_decimal(&decoded).map(decimal_value),
            ValueType::Boolean => Some(Value::Bool(decoded.eq_ignore_ascii_case("true"))),
        }
    }
}
