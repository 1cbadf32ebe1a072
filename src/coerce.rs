use crate::errors::{FqlError, Result};
use crate::filter::Operand;
use crate::path::resolve;
use crate::shape::Shape;
use crate::value::{FieldType, Value};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Turn the textual value of a filter item into the right-hand operand.
///
/// With `value_is_field` the literal is itself a path on the same model and
/// yields a second accessor; otherwise it is parsed as `target`.
pub fn coerce(literal: &str, target: &FieldType, value_is_field: bool, shape: &Shape) -> Result<Operand> {
    if value_is_field {
        return resolve(shape, literal).map(Operand::Field);
    }
    parse_literal(literal, target).map(Operand::Literal)
}

/// Parse `literal` into the runtime representation of `target`.
/// Strings pass through untouched; everything else is trimmed first.
pub fn parse_literal(literal: &str, target: &FieldType) -> Result<Value> {
    let text = literal.trim();
    let parsed = match target {
        FieldType::String => return Ok(Value::String(literal.to_string())),
        FieldType::Bool => parse_bool(text).map(Value::Bool),
        FieldType::Int => text.parse::<i64>().ok().map(Value::Int),
        FieldType::Float => text.parse::<f64>().ok().filter(|x| x.is_finite()).map(Value::Float),
        FieldType::Decimal => BigDecimal::from_str(text).ok().map(Value::Decimal),
        FieldType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT).ok().map(Value::Date),
        FieldType::DateTime => parse_datetime(text).map(Value::DateTime),
        FieldType::Enum(members) => members
            .iter()
            .position(|member| member == text)
            .map(|ordinal| Value::Enum {
                ordinal,
                name: members[ordinal].clone(),
            }),
        FieldType::Object(_) => None,
    };
    parsed.ok_or_else(|| FqlError::Coercion {
        literal: literal.to_string(),
        target: target.describe(),
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// RFC 3339 first, then naive forms read as UTC, then a bare date at midnight.
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|t| t.and_utc())
}
