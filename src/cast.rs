//! Cast module: converts untyped wire values into a field's declared type.
//!
//! The compiler only depends on the [`ValueCaster`] trait. [`JsonCaster`] is the
//! default implementation for `serde_json` wire values.

use crate::types::{FieldType, LiteralValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// An untyped filter value as it arrives on the wire.
pub type RawValue = serde_json::Value;

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CastError {
    #[error("cannot cast {found} to {expected}")]
    TypeMismatch { expected: FieldType, found: RawValue },
    #[error("invalid date-time value '{0}'")]
    InvalidDateTime(String),
    #[error("null is not a valid {0} value")]
    NullNotAllowed(FieldType),
    #[error("expected a list of {expected}, got {found}")]
    NotAList { expected: FieldType, found: RawValue },
}

pub trait ValueCaster {
    fn cast(&self, field_type: &FieldType, raw: &RawValue) -> Result<LiteralValue, CastError>;

    /// Casts every element of a wire array to `element_type`.
    fn cast_list(&self, element_type: &FieldType, raw: &RawValue) -> Result<Vec<LiteralValue>, CastError> {
        match raw {
            RawValue::Array(items) => items.iter().map(|item| self.cast(element_type, item)).collect(),
            other => Err(CastError::NotAList {
                expected: element_type.clone(),
                found: other.clone(),
            }),
        }
    }
}

/// Lenient JSON caster: numbers and booleans may also arrive as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCaster;

impl ValueCaster for JsonCaster {
    fn cast(&self, field_type: &FieldType, raw: &RawValue) -> Result<LiteralValue, CastError> {
        let mismatch = || CastError::TypeMismatch {
            expected: field_type.clone(),
            found: raw.clone(),
        };
        match (field_type, raw) {
            (FieldType::Optional(_), RawValue::Null) => Ok(LiteralValue::Null),
            (FieldType::Optional(inner), _) => self.cast(inner, raw),
            (_, RawValue::Null) => Err(CastError::NullNotAllowed(field_type.clone())),

            (FieldType::String | FieldType::Other(_), RawValue::String(s)) => Ok(LiteralValue::String(s.clone())),
            (FieldType::String | FieldType::Other(_), RawValue::Number(n)) => Ok(LiteralValue::String(n.to_string())),
            (FieldType::String, RawValue::Bool(b)) => Ok(LiteralValue::String(b.to_string())),

            (FieldType::Bool, RawValue::Bool(b)) => Ok(LiteralValue::Bool(*b)),
            (FieldType::Bool, RawValue::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(LiteralValue::Bool(true)),
                "false" => Ok(LiteralValue::Bool(false)),
                _ => Err(mismatch()),
            },

            (FieldType::Int, RawValue::Number(n)) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(LiteralValue::Int(i)),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(LiteralValue::Int(f as i64)),
                _ => Err(mismatch()),
            },
            (FieldType::Int, RawValue::String(s)) => s.trim().parse().map(LiteralValue::Int).map_err(|_| mismatch()),

            (FieldType::Float, RawValue::Number(n)) => n.as_f64().map(LiteralValue::Float).ok_or_else(mismatch),
            (FieldType::Float, RawValue::String(s)) => s.trim().parse().map(LiteralValue::Float).map_err(|_| mismatch()),

            (FieldType::DateTime, RawValue::String(s)) => parse_datetime(s).map(LiteralValue::DateTime),

            _ => Err(mismatch()),
        }
    }
}

/// Parses an ISO-8601 timestamp or a bare `YYYY-MM-DD` date.
///
/// Timestamps carrying an offset are converted to UTC.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, CastError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CastError::InvalidDateTime(s.to_string()))
}
