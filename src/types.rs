//! Types module: defines declared field types and the values compared against them.
//!
//! This module provides the FieldType enum, the owned LiteralValue used for filter
//! constants, and the borrowed Value a record hands out for one of its fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a record field, resolved once when the schema is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FieldType {
    String,
    Bool,
    DateTime,
    Int,
    Float,
    /// Nullable wrapper; filters unwrap it before dispatching.
    Optional(Box<FieldType>),
    /// A type with no filter support (identifiers, nested objects, ...).
    /// Only membership tests and sorting can reach such a field.
    Other(String),
}

impl FieldType {
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// Strips every `Optional` layer.
    pub fn unwrap_optional(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::DateTime => write!(f, "datetime"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Optional(inner) => write!(f, "optional<{}>", inner),
            FieldType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A typed filter constant, produced by a value caster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LiteralValue {
    Null,
    String(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    Int(i64),
    Float(f64),
}

impl LiteralValue {
    /// Borrowed view, comparable with the values records return.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            LiteralValue::Null => Value::Null,
            LiteralValue::String(s) => Value::String(s),
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::DateTime(dt) => Value::DateTime(*dt),
            LiteralValue::Int(i) => Value::Int(*i),
            LiteralValue::Float(f) => Value::Float(*f),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LiteralValue::Null)
    }

    /// Whether this value may be stored in a field of type `ty`.
    ///
    /// Null is accepted by optional fields and by strings, which are nullable
    /// references on the wire. Ints are accepted by float fields.
    pub fn conforms_to(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (LiteralValue::Null, FieldType::Optional(_) | FieldType::String) => true,
            (value, FieldType::Optional(inner)) => value.conforms_to(inner),
            (LiteralValue::String(_), FieldType::String | FieldType::Other(_)) => true,
            (LiteralValue::Bool(_), FieldType::Bool) => true,
            (LiteralValue::DateTime(_), FieldType::DateTime) => true,
            (LiteralValue::Int(_), FieldType::Int | FieldType::Float) => true,
            (LiteralValue::Float(_), FieldType::Float) => true,
            (LiteralValue::Int(_), FieldType::Other(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_value().fmt(f)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

impl From<i64> for LiteralValue {
    fn from(i: i64) -> Self {
        LiteralValue::Int(i)
    }
}

impl From<i32> for LiteralValue {
    fn from(i: i32) -> Self {
        LiteralValue::Int(i as i64)
    }
}

impl From<f64> for LiteralValue {
    fn from(f: f64) -> Self {
        LiteralValue::Float(f)
    }
}

impl From<NaiveDateTime> for LiteralValue {
    fn from(dt: NaiveDateTime) -> Self {
        LiteralValue::DateTime(dt)
    }
}

/// Runtime value of a record field, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Field is null, absent, or not exposed by the record.
    Null,
    String(&'a str),
    Bool(bool),
    DateTime(NaiveDateTime),
    Int(i64),
    Float(f64),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used for mixed int/float comparison.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

macro_rules! int_values {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

int_values!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value<'_> {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
