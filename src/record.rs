//! Record module: by-name field access for the records being filtered.
//!
//! This module provides the Record trait and MapRecord, a schema-checked dynamic
//! record for rows that have no Rust struct of their own.

use crate::schema::FilterSchema;
use crate::types::{LiteralValue, Value};
use crate::TableFilterError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A record whose fields can be read by their schema name.
///
/// ```
/// use tablefilter::{Record, Value};
///
/// struct Person {
///     name: Option<String>,
///     age: i32,
/// }
///
/// impl Record for Person {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Name" => self.name.as_ref().into(),
///             "Age" => self.age.into(),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of `field`, or `Value::Null` when it is unset or unknown.
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    values: HashMap<String, LiteralValue>,
}

impl MapRecord {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Stores `value` under the schema's name for `field` after a type check.
    pub fn set(&mut self, field: &str, value: LiteralValue, schema: &FilterSchema) -> Result<(), TableFilterError> {
        match schema.resolve(field) {
            Some((name, expected_type)) => {
                if value.conforms_to(expected_type) {
                    self.values.insert(name.to_string(), value);
                    Ok(())
                } else {
                    Err(TableFilterError::FieldTypeMismatch {
                        field: name.to_string(),
                        expected: expected_type.clone(),
                        found: value,
                    })
                }
            }
            None => Err(TableFilterError::FieldNotFound(field.to_string())),
        }
    }

    /// Builder-style [`MapRecord::set`].
    pub fn with(mut self, field: &str, value: impl Into<LiteralValue>, schema: &FilterSchema) -> Result<Self, TableFilterError> {
        self.set(field, value.into(), schema)?;
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&LiteralValue> {
        self.values.get(field)
    }

    pub fn values(&self) -> &HashMap<String, LiteralValue> {
        &self.values
    }
}

impl Record for MapRecord {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.values
            .get(field)
            .map(LiteralValue::as_value)
            .unwrap_or(Value::Null)
    }
}
