//! Ordering types for result sorting.
//!
//! Provides [`SortDirection`], [`SortKey`] and the multi-key [`SortPlan`]. The first
//! key of a plan is the primary ordering; later keys only break ties, in the order
//! they were registered.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::types::Value;
use crate::TableFilterError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortDirection {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Wire sort orders: `1` is ascending, `-1` descending.
impl TryFrom<i32> for SortDirection {
    type Error = TableFilterError;

    fn try_from(order: i32) -> Result<Self, Self::Error> {
        match order {
            1 => Ok(SortDirection::Asc),
            -1 => Ok(SortDirection::Desc),
            other => Err(TableFilterError::InvalidSortDirection(other)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Canonical schema name of the field to sort by.
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        SortKey {
            field: field.into(),
            direction,
        }
    }

    /// Compares two values according to this key.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
        let base_ordering = compare_nullable(a, b)?;
        Some(self.direction.apply(base_ordering))
    }
}

/// Ordered sequence of sort keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPlan {
    keys: Vec<SortKey>,
}

impl SortPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the plan over with `key` as the only, primary key.
    pub fn set_primary(&mut self, key: SortKey) {
        self.keys.clear();
        self.keys.push(key);
    }

    /// Appends a tie-breaker after every existing key.
    pub fn push_secondary(&mut self, key: SortKey) {
        self.keys.push(key);
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compares two records key by key. All-equal yields `Equal`.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        for key in &self.keys {
            let val_a = a.field_value(&key.field);
            let val_b = b.field_value(&key.field);

            if let Some(ordering) = key.compare(&val_a, &val_b) {
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            // Incomparable values (type mismatch, NaN) count as equal
        }
        Ordering::Equal
    }
}

/// Compares two non-null values of the same type.
///
/// Ints and floats compare with each other through `f64`. Returns `None` for a type
/// mismatch, NaN, or a null on either side.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        _ => None,
    }
}

/// Like [`compare_values`], with null ordered before every other value.
pub fn compare_nullable(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        _ => compare_values(a, b),
    }
}
