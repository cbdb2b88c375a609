//! Expression (AST) module: defines the predicate tree the compiler builds.
//!
//! This module provides the FilterExpr type and related AST node types. Leaves are
//! typed comparisons against a single field; interior nodes are NOT and the binary
//! AND/OR produced by [`fold`].

use crate::mode::Combinator;
use crate::types::{LiteralValue, Value};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FilterExpr {
    LogicalOp {
        op: LogicalOp,
        left: Box<FilterExpr>,
        right: Box<FilterExpr>,
    },
    Comparison {
        field: String,
        op: ComparisonOp,
        value: LiteralValue,
    },
    /// Field value is one of `values`.
    In {
        field: String,
        values: Vec<LiteralValue>,
    },
    /// `start <= field <= end`, both bounds inclusive.
    DateRange {
        field: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Not(Box<FilterExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ComparisonOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    StartsWith,
    EndsWith,
    Contains, // substring
}

impl ComparisonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::StartsWith => "startsWith",
            ComparisonOp::EndsWith => "endsWith",
            ComparisonOp::Contains => "contains",
        }
    }
}

impl FilterExpr {
    pub fn compare(field: impl Into<String>, op: ComparisonOp, value: impl Into<LiteralValue>) -> Self {
        FilterExpr::Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn negate(self) -> Self {
        FilterExpr::Not(Box::new(self))
    }

    pub fn and(self, right: FilterExpr) -> Self {
        FilterExpr::LogicalOp {
            op: LogicalOp::And,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub fn or(self, right: FilterExpr) -> Self {
        FilterExpr::LogicalOp {
            op: LogicalOp::Or,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Number of leaf predicates in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterExpr::LogicalOp { left, right, .. } => left.leaf_count() + right.leaf_count(),
            FilterExpr::Not(inner) => inner.leaf_count(),
            _ => 1,
        }
    }
}

/// Extends the composite expression with `next`.
///
/// The chain is global and left-to-right: `Or` joins with OR, both `And` and
/// `None` join with AND, and nothing is grouped by field.
pub fn fold(existing: Option<FilterExpr>, next: FilterExpr, combinator: Combinator) -> FilterExpr {
    match existing {
        None => next,
        Some(expr) => match combinator {
            Combinator::Or => expr.or(next),
            Combinator::And | Combinator::None => expr.and(next),
        },
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::LogicalOp { op, left, right } => {
                let op = match op {
                    LogicalOp::And => "AND",
                    LogicalOp::Or => "OR",
                };
                write!(f, "({} {} {})", left, op, right)
            }
            FilterExpr::Comparison { field, op, value } => {
                write!(f, "{} {} {}", field, op.as_str(), value)
            }
            FilterExpr::In { field, values } => {
                write!(f, "{} in [", field)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            FilterExpr::DateRange { field, start, end } => write!(
                f,
                "{} between {} and {}",
                field,
                Value::DateTime(*start),
                Value::DateTime(*end)
            ),
            FilterExpr::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}
