//! Filter module: compiles a predicate tree into a closure over records.
//!
//! This module provides the CompiledFilter type, used by in-memory query providers
//! to evaluate a [`FilterExpr`] once per record without re-walking the tree shape.

use crate::expr::{ComparisonOp, FilterExpr, LogicalOp};
use crate::ordering::compare_values;
use crate::record::Record;
use crate::types::{LiteralValue, Value};
use std::cmp::Ordering;

type Predicate = Box<dyn Fn(&dyn Record) -> bool + Send + Sync + 'static>;

/// A compiled filter, ready for execution.
pub struct CompiledFilter {
    predicate: Predicate,
    expr: FilterExpr,
}

impl CompiledFilter {
    pub fn new(expr: FilterExpr) -> Self {
        let predicate = compile(&expr);
        Self { predicate, expr }
    }

    /// Evaluate the filter against one record.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        (self.predicate)(record)
    }

    pub fn expr(&self) -> &FilterExpr {
        &self.expr
    }
}

impl std::fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledFilter").field("expr", &self.expr).finish()
    }
}

fn compile(expr: &FilterExpr) -> Predicate {
    match expr {
        FilterExpr::LogicalOp { op, left, right } => {
            let l = compile(left);
            let r = compile(right);
            match op {
                LogicalOp::And => Box::new(move |rec: &dyn Record| l(rec) && r(rec)),
                LogicalOp::Or => Box::new(move |rec: &dyn Record| l(rec) || r(rec)),
            }
        }
        FilterExpr::Not(inner) => {
            let inner_fn = compile(inner);
            Box::new(move |rec: &dyn Record| !inner_fn(rec))
        }
        FilterExpr::Comparison { field, op, value } => {
            let field = field.clone();
            let value = value.clone();
            let op = *op;
            Box::new(move |rec: &dyn Record| cmp_leaf(op, rec.field_value(&field), &value))
        }
        FilterExpr::In { field, values } => {
            let field = field.clone();
            let values = values.clone();
            Box::new(move |rec: &dyn Record| cmp_in(rec.field_value(&field), &values))
        }
        FilterExpr::DateRange { field, start, end } => {
            let field = field.clone();
            let (start, end) = (*start, *end);
            Box::new(move |rec: &dyn Record| match rec.field_value(&field) {
                Value::DateTime(dt) => start <= dt && dt <= end,
                _ => false,
            })
        }
    }
}

// Null on either side only ever equals null; every other test against null is false.
fn cmp_leaf(op: ComparisonOp, actual: Value<'_>, expected: &LiteralValue) -> bool {
    let expected = expected.as_value();
    match op {
        ComparisonOp::Eq => values_equal(actual, expected),
        ComparisonOp::Lt => cmp_ord(actual, expected, Ordering::is_lt),
        ComparisonOp::Lte => cmp_ord(actual, expected, Ordering::is_le),
        ComparisonOp::Gt => cmp_ord(actual, expected, Ordering::is_gt),
        ComparisonOp::Gte => cmp_ord(actual, expected, Ordering::is_ge),
        ComparisonOp::StartsWith => cmp_str(actual, expected, |h, n| h.starts_with(n)),
        ComparisonOp::EndsWith => cmp_str(actual, expected, |h, n| h.ends_with(n)),
        ComparisonOp::Contains => cmp_str(actual, expected, |h, n| h.contains(n)),
    }
}

fn values_equal(a: Value<'_>, b: Value<'_>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => compare_values(&a, &b) == Some(Ordering::Equal),
    }
}

// Helper for ordered comparisons
fn cmp_ord<F>(a: Value<'_>, b: Value<'_>, accept: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    if a.is_null() || b.is_null() {
        return false;
    }
    compare_values(&a, &b).map(accept).unwrap_or(false)
}

// Helper for startsWith/endsWith/contains
fn cmp_str<F>(a: Value<'_>, b: Value<'_>, test: F) -> bool
where
    F: Fn(&str, &str) -> bool,
{
    match (a.as_str(), b.as_str()) {
        (Some(haystack), Some(needle)) => test(haystack, needle),
        _ => false,
    }
}

/// A null field matches only a list holding a null element.
fn cmp_in(a: Value<'_>, values: &[LiteralValue]) -> bool {
    values.iter().any(|v| values_equal(a, v.as_value()))
}
