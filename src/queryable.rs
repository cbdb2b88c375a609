//! Queryable module: the data source the compiled filter and ordering are applied to.
//!
//! Any provider (an in-memory collection, a query builder for a store) implements
//! [`Queryable`]. Every method consumes the current view and returns a new one.

use crate::expr::FilterExpr;
use crate::filter::CompiledFilter;
use crate::ordering::SortPlan;
use crate::record::Record;

pub trait Queryable: Sized {
    /// Keeps only the records matching `expr`.
    fn apply_filter(self, expr: &FilterExpr) -> Self;

    /// Orders the view by every key of `plan`. Must be stable.
    fn apply_order(self, plan: &SortPlan) -> Self;

    /// Number of records in the current view.
    fn count(&self) -> usize;

    /// Skips `first` records then keeps at most `rows`.
    fn page(self, first: usize, rows: usize) -> Self;
}

/// In-memory provider. Works for owned records and for `Vec<&R>`.
impl<R: Record> Queryable for Vec<R> {
    fn apply_filter(self, expr: &FilterExpr) -> Self {
        let filter = CompiledFilter::new(expr.clone());
        self.into_iter().filter(|rec| filter.matches(rec)).collect()
    }

    fn apply_order(mut self, plan: &SortPlan) -> Self {
        if !plan.is_empty() {
            self.sort_by(|a, b| plan.compare(a, b));
        }
        self
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn page(self, first: usize, rows: usize) -> Self {
        self.into_iter().skip(first).take(rows).collect()
    }
}
