//! Compiler module: builds one composite predicate and one sort plan from filter
//! and sort registrations, then applies both to a queryable source.
//!
//! A [`QueryCompiler`] is bound to a single source and schema. Registrations only
//! mutate the compiler; the source is touched once, by [`QueryCompiler::execute`],
//! which consumes the compiler.

use crate::cast::{JsonCaster, RawValue, ValueCaster};
use crate::expr::{fold, ComparisonOp, FilterExpr};
use crate::mode::{is_valid, Combinator, MatchMode};
use crate::ordering::{SortDirection, SortKey, SortPlan};
use crate::queryable::Queryable;
use crate::schema::FilterSchema;
use crate::types::LiteralValue;
use crate::TableFilterError;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use std::sync::Arc;
use tracing::{debug, trace};

/// One tick: the resolution of the day-range upper bound.
const TICK_NANOS: i64 = 100;

pub struct QueryCompiler<Q, C = JsonCaster> {
    source: Q,
    schema: Arc<FilterSchema>,
    caster: C,
    expression: Option<FilterExpr>,
    sort_plan: SortPlan,
}

impl<Q: Queryable> QueryCompiler<Q, JsonCaster> {
    pub fn new(source: Q, schema: Arc<FilterSchema>) -> Self {
        Self::with_caster(source, schema, JsonCaster)
    }
}

impl<Q: Queryable, C: ValueCaster> QueryCompiler<Q, C> {
    pub fn with_caster(source: Q, schema: Arc<FilterSchema>, caster: C) -> Self {
        Self {
            source,
            schema,
            caster,
            expression: None,
            sort_plan: SortPlan::new(),
        }
    }

    /// Compiles one filter entry and folds it into the composite expression.
    ///
    /// Unknown fields and null values are skipped without error. `MatchMode::In` is
    /// routed to [`QueryCompiler::add_membership`] and cannot be negated.
    pub fn add_predicate(
        &mut self,
        field: &str,
        value: &RawValue,
        mode: MatchMode,
        combinator: Combinator,
        negate: bool,
    ) -> Result<(), TableFilterError> {
        let Some((name, field_type)) = self.schema.resolve(field) else {
            debug!(field = %field, mode = %mode, "skipping filter on unknown field");
            return Ok(());
        };
        if mode == MatchMode::In {
            if negate {
                return Err(TableFilterError::NegatedMembership(name.to_string()));
            }
            return self.add_membership(field, value, combinator);
        }
        if !is_valid(field_type, mode) {
            return Err(TableFilterError::InvalidFilterMode {
                field: name.to_string(),
                mode,
            });
        }

        let cast = self.caster.cast(field_type, value)?;
        if cast.is_null() {
            debug!(field = %name, mode = %mode, "skipping filter with null value");
            return Ok(());
        }
        let predicate = match cast {
            LiteralValue::DateTime(dt) => date_predicate(name, dt, mode)?,
            LiteralValue::Bool(_) => FilterExpr::compare(name, ComparisonOp::Eq, cast),
            LiteralValue::String(_) => string_predicate(name, cast, mode)?,
            other => numeric_predicate(name, other, mode)?,
        };
        let predicate = if negate { predicate.negate() } else { predicate };
        self.push(predicate, combinator);
        Ok(())
    }

    /// Adds a membership test on `field`. `values` is cast to a list of the field's type.
    pub fn add_membership(&mut self, field: &str, values: &RawValue, combinator: Combinator) -> Result<(), TableFilterError> {
        let Some((name, field_type)) = self.schema.resolve(field) else {
            debug!(field = %field, "skipping membership filter on unknown field");
            return Ok(());
        };
        let values = self.caster.cast_list(field_type, values)?;
        let predicate = FilterExpr::In {
            field: name.to_string(),
            values,
        };
        self.push(predicate, combinator);
        Ok(())
    }

    /// Registers a sort key. A primary key restarts the plan; any other key is a
    /// tie-breaker after the keys already registered. Unknown fields are an error.
    pub fn add_sort_key(&mut self, field: &str, direction: SortDirection, is_primary: bool) -> Result<(), TableFilterError> {
        let (name, _) = self
            .schema
            .resolve(field)
            .ok_or_else(|| TableFilterError::UnknownSortField(field.to_string()))?;
        let key = SortKey::new(name, direction);
        trace!(field = %name, direction = %direction, primary = is_primary, "sort key registered");
        if is_primary || self.sort_plan.is_empty() {
            self.sort_plan.set_primary(key);
        } else {
            self.sort_plan.push_secondary(key);
        }
        Ok(())
    }

    /// The composite expression built so far, if any predicate was added.
    pub fn expression(&self) -> Option<&FilterExpr> {
        self.expression.as_ref()
    }

    pub fn sort_plan(&self) -> &SortPlan {
        &self.sort_plan
    }

    /// Applies the composite expression, then the sort plan, to the source.
    ///
    /// With nothing registered the source is returned unchanged.
    pub fn execute(self) -> Q {
        debug!(
            predicates = self.expression.as_ref().map_or(0, FilterExpr::leaf_count),
            sort_keys = self.sort_plan.len(),
            "executing compiled query"
        );
        let mut view = self.source;
        if let Some(expr) = &self.expression {
            view = view.apply_filter(expr);
        }
        if !self.sort_plan.is_empty() {
            view = view.apply_order(&self.sort_plan);
        }
        view
    }

    fn push(&mut self, predicate: FilterExpr, combinator: Combinator) {
        trace!(predicate = %predicate, combinator = ?combinator, "predicate folded");
        self.expression = Some(fold(self.expression.take(), predicate, combinator));
    }
}

/// Builds the predicate for a date-time filter value.
///
/// `DateIs` with a value whose hours, minutes and seconds are all zero matches the
/// whole calendar day, `[00:00:00, next day - 1 tick]`; with any time component it
/// matches the exact timestamp. `Before` and `After` are strict.
pub fn date_predicate(field: &str, value: NaiveDateTime, mode: MatchMode) -> Result<FilterExpr, TableFilterError> {
    match mode {
        MatchMode::DateIs => {
            let has_time = value.hour() > 0 || value.minute() > 0 || value.second() > 0;
            if has_time {
                Ok(FilterExpr::compare(field, ComparisonOp::Eq, value))
            } else {
                let start = value.date().and_time(NaiveTime::MIN);
                let end = start
                    .checked_add_signed(Duration::days(1) - Duration::nanoseconds(TICK_NANOS))
                    .unwrap_or(NaiveDateTime::MAX);
                Ok(FilterExpr::DateRange {
                    field: field.to_string(),
                    start,
                    end,
                })
            }
        }
        MatchMode::Before => Ok(FilterExpr::compare(field, ComparisonOp::Lt, value)),
        MatchMode::After => Ok(FilterExpr::compare(field, ComparisonOp::Gt, value)),
        other => Err(TableFilterError::InvalidFilterMode {
            field: field.to_string(),
            mode: other,
        }),
    }
}

fn string_predicate(field: &str, value: LiteralValue, mode: MatchMode) -> Result<FilterExpr, TableFilterError> {
    match mode {
        MatchMode::Equals | MatchMode::StartsWith | MatchMode::EndsWith | MatchMode::Contains => {
            let op = mode.comparison_op().ok_or_else(|| invalid_mode(field, mode))?;
            Ok(FilterExpr::compare(field, op, value))
        }
        other => Err(invalid_mode(field, other)),
    }
}

fn numeric_predicate(field: &str, value: LiteralValue, mode: MatchMode) -> Result<FilterExpr, TableFilterError> {
    match mode {
        MatchMode::Equals
        | MatchMode::LessThan
        | MatchMode::LessOrEqual
        | MatchMode::GreaterThan
        | MatchMode::GreaterOrEqual => {
            let op = mode.comparison_op().ok_or_else(|| invalid_mode(field, mode))?;
            Ok(FilterExpr::compare(field, op, value))
        }
        other => Err(invalid_mode(field, other)),
    }
}

fn invalid_mode(field: &str, mode: MatchMode) -> TableFilterError {
    TableFilterError::InvalidFilterMode {
        field: field.to_string(),
        mode,
    }
}
