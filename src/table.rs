//! Table module: applies a whole widget request to a queryable source.
//!
//! [`TableFilter`] translates wire match-mode names and sort orders into
//! [`QueryCompiler`] registrations; [`TableFilter::apply`] runs a complete
//! [`TableFilterRequest`] including paging.

use crate::cast::{JsonCaster, ValueCaster};
use crate::compiler::QueryCompiler;
use crate::mode::{Combinator, MatchMode};
use crate::ordering::SortDirection;
use crate::queryable::Queryable;
use crate::request::{FilterConstraint, FilterMetadata, SortMeta, TableFilterRequest};
use crate::schema::FilterSchema;
use crate::TableFilterError;
use std::sync::Arc;
use tracing::debug;

/// Resolves a wire match-mode name into a mode and a negation flag.
pub fn parse_match_mode(name: &str) -> Result<(MatchMode, bool), TableFilterError> {
    let parsed = match name {
        "startsWith" => (MatchMode::StartsWith, false),
        "contains" => (MatchMode::Contains, false),
        "notContains" => (MatchMode::Contains, true),
        "endsWith" => (MatchMode::EndsWith, false),
        "equals" => (MatchMode::Equals, false),
        "notEquals" => (MatchMode::Equals, true),
        "in" => (MatchMode::In, false),
        "lt" => (MatchMode::LessThan, false),
        "lte" => (MatchMode::LessOrEqual, false),
        "gt" => (MatchMode::GreaterThan, false),
        "gte" => (MatchMode::GreaterOrEqual, false),
        "dateIs" => (MatchMode::DateIs, false),
        "dateIsNot" => (MatchMode::DateIs, true),
        "dateBefore" | "before" => (MatchMode::Before, false),
        "dateAfter" | "after" => (MatchMode::After, false),
        other => return Err(TableFilterError::InvalidMatchMode(other.to_string())),
    };
    Ok(parsed)
}

/// One page of a filtered, ordered view.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<Q> {
    pub items: Q,
    /// Records matching the filters, before paging.
    pub total_records: usize,
}

pub struct TableFilter<Q, C = JsonCaster> {
    compiler: QueryCompiler<Q, C>,
}

impl<Q: Queryable> TableFilter<Q, JsonCaster> {
    pub fn new(source: Q, schema: Arc<FilterSchema>) -> Self {
        Self {
            compiler: QueryCompiler::new(source, schema),
        }
    }

    /// Filters, counts, sorts and pages `source` as `request` describes.
    pub fn apply(source: Q, schema: Arc<FilterSchema>, request: &TableFilterRequest) -> Result<TablePage<Q>, TableFilterError> {
        Self::new(source, schema).run(request)
    }
}

impl<Q: Queryable, C: ValueCaster> TableFilter<Q, C> {
    pub fn with_caster(source: Q, schema: Arc<FilterSchema>, caster: C) -> Self {
        Self {
            compiler: QueryCompiler::with_caster(source, schema, caster),
        }
    }

    /// Registers a single-constraint filter. Its operator is ignored and it joins
    /// with AND. A null value registers nothing.
    pub fn filter_field(&mut self, field: &str, entry: &FilterMetadata) -> Result<(), TableFilterError> {
        self.register(field, entry, Combinator::None)
    }

    /// Registers every entry of a menu-mode filter in order, each with its own operator.
    pub fn filter_field_entries(&mut self, field: &str, entries: &[FilterMetadata]) -> Result<(), TableFilterError> {
        entries.iter().try_for_each(|entry| {
            let combinator = Combinator::from_operator(entry.operator.as_deref());
            self.register(field, entry, combinator)
        })
    }

    fn register(&mut self, field: &str, entry: &FilterMetadata, combinator: Combinator) -> Result<(), TableFilterError> {
        if entry.value.is_null() {
            debug!(field = %field, match_mode = %entry.match_mode, "skipping filter with null value");
            return Ok(());
        }
        let (mode, negate) = parse_match_mode(&entry.match_mode)?;
        // endsWith and notContains always join with AND
        let combinator = match entry.match_mode.as_str() {
            "endsWith" | "notContains" => Combinator::None,
            _ => combinator,
        };
        self.compiler
            .add_predicate(field, &entry.value, mode, combinator, negate)
    }

    /// Single-column sort with a wire order (`1` / `-1`).
    pub fn order_single(&mut self, field: &str, order: i32) -> Result<(), TableFilterError> {
        let direction = SortDirection::try_from(order)?;
        self.compiler.add_sort_key(field, direction, true)
    }

    /// Multi-column sort; the first entry is the primary key.
    pub fn order_multiple(&mut self, metas: &[SortMeta]) -> Result<(), TableFilterError> {
        for (i, meta) in metas.iter().enumerate() {
            let direction = SortDirection::try_from(meta.order)?;
            self.compiler.add_sort_key(&meta.field, direction, i == 0)?;
        }
        Ok(())
    }

    pub fn compiler(&self) -> &QueryCompiler<Q, C> {
        &self.compiler
    }

    /// Applies everything registered so far.
    pub fn execute(self) -> Q {
        self.compiler.execute()
    }

    /// Registers the request's filters and sort keys, executes, then pages.
    pub fn run(mut self, request: &TableFilterRequest) -> Result<TablePage<Q>, TableFilterError> {
        for (field, constraint) in &request.filters {
            match constraint {
                FilterConstraint::Single(entry) => self.filter_field(field, entry)?,
                FilterConstraint::Multiple(entries) => self.filter_field_entries(field, entries)?,
            }
        }
        match (&request.multi_sort_meta, &request.sort_field) {
            (Some(metas), _) if !metas.is_empty() => self.order_multiple(metas)?,
            (_, Some(field)) if !field.is_empty() => self.order_single(field, request.sort_order)?,
            _ => {}
        }

        let view = self.execute();
        let total_records = view.count();
        let items = if request.rows > 0 {
            view.page(request.first, request.rows)
        } else {
            view
        };
        Ok(TablePage { items, total_records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MapRecord;
    use crate::schema::FilterSchemaBuilder;
    use crate::types::{FieldType, LiteralValue};
    use serde_json::json;

    fn schema() -> Arc<FilterSchema> {
        Arc::new(
            FilterSchemaBuilder::new()
                .field("Name", FieldType::String)
                .field("Age", FieldType::optional(FieldType::Int))
                .build(),
        )
    }

    fn rows() -> Vec<MapRecord> {
        let sch = schema();
        [("Ann", Some(30)), ("Dan", Some(25)), ("Bob", None), ("Eve", Some(52))]
            .into_iter()
            .map(|(name, age)| {
                let rec = MapRecord::new().with("name", name, &sch).unwrap();
                let age = age.map(LiteralValue::Int).unwrap_or(LiteralValue::Null);
                rec.with("age", age, &sch).unwrap()
            })
            .collect()
    }

    fn names(rows: &[MapRecord]) -> Vec<String> {
        rows.iter()
            .map(|r| match r.get("Name") {
                Some(LiteralValue::String(s)) => s.clone(),
                _ => String::new(),
            })
            .collect()
    }

    #[test]
    fn test_parse_match_mode() {
        assert_eq!(parse_match_mode("notContains").unwrap(), (MatchMode::Contains, true));
        assert_eq!(parse_match_mode("dateIsNot").unwrap(), (MatchMode::DateIs, true));
        assert_eq!(parse_match_mode("dateBefore").unwrap(), (MatchMode::Before, false));
        assert_eq!(parse_match_mode("gte").unwrap(), (MatchMode::GreaterOrEqual, false));
        for unsupported in ["between", "is", "isNot", "regex", ""] {
            assert!(matches!(
                parse_match_mode(unsupported),
                Err(TableFilterError::InvalidMatchMode(_))
            ));
        }
    }

    #[test]
    fn test_null_value_is_skipped() {
        let mut table = TableFilter::new(rows(), schema());
        table
            .filter_field("name", &FilterMetadata::new(json!(null), "between"))
            .unwrap();
        assert!(table.compiler().expression().is_none());
    }

    #[test]
    fn test_not_equals() {
        let mut table = TableFilter::new(rows(), schema());
        table
            .filter_field("age", &FilterMetadata::new(json!(30), "notEquals"))
            .unwrap();
        assert_eq!(names(&table.execute()), vec!["Dan", "Bob", "Eve"]);
    }

    #[test]
    fn test_entries_use_their_own_operators() {
        let mut table = TableFilter::new(rows(), schema());
        let entries = [
            FilterMetadata::new(json!(26), "lt"),
            FilterMetadata::new(json!(50), "gt").with_operator("or"),
        ];
        table.filter_field_entries("age", &entries).unwrap();
        assert_eq!(names(&table.execute()), vec!["Dan", "Eve"]);
    }

    #[test]
    fn test_ends_with_and_not_contains_ignore_operator() {
        let sch = schema();
        let boxes = || -> Vec<MapRecord> {
            ["Ann", "Box", "Cid"]
                .into_iter()
                .map(|name| MapRecord::new().with("name", name, &sch).unwrap())
                .collect()
        };

        let mut table = TableFilter::new(boxes(), schema());
        let entries = [
            FilterMetadata::new(json!("A"), "startsWith").with_operator("or"),
            FilterMetadata::new(json!("x"), "endsWith").with_operator("or"),
        ];
        table.filter_field_entries("name", &entries).unwrap();
        assert!(table.execute().is_empty());

        let mut table = TableFilter::new(boxes(), schema());
        let entries = [
            FilterMetadata::new(json!("A"), "startsWith").with_operator("or"),
            FilterMetadata::new(json!("i"), "notContains").with_operator("or"),
        ];
        table.filter_field_entries("name", &entries).unwrap();
        assert_eq!(names(&table.execute()), vec!["Ann"]);
    }

    #[test]
    fn test_single_constraint_ignores_operator() {
        let request: TableFilterRequest = serde_json::from_value(json!({
            "filters": {
                "name": { "value": "A", "matchMode": "startsWith" },
                "age": { "value": 50, "matchMode": "gt", "operator": "or" }
            }
        }))
        .unwrap();
        let page = TableFilter::apply(rows(), schema(), &request).unwrap();
        assert_eq!(page.total_records, 0);
    }

    #[test]
    fn test_null_entry_without_match_mode_is_skipped() {
        let request: TableFilterRequest = serde_json::from_value(json!({
            "filters": { "name": [{ "value": null }] }
        }))
        .unwrap();
        let page = TableFilter::apply(rows(), schema(), &request).unwrap();
        assert_eq!(page.total_records, 4);
    }

    #[test]
    fn test_invalid_sort_order() {
        let mut table = TableFilter::new(rows(), schema());
        assert!(matches!(
            table.order_single("name", 2),
            Err(TableFilterError::InvalidSortDirection(2))
        ));
    }

    #[test]
    fn test_run_multi_sort_takes_precedence() {
        let request = TableFilterRequest {
            sort_field: Some("name".into()),
            sort_order: 1,
            multi_sort_meta: Some(vec![SortMeta {
                field: "age".into(),
                order: -1,
            }]),
            ..Default::default()
        };
        let page = TableFilter::apply(rows(), schema(), &request).unwrap();
        assert_eq!(names(&page.items), vec!["Eve", "Ann", "Dan", "Bob"]);
    }

    #[test]
    fn test_run_pages_after_counting() {
        let request: TableFilterRequest = serde_json::from_value(json!({
            "first": 1,
            "rows": 1,
            "sortField": "name",
            "sortOrder": 1,
            "filters": { "age": { "value": 26, "matchMode": "gte" } }
        }))
        .unwrap();
        let page = TableFilter::apply(rows(), schema(), &request).unwrap();
        assert_eq!(page.total_records, 2);
        assert_eq!(names(&page.items), vec!["Eve"]);
    }
}
