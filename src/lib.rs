//! Tablefilter: compiles data-table widget filter and sort requests into queries.
//!
//! A front-end table sends per-column filter metadata (a value, a match mode and an
//! optional `and`/`or` operator) plus sort instructions. This crate validates each
//! request against a [`FilterSchema`], folds the predicates into one [`FilterExpr`],
//! builds a [`SortPlan`] and applies both to any [`Queryable`] source.
//!
//! # Layers
//! - Schema and types: field names, field types, literal values
//! - Match modes and the type/mode validity matrix
//! - [`QueryCompiler`]: predicate, date and membership compilation, combinator folding, ordering
//! - [`TableFilter`]: wire match-mode names, sort orders and paging over a whole request
//! - [`Queryable`] providers, with an in-memory one for `Vec<R: Record>`
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use tablefilter::{FieldType, FilterSchemaBuilder, MapRecord, TableFilter, TableFilterRequest};
//!
//! let schema = Arc::new(FilterSchemaBuilder::new().field("Name", FieldType::String).build());
//! let rows = vec![
//!     MapRecord::new().with("name", "Ann", &schema).unwrap(),
//!     MapRecord::new().with("name", "Bob", &schema).unwrap(),
//! ];
//! let request: TableFilterRequest = serde_json::from_value(json!({
//!     "filters": { "name": { "value": "an", "matchMode": "contains" } }
//! })).unwrap();
//!
//! let page = TableFilter::apply(rows, schema, &request).unwrap();
//! assert_eq!(page.total_records, 1);
//! ```

mod cast;
mod compiler;
mod expr;
mod filter;
mod mode;
mod ordering;
mod queryable;
mod record;
mod request;
mod schema;
mod table;
mod types;

pub use cast::*;
pub use compiler::*;
pub use expr::*;
pub use filter::*;
pub use mode::*;
pub use ordering::*;
pub use queryable::*;
pub use record::*;
pub use request::*;
pub use schema::*;
pub use table::*;
pub use types::*;

use thiserror::Error;

/// Unified error type for filter compilation and request handling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TableFilterError {
    #[error("match mode {mode} is not valid for field {field}")]
    InvalidFilterMode { field: String, mode: MatchMode },
    #[error("invalid match mode: {0}")]
    InvalidMatchMode(String),
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),
    #[error("invalid sort order: {0}")]
    InvalidSortDirection(i32),
    #[error("membership filter on {0} cannot be negated")]
    NegatedMembership(String),
    #[error("field not found: {0}")]
    FieldNotFound(String),
    #[error("field {field} expects {expected}, got {found}")]
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        found: LiteralValue,
    },
    #[error(transparent)]
    Cast(#[from] CastError),
}
