//! Wire model of a table lazy-load request.
//!
//! Field names follow the widget's camelCase payload. The `filters` map keeps wire
//! order, which is the order predicates get folded in.

use crate::cast::RawValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableFilterRequest {
    /// Index of the first row of the requested page.
    pub first: usize,
    /// Page size; `0` disables paging.
    pub rows: usize,
    pub sort_field: Option<String>,
    /// `1` ascending, `-1` descending.
    pub sort_order: i32,
    pub multi_sort_meta: Option<Vec<SortMeta>>,
    pub filters: IndexMap<String, FilterConstraint>,
}

impl Default for TableFilterRequest {
    fn default() -> Self {
        Self {
            first: 0,
            rows: 0,
            sort_field: None,
            sort_order: 1,
            multi_sort_meta: None,
            filters: IndexMap::new(),
        }
    }
}

/// One filter entry as sent by the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterMetadata {
    #[serde(default)]
    pub value: RawValue,
    #[serde(default)]
    pub match_mode: String,
    #[serde(default)]
    pub operator: Option<String>,
}

impl FilterMetadata {
    pub fn new(value: RawValue, match_mode: impl Into<String>) -> Self {
        Self {
            value,
            match_mode: match_mode.into(),
            operator: None,
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }
}

/// A field's filter: a single entry, or a list of entries in menu mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterConstraint {
    Multiple(Vec<FilterMetadata>),
    Single(FilterMetadata),
}

impl FilterConstraint {
    pub fn entries(&self) -> &[FilterMetadata] {
        match self {
            FilterConstraint::Multiple(entries) => entries,
            FilterConstraint::Single(entry) => std::slice::from_ref(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortMeta {
    pub field: String,
    pub order: i32,
}
