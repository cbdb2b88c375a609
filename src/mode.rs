//! Match modes and combinators for filter entries.
//!
//! [`is_valid`] holds the type/mode compatibility matrix the compiler checks
//! before it builds any single-value predicate.

use crate::expr::ComparisonOp;
use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator selected per filter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    Equals,
    StartsWith,
    EndsWith,
    Contains,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    /// Day-range when the value has no time-of-day, exact match otherwise.
    DateIs,
    Before,
    After,
    /// Membership in a value list.
    In,
}

impl MatchMode {
    pub const ALL: [MatchMode; 12] = [
        MatchMode::Equals,
        MatchMode::StartsWith,
        MatchMode::EndsWith,
        MatchMode::Contains,
        MatchMode::LessThan,
        MatchMode::LessOrEqual,
        MatchMode::GreaterThan,
        MatchMode::GreaterOrEqual,
        MatchMode::DateIs,
        MatchMode::Before,
        MatchMode::After,
        MatchMode::In,
    ];

    /// The leaf comparator for modes that map onto one directly.
    pub fn comparison_op(self) -> Option<ComparisonOp> {
        match self {
            MatchMode::Equals => Some(ComparisonOp::Eq),
            MatchMode::StartsWith => Some(ComparisonOp::StartsWith),
            MatchMode::EndsWith => Some(ComparisonOp::EndsWith),
            MatchMode::Contains => Some(ComparisonOp::Contains),
            MatchMode::LessThan => Some(ComparisonOp::Lt),
            MatchMode::LessOrEqual => Some(ComparisonOp::Lte),
            MatchMode::GreaterThan => Some(ComparisonOp::Gt),
            MatchMode::GreaterOrEqual => Some(ComparisonOp::Gte),
            MatchMode::DateIs | MatchMode::Before | MatchMode::After | MatchMode::In => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Equals => "equals",
            MatchMode::StartsWith => "startsWith",
            MatchMode::EndsWith => "endsWith",
            MatchMode::Contains => "contains",
            MatchMode::LessThan => "lt",
            MatchMode::LessOrEqual => "lte",
            MatchMode::GreaterThan => "gt",
            MatchMode::GreaterOrEqual => "gte",
            MatchMode::DateIs => "dateIs",
            MatchMode::Before => "before",
            MatchMode::After => "after",
            MatchMode::In => "in",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a new predicate joins the composite expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    None,
    And,
    Or,
}

impl Combinator {
    /// Maps a wire operator string. Unknown or missing operators are `None`.
    pub fn from_operator(operator: Option<&str>) -> Self {
        match operator {
            Some(op) if op.eq_ignore_ascii_case("and") => Combinator::And,
            Some(op) if op.eq_ignore_ascii_case("or") => Combinator::Or,
            _ => Combinator::None,
        }
    }
}

/// Type/mode compatibility matrix. Optional wrappers are unwrapped first.
///
/// | Field type | Allowed modes |
/// |---|---|
/// | datetime | `DateIs`, `Before`, `After` |
/// | string | `Equals`, `StartsWith`, `EndsWith`, `Contains` |
/// | bool | `Equals` |
/// | int, float | `Equals`, `LessThan`, `LessOrEqual`, `GreaterThan`, `GreaterOrEqual` |
/// | other | none |
///
/// `In` is never valid here: membership filters bypass this check.
pub fn is_valid(field_type: &FieldType, mode: MatchMode) -> bool {
    use MatchMode::*;
    match field_type.unwrap_optional() {
        FieldType::DateTime => matches!(mode, DateIs | Before | After),
        FieldType::String => matches!(mode, Equals | StartsWith | EndsWith | Contains),
        FieldType::Bool => mode == Equals,
        FieldType::Int | FieldType::Float => matches!(
            mode,
            Equals | LessThan | LessOrEqual | GreaterThan | GreaterOrEqual
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(ty: &FieldType) -> Vec<MatchMode> {
        MatchMode::ALL
            .iter()
            .copied()
            .filter(|m| is_valid(ty, *m))
            .collect()
    }

    #[test]
    fn test_matrix_datetime() {
        let expected = vec![MatchMode::DateIs, MatchMode::Before, MatchMode::After];
        assert_eq!(allowed(&FieldType::DateTime), expected);
        assert_eq!(allowed(&FieldType::optional(FieldType::DateTime)), expected);
    }

    #[test]
    fn test_matrix_string() {
        assert_eq!(
            allowed(&FieldType::String),
            vec![
                MatchMode::Equals,
                MatchMode::StartsWith,
                MatchMode::EndsWith,
                MatchMode::Contains
            ]
        );
    }

    #[test]
    fn test_matrix_bool() {
        assert_eq!(allowed(&FieldType::Bool), vec![MatchMode::Equals]);
        assert_eq!(allowed(&FieldType::optional(FieldType::Bool)), vec![MatchMode::Equals]);
    }

    #[test]
    fn test_matrix_numeric() {
        let expected = vec![
            MatchMode::Equals,
            MatchMode::LessThan,
            MatchMode::LessOrEqual,
            MatchMode::GreaterThan,
            MatchMode::GreaterOrEqual,
        ];
        assert_eq!(allowed(&FieldType::Int), expected);
        assert_eq!(allowed(&FieldType::Float), expected);
        assert_eq!(allowed(&FieldType::optional(FieldType::Int)), expected);
    }

    #[test]
    fn test_matrix_other_always_invalid() {
        assert!(allowed(&FieldType::Other("Guid".into())).is_empty());
        assert!(allowed(&FieldType::optional(FieldType::Other("Guid".into()))).is_empty());
    }

    #[test]
    fn test_combinator_from_operator() {
        assert_eq!(Combinator::from_operator(Some("and")), Combinator::And);
        assert_eq!(Combinator::from_operator(Some("OR")), Combinator::Or);
        assert_eq!(Combinator::from_operator(Some("xor")), Combinator::None);
        assert_eq!(Combinator::from_operator(None), Combinator::None);
    }

    #[test]
    fn test_comparison_op_mapping() {
        assert_eq!(MatchMode::LessOrEqual.comparison_op(), Some(ComparisonOp::Lte));
        assert_eq!(MatchMode::Contains.comparison_op(), Some(ComparisonOp::Contains));
        assert_eq!(MatchMode::DateIs.comparison_op(), None);
        assert_eq!(MatchMode::In.comparison_op(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MatchMode::GreaterOrEqual.to_string(), "gte");
        assert_eq!(MatchMode::DateIs.to_string(), "dateIs");
    }
}
