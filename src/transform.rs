//! Declarative row transforms: filter and sort.
//!
//! Transforms are a tagged sum type validated at construction. A list of
//! transforms folds left over the row sequence; each transform produces a
//! new sequence and never mutates its input.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::value::{compare, contains_text, resolve_or_null, total_compare, values_equal};

/// Comparison operator for a filter transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterOp {
    /// Strict equality (default).
    #[default]
    #[serde(rename = "==")]
    Eq,
    /// Inequality. Accepts both `!=` and `<>` spellings.
    #[serde(rename = "!=", alias = "<>")]
    Ne,
    /// Greater than.
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,
    /// Less than.
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,
    /// Membership in a sequence value.
    #[serde(rename = "in")]
    In,
    /// Non-membership in a sequence value.
    #[serde(rename = "not_in")]
    NotIn,
    /// Array membership, or substring match on scalar targets.
    #[serde(rename = "contains")]
    Contains,
}

/// Sort direction for a sort transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// One declarative transform step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transform {
    /// Keep rows whose resolved field satisfies `op` against `value`.
    Filter {
        /// Dotted field path the predicate reads.
        field: String,
        /// Comparison operator, `==` when absent.
        #[serde(default)]
        op: FilterOp,
        /// Comparison operand.
        #[serde(default)]
        value: Value,
    },
    /// Stable sort on a resolved field.
    Sort {
        /// Dotted field path the comparator reads.
        field: String,
        /// Sort direction, ascending when absent.
        #[serde(default)]
        direction: SortDirection,
    },
}

impl Transform {
    /// Parse a transform list leniently.
    ///
    /// Entries that are not objects or do not match either variant are
    /// skipped; they never abort the remaining list. A non-array input
    /// yields no transforms.
    #[must_use]
    pub fn parse_list(value: &Value) -> Vec<Transform> {
        let Some(entries) = value.as_array() else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(transform) => Some(transform),
                Err(err) => {
                    warn!(%err, "skipping malformed transform");
                    None
                }
            })
            .collect()
    }

    /// Apply this transform to an owned row sequence.
    #[must_use]
    pub fn apply(&self, rows: Vec<Value>) -> Vec<Value> {
        match self {
            Transform::Filter { field, op, value } => rows
                .into_iter()
                .filter(|row| filter_matches(row, field, *op, value))
                .collect(),
            Transform::Sort { field, direction } => {
                let mut sorted = rows;
                sorted.sort_by(|a, b| {
                    let ordering =
                        total_compare(resolve_or_null(a, field), resolve_or_null(b, field));
                    match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                });
                sorted
            }
        }
    }
}

/// Fold a transform list over a row sequence, left to right.
#[must_use]
pub fn apply_all(rows: &[Value], transforms: &[Transform]) -> Vec<Value> {
    transforms
        .iter()
        .fold(rows.to_vec(), |current, transform| transform.apply(current))
}

fn filter_matches(row: &Value, field: &str, op: FilterOp, value: &Value) -> bool {
    let target = resolve_or_null(row, field);
    match op {
        FilterOp::Eq => values_equal(target, value),
        FilterOp::Ne => !values_equal(target, value),
        FilterOp::Gt => compare(target, value) == Some(Ordering::Greater),
        FilterOp::Ge => matches!(
            compare(target, value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lt => compare(target, value) == Some(Ordering::Less),
        FilterOp::Le => matches!(compare(target, value), Some(Ordering::Less | Ordering::Equal)),
        // A non-sequence operand excludes for `in` and includes for
        // `not_in` (default-safe policy).
        FilterOp::In => value
            .as_array()
            .is_some_and(|items| items.iter().any(|item| values_equal(target, item))),
        FilterOp::NotIn => !value
            .as_array()
            .is_some_and(|items| items.iter().any(|item| values_equal(target, item))),
        FilterOp::Contains => match target.as_array() {
            Some(items) => items.iter().any(|item| values_equal(item, value)),
            None => contains_text(target).contains(&contains_text(value)),
        },
    }
}
