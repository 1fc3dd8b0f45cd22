//! Encoding slots: named mappings from chart roles to row fields.
//!
//! Builders never read slots directly; they go through the alias
//! resolution helpers (`x` falls back to `category`, `y` to `value`,
//! `series` to `group` to `color`).

use serde::Deserialize;
use serde_json::Value;

use crate::aggregate::Aggregation;
use crate::error::{Error, Result};

/// One encoding slot: a field path plus an optional aggregation name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Encoding {
    /// Dotted path into each row.
    pub field: String,
    /// Aggregation name; both `agg` and `aggregate` spellings accepted.
    #[serde(default, alias = "aggregate")]
    pub agg: Option<String>,
}

impl Encoding {
    /// An encoding for a plain field with no aggregation.
    #[must_use]
    pub fn field(path: impl Into<String>) -> Self {
        Self {
            field: path.into(),
            agg: None,
        }
    }

    /// An encoding with an aggregation name.
    #[must_use]
    pub fn aggregated(path: impl Into<String>, agg: impl Into<String>) -> Self {
        Self {
            field: path.into(),
            agg: Some(agg.into()),
        }
    }
}

/// The full set of named encoding slots a chart spec may carry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncodingMap {
    /// Horizontal axis.
    pub x: Option<Encoding>,
    /// Vertical axis.
    pub y: Option<Encoding>,
    /// Series split.
    pub series: Option<Encoding>,
    /// Categorical axis alias for `x`.
    pub category: Option<Encoding>,
    /// Measured value alias for `y`.
    pub value: Option<Encoding>,
    /// Color grouping, last fallback for the series split.
    pub color: Option<Encoding>,
    /// Grouping alias between `series` and `color`.
    pub group: Option<Encoding>,
}

impl EncodingMap {
    /// Deserialize an encodings document; unknown slots are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::Encodings)
    }

    /// Field for the x axis: `x`, else `category`.
    #[must_use]
    pub fn x_field(&self) -> Option<&str> {
        slot_field(&self.x).or_else(|| slot_field(&self.category))
    }

    /// Field for the y axis: `y`, else `value`.
    #[must_use]
    pub fn y_field(&self) -> Option<&str> {
        slot_field(&self.y).or_else(|| slot_field(&self.value))
    }

    /// Field for the series split: `series`, else `group`, else `color`.
    #[must_use]
    pub fn series_field(&self) -> Option<&str> {
        slot_field(&self.series)
            .or_else(|| slot_field(&self.group))
            .or_else(|| slot_field(&self.color))
    }

    /// Field for box values: `value`, else `y`.
    #[must_use]
    pub fn value_field(&self) -> Option<&str> {
        slot_field(&self.value).or_else(|| slot_field(&self.y))
    }

    /// Field for box categories: `category`, else `x`.
    #[must_use]
    pub fn category_field(&self) -> Option<&str> {
        slot_field(&self.category).or_else(|| slot_field(&self.x))
    }

    /// Aggregation requested on the `y` slot, if any.
    ///
    /// Only the `y` slot carries aggregation; builders substitute their
    /// own default when this is `None`.
    #[must_use]
    pub fn y_aggregation(&self) -> Option<Aggregation> {
        self.y
            .as_ref()
            .and_then(|encoding| encoding.agg.as_deref())
            .map(Aggregation::parse)
    }
}

fn slot_field(slot: &Option<Encoding>) -> Option<&str> {
    slot.as_ref()
        .map(|encoding| encoding.field.as_str())
        .filter(|field| !field.is_empty())
}
