//! Series splitting: rows to named sequences of (x, y) points.

use serde_json::Value;

use crate::value::{coerce_number, resolve, values_equal};

/// One chart point prior to trace emission.
///
/// `x` keeps its raw resolved value (categorical labels stay labels);
/// `y` is already through the numeric-coercion boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Raw x value; `Value::Null` for a missing field or unresolvable path.
    pub x: Value,
    /// Coerced y value; `None` marks a gap, not a zero.
    pub y: Option<f64>,
}

/// Series keyed by first appearance.
///
/// Key order is the order series keys first occur in the row sequence,
/// never sorted. Keys are raw values compared by numeric-aware equality.
#[derive(Debug, Clone, Default)]
pub struct SeriesMap {
    entries: Vec<(Value, Vec<Point>)>,
}

impl SeriesMap {
    /// Append a point to the series for `key`, inserting the series on
    /// first sight.
    pub fn push(&mut self, key: Value, point: Point) {
        if let Some((_, points)) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| values_equal(existing, &key))
        {
            points.push(point);
        } else {
            self.entries.push((key, vec![point]));
        }
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no rows were split.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate series in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &[Point])> {
        self.entries.iter().map(|(key, points)| (key, points.as_slice()))
    }

    /// Consume into `(key, points)` pairs in first-appearance order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(Value, Vec<Point>)> {
        self.entries
    }
}

/// Default series key when no series field is mapped.
pub const DEFAULT_SERIES: &str = "Series";

/// Partition rows into series of points.
///
/// Fields are dotted paths; an absent field spec yields `Null` x / `None`
/// y / the literal `"Series"` key respectively. A mapped series field that
/// resolves to null still keys a (null-named) series.
#[must_use]
pub fn split_series(
    rows: &[Value],
    x_field: Option<&str>,
    y_field: Option<&str>,
    series_field: Option<&str>,
) -> SeriesMap {
    let mut series = SeriesMap::default();
    for row in rows {
        let x = match x_field {
            Some(field) => resolve(row, field).cloned().unwrap_or(Value::Null),
            None => Value::Null,
        };
        let y = y_field
            .and_then(|field| resolve(row, field))
            .and_then(coerce_number);
        let key = match series_field {
            Some(field) => resolve(row, field).cloned().unwrap_or(Value::Null),
            None => Value::String(DEFAULT_SERIES.to_string()),
        };
        series.push(key, Point { x, y });
    }
    series
}
